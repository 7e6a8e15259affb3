use crate::{ActorState, Context, Symbol};

/// A unit of per-tick gameplay effect owned by exactly one [`crate::Behavior`].
///
/// `on_enter` and `on_exit` run once per activation of the owning behavior,
/// and `on_tick` runs once per logical tick in between with the 1-based frame
/// index. Recoverable gameplay conditions (no movement input, no target)
/// should degrade to doing nothing rather than panicking.
pub trait Action<A> {
    fn on_enter(&mut self, _ctx: &mut Context<A>) {}

    fn on_tick(&mut self, ctx: &mut Context<A>, frame: u32);

    fn on_exit(&mut self, _ctx: &mut Context<A>) {}
}

/// Holds an actor flag up during an inclusive frame window, e.g. a hit box
/// that is only live on the active frames of an attack.
///
/// The flag is only written at the window edges, and only cleared if this
/// action raised it, so several windows can share one flag (a multi-hit
/// attack). A behavior replaced mid-window clears the flag on exit.
#[derive(Debug, Clone, Copy)]
pub struct SetFlag {
    pub flag: Symbol,
    pub from: u32,
    pub to: u32,
    raised: bool,
}

impl SetFlag {
    pub fn new(flag: impl Into<Symbol>, from: u32, to: u32) -> Self {
        Self {
            flag: flag.into(),
            from,
            to,
            raised: false,
        }
    }
}

impl<A: ActorState> Action<A> for SetFlag {
    fn on_tick(&mut self, ctx: &mut Context<A>, frame: u32) {
        let active = self.from <= frame && frame <= self.to;
        if active != self.raised {
            ctx.actor.set_flag(self.flag, active);
            self.raised = active;
        }
    }

    fn on_exit(&mut self, ctx: &mut Context<A>) {
        if self.raised {
            ctx.actor.set_flag(self.flag, false);
            self.raised = false;
        }
    }
}

/// Opens the cancel window once the behavior reaches frame `from`.
#[derive(Debug, Clone, Copy)]
pub struct CancelWindow {
    pub from: u32,
}

impl<A> Action<A> for CancelWindow {
    fn on_tick(&mut self, ctx: &mut Context<A>, frame: u32) {
        if frame >= self.from {
            ctx.set_can_cancel(true);
        }
    }
}
