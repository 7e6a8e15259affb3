//! # ability-behavior-tree
//!
//! A priority-arbitrated, input-buffered state machine that drives the
//! abilities (attack, dash, idle...) of an action game character.
//!
//!
//! ## Overview
//!
//! Every character owns a [`BehaviorTree`]. The tree holds a flat graph of
//! [`Node`]s, each bound to a [`Behavior`], and runs on a fixed logical clock
//! that is decoupled from the render frame rate.
//!
//! A behavior is a named, fixed-length run of logical ticks made of
//! [`Action`]s. It may loop, and it may be reachable only when a certain input
//! is buffered and its guard condition holds.
//! The node graph says which behaviors may follow the current one, and with
//! what priority.
//!
//! Each logical step does three things, in this order:
//!
//! 1. Look at the children of the current node. A child is a candidate if its
//!    behavior's input symbol is buffered and its guard condition holds. The
//!    candidate with the highest priority wins (the first one seen on ties),
//!    and its behavior is started right away.
//! 2. Tick the active behavior, which ticks its actions in declaration order.
//! 3. Advance the frame counter. Past the end, a looping behavior restarts at
//!    frame 1, anything else falls back to the `"Default"` behavior.
//!
//!
//! ## How it looks like
//!
//! First, you define the actor state. Guard conditions and actions read and
//! write it, and the tree never touches it on its own.
//!
//! ```rust
//! # use ability_behavior_tree::*;
//! #[derive(Default)]
//! struct Player {
//!     grounded: bool,
//!     swings: u32,
//! }
//!
//! impl ActorState for Player {}
//! ```
//!
//! Then you define actions.
//!
//! ```rust
//! # use ability_behavior_tree::*;
//! # #[derive(Default)] struct Player { grounded: bool, swings: u32 }
//! # impl ActorState for Player {}
//! struct Swing;
//!
//! impl Action<Player> for Swing {
//!     fn on_tick(&mut self, ctx: &mut Context<Player>, frame: u32) {
//!         if frame == 1 {
//!             ctx.actor.swings += 1;
//!         }
//!     }
//! }
//! ```
//!
//! Then you describe the behaviors and the node graph, and hand them to the
//! tree. Both collections come from a [`NodeSource`] and a
//! [`BehaviorSource`]. Plain `Vec`s are sources, and so is [`YamlSource`].
//!
//! ```rust
//! # use ability_behavior_tree::*;
//! # #[derive(Default)] struct Player { grounded: bool, swings: u32 }
//! # impl ActorState for Player {}
//! # struct Swing;
//! # impl Action<Player> for Swing {
//! #     fn on_tick(&mut self, ctx: &mut Context<Player>, frame: u32) {
//! #         if frame == 1 { ctx.actor.swings += 1; }
//! #     }
//! # }
//! let mut behaviors = vec![
//!     Behavior::new("Default", 1).looping(true),
//!     Behavior::new("Attack", 3)
//!         .input("A")
//!         .condition(|player: &Player| player.grounded)
//!         .action(Swing),
//! ];
//! let mut nodes = vec![
//!     NodeDef::new(0, "Default").children([1]),
//!     NodeDef::new(1, "Attack").priority(1).children([0]),
//! ];
//!
//! let mut player = Player { grounded: true, ..Player::default() };
//! let mut tree = BehaviorTree::new(TreeConfig::default());
//! tree.initialize(&mut nodes, &mut behaviors, &mut player).unwrap();
//! ```
//!
//! and feed it wall-clock time together with the buffered input every frame.
//!
//! ```rust
//! # use ability_behavior_tree::*;
//! # #[derive(Default)] struct Player { grounded: bool, swings: u32 }
//! # impl ActorState for Player {}
//! # struct Swing;
//! # impl Action<Player> for Swing {
//! #     fn on_tick(&mut self, ctx: &mut Context<Player>, frame: u32) {
//! #         if frame == 1 { ctx.actor.swings += 1; }
//! #     }
//! # }
//! # let mut behaviors = vec![
//! #     Behavior::new("Default", 1).looping(true),
//! #     Behavior::new("Attack", 3).input("A").condition(|p: &Player| p.grounded).action(Swing),
//! # ];
//! # let mut nodes = vec![
//! #     NodeDef::new(0, "Default").children([1]),
//! #     NodeDef::new(1, "Attack").priority(1).children([0]),
//! # ];
//! # let mut player = Player { grounded: true, ..Player::default() };
//! # let mut tree = BehaviorTree::new(TreeConfig::default());
//! # tree.initialize(&mut nodes, &mut behaviors, &mut player).unwrap();
//! let buffered = [Symbol::from("A")];
//! tree.advance_time(tree.tick_interval() * 2, &mut player, &buffered[..]);
//!
//! assert_eq!(player.swings, 1);
//! assert_eq!(tree.current_behavior().map(|b| b.name().as_str()), Some("Attack"));
//! ```
//!
//! Time is accumulated and the tree runs one logical step for every whole
//! tick interval the accumulator exceeds. A long frame runs several steps in
//! a row, in the same order they would have run one per frame, so the result
//! does not depend on how the caller slices time.
//!
//!
//! ## Context and the cancel flag
//!
//! Actions receive a [`Context`], which wraps the actor and the advisory
//! `can_cancel` flag. The tree clears the flag whenever a behavior starts,
//! actions such as [`CancelWindow`] raise it, and other systems read it with
//! [`BehaviorTree::can_cancel`] to decide whether the player may interrupt
//! the current behavior. The tree itself never looks at it.
//!
//!
//! ## Data-driven definitions
//!
//! Nodes and behaviors can be described in YAML and loaded through
//! [`YamlSource`], with action types looked up in a [`Registry`].
//!
//! ```yaml
//! behaviors:
//!   - name: Default
//!     frame_length: 1
//!     loop: true
//!   - name: Attack
//!     frame_length: 12
//!     input: A
//!     condition: grounded && !stunned
//!     actions:
//!       - type: SetFlag
//!         params: { flag: hitbox, from: 4, to: 6 }
//!       - type: CancelWindow
//!         params: { from: 9 }
//! nodes:
//!   - { id: 0, name: Default, children: [1] }
//!   - { id: 1, name: Attack, priority: 1, children: [0] }
//! ```
//!
//! Node names resolve to the behavior of the same name. When there is none,
//! trailing digits are dropped, so `Attack1` and `Attack2` both run `Attack`
//! while occupying different places in a combo chain.
//!
//! ### Condition syntax
//!
//! Conditions are boolean expressions over actor flags (see
//! [`ActorState::flag`]).
//!
//! ```raw
//! condition = and-expr | condition "||" and-expr
//!
//! and-expr = factor | and-expr "&&" factor
//!
//! factor = "!" factor | "(" condition ")" | "true" | "false" | identifier
//! ```
//!
//! An empty condition always holds.
//!
//!
//! ## Diagnostics
//!
//! The crate logs through [`tracing`]. Broken data (a node whose index fell
//! out of range, a missing `"Default"` behavior) is reported with `error!`.
//! A step whose node index is out of range is skipped entirely, and a
//! behavior that ends without a `"Default"` to return to restarts at frame
//! 1, so one bad asset does not take a whole session down.

mod action;
mod behavior;
mod config;
mod context;
pub mod error;
pub mod parser;
mod registry;
mod source;
mod symbol;
mod tree;

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

pub use crate::action::{Action, CancelWindow, SetFlag};
pub use crate::behavior::{Behavior, BehaviorId, Node, NodeDef, NodeId};
pub use crate::config::{TreeConfig, DEFAULT_TICK_RATE, TICK_RATE_ENV_VAR};
pub use crate::context::Context;
pub use crate::parser::{parse_condition, Condition, YamlSource};
pub use crate::registry::{Params, Registry};
pub use crate::source::{BehaviorSource, NodeSource};
pub use crate::symbol::Symbol;
pub use crate::tree::BehaviorTree;
pub use ::once_cell::sync::Lazy;

/// The name of the fallback behavior every tree must define.
pub static DEFAULT_BEHAVIOR: Lazy<Symbol> = Lazy::new(|| "Default".into());

/// Live gameplay state of the character that owns a [`BehaviorTree`].
///
/// Only named boolean flags are needed by the crate itself: data-driven
/// guard conditions read them and [`SetFlag`] writes them. Actors that only
/// use closures and their own actions can rely on the defaults.
pub trait ActorState {
    fn flag(&self, _name: Symbol) -> bool {
        false
    }

    fn set_flag(&mut self, _name: Symbol, _value: bool) {}
}

impl ActorState for () {}

impl ActorState for HashMap<Symbol, bool> {
    fn flag(&self, name: Symbol) -> bool {
        self.get(&name).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, name: Symbol, value: bool) {
        self.insert(name, value);
    }
}

/// Read-only view of the input symbols the player issued recently enough to
/// still trigger a transition.
pub trait InputBuffer {
    fn is_buffered(&self, input: Symbol) -> bool;
}

impl InputBuffer for [Symbol] {
    fn is_buffered(&self, input: Symbol) -> bool {
        self.contains(&input)
    }
}

impl InputBuffer for Vec<Symbol> {
    fn is_buffered(&self, input: Symbol) -> bool {
        self.contains(&input)
    }
}

impl InputBuffer for VecDeque<Symbol> {
    fn is_buffered(&self, input: Symbol) -> bool {
        self.contains(&input)
    }
}

impl InputBuffer for HashSet<Symbol> {
    fn is_buffered(&self, input: Symbol) -> bool {
        self.contains(&input)
    }
}

impl InputBuffer for BTreeSet<Symbol> {
    fn is_buffered(&self, input: Symbol) -> bool {
        self.contains(&input)
    }
}
