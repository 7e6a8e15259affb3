/// What an [`crate::Action`] gets to touch while its behavior is active.
///
/// Actions read and write the owning actor through `actor`. The only piece of
/// orchestrator state they can reach is the advisory cancel flag, which
/// external systems consult before allowing a player-initiated interrupt.
pub struct Context<'a, A> {
    pub actor: &'a mut A,
    can_cancel: &'a mut bool,
}

impl<'a, A> Context<'a, A> {
    pub fn new(actor: &'a mut A, can_cancel: &'a mut bool) -> Self {
        Self { actor, can_cancel }
    }

    pub fn can_cancel(&self) -> bool {
        *self.can_cancel
    }

    pub fn set_can_cancel(&mut self, value: bool) {
        *self.can_cancel = value;
    }
}
