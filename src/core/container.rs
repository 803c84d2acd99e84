//=========================================================================
// Game Container
//=========================================================================
//
// Context object the hosting loop passes into every state and transition
// callback. Carries the display dimensions the core consumes (mouse
// clamping, transition geometry) and the slot through which game states
// request state changes.
//
// States never hold a reference to the controller; they queue a request
// here and the controller drains it at the top of its next update. A
// newer request replaces a pending one.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::state::transition::{EmptyTransition, Transition};
use crate::core::state::StateId;

//=== StateChange =========================================================

/// A queued request to enter another state.
pub struct StateChange<G> {
    pub target: StateId,
    pub leave: Box<dyn Transition<G>>,
    pub enter: Box<dyn Transition<G>>,
}

//=== GameContainer =======================================================

/// Frame context shared by the hosting loop, the controller and the
/// active state. `G` is the opaque render sink type.
pub struct GameContainer<G> {
    width: u32,
    height: u32,
    pending: Option<StateChange<G>>,
}

impl<G> GameContainer<G> {
    //--- Construction -----------------------------------------------------

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pending: None,
        }
    }

    //--- Dimensions -------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Updates the dimensions after a window resize.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    //--- State Change Requests --------------------------------------------

    /// Requests a transition to `target` with the empty transitions.
    pub fn request_state(&mut self, target: StateId) {
        self.request_state_with(
            target,
            Box::new(EmptyTransition),
            Box::new(EmptyTransition),
        );
    }

    /// Requests a transition to `target` with explicit leave and enter
    /// transitions. Replaces any request still pending.
    pub fn request_state_with(
        &mut self,
        target: StateId,
        leave: Box<dyn Transition<G>>,
        enter: Box<dyn Transition<G>>,
    ) {
        if let Some(old) = &self.pending {
            debug!(
                "state request {} replaced by {} before being processed",
                old.target, target
            );
        }
        self.pending = Some(StateChange { target, leave, enter });
    }

    /// Target of the pending request, if any.
    pub fn pending_state(&self) -> Option<StateId> {
        self.pending.as_ref().map(|change| change.target)
    }

    /// Takes the pending request, leaving the slot empty.
    pub(crate) fn take_state_request(&mut self) -> Option<StateChange<G>> {
        self.pending.take()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_track_resizes() {
        let mut container: GameContainer<()> = GameContainer::new(800, 600);
        assert_eq!((container.width(), container.height()), (800, 600));

        container.set_size(1280, 720);
        assert_eq!((container.width(), container.height()), (1280, 720));
    }

    #[test]
    fn newer_request_replaces_pending() {
        let mut container: GameContainer<()> = GameContainer::new(800, 600);
        container.request_state(1);
        container.request_state(2);

        assert_eq!(container.pending_state(), Some(2));
        let change = container.take_state_request().unwrap();
        assert_eq!(change.target, 2);
        assert!(container.take_state_request().is_none());
    }
}
