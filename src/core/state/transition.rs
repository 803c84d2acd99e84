//=========================================================================
// Transitions
//=========================================================================
//
// A transition is a time-boxed effect bridging the leave of one state
// and the enter of another. The controller advances it with the frame
// delta and wraps the current state's render in its pre/post hooks.
//
// `is_complete` is a latch: once true it stays true for the transition's
// lifetime. The empty transition satisfies the whole contract trivially
// and is the default whenever a caller does not supply one, so the
// controller never deals in "no transition" nulls.
//
// Visual transitions (fades, wipes) belong to the rendering layer; they
// implement this same trait against a concrete `G`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::container::GameContainer;
use crate::core::state::GameState;

//=== Transition Trait ====================================================

/// Timed bridge between two game states.
///
/// For a leave transition, `init` receives the state being left as
/// `from` and the target as `to`; for an enter transition it receives
/// the state just entered as `from` and the state just left as `to`.
/// References are read-only; transitions keep what they need by value.
pub trait Transition<G> {
    /// Prepares the transition for the two states involved.
    fn init(&mut self, _from: &dyn GameState<G>, _to: &dyn GameState<G>) {}

    /// Advances the internal timer/animation by `delta_ms`.
    fn update(&mut self, _container: &mut GameContainer<G>, _delta_ms: u64) {}

    /// Hook before the current state renders.
    fn pre_render(&mut self, _container: &mut GameContainer<G>, _g: &mut G) {}

    /// Hook after the current state renders.
    fn post_render(&mut self, _container: &mut GameContainer<G>, _g: &mut G) {}

    /// Permanently true once the transition has run its course.
    fn is_complete(&self) -> bool;
}

//=== EmptyTransition =====================================================

/// The trivial transition: always complete, all hooks no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTransition;

impl<G> Transition<G> for EmptyTransition {
    fn is_complete(&self) -> bool {
        true
    }
}

//=== TimedTransition =====================================================

/// Pure timer: completes once a fixed duration has elapsed. Useful for
/// pacing a state change without any visual effect.
#[derive(Debug, Clone, Copy)]
pub struct TimedTransition {
    duration_ms: u64,
    elapsed_ms: u64,
}

impl TimedTransition {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0,
        }
    }
}

impl<G> Transition<G> for TimedTransition {
    fn update(&mut self, _container: &mut GameContainer<G>, delta_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }

    fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete<T: Transition<()>>(t: &T) -> bool {
        t.is_complete()
    }

    #[test]
    fn empty_is_always_complete() {
        assert!(complete(&EmptyTransition));
    }

    #[test]
    fn timed_completes_after_its_duration() {
        let mut container: GameContainer<()> = GameContainer::new(800, 600);
        let mut t = TimedTransition::new(100);

        assert!(!complete(&t));
        Transition::<()>::update(&mut t, &mut container, 60);
        assert!(!complete(&t));
        Transition::<()>::update(&mut t, &mut container, 60);
        assert!(complete(&t));
    }

    #[test]
    fn timed_completion_is_a_latch() {
        let mut container: GameContainer<()> = GameContainer::new(800, 600);
        let mut t = TimedTransition::new(10);
        Transition::<()>::update(&mut t, &mut container, 10);
        assert!(complete(&t));
        Transition::<()>::update(&mut t, &mut container, 1);
        assert!(complete(&t));
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let t = TimedTransition::new(0);
        assert!(complete(&t));
    }
}
