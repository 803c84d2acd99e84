//=========================================================================
// State System
//=========================================================================
//
// Named game states with lifecycle hooks, timed transitions between
// them, and the controller that drives both.
//
// Architecture:
//   StateBasedGame<G>
//     ├─ states: HashMap<StateId, Box<dyn GameState<G>>>
//     ├─ phase: Steady | Leaving | Entering
//     └─ pause flags (update / render)
//
// Flow:
//   enter_state() → Leaving → leave()/enter() swap → Entering → Steady
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::container::GameContainer;
use crate::core::input::event::{InputEvent, KeyCode, MouseButton};
use crate::error::GameError;

//=== Module Declarations =================================================

mod state_game;
pub mod transition;

//=== Public API ==========================================================

pub use state_game::StateBasedGame;
pub use transition::{EmptyTransition, TimedTransition, Transition};

//=== State Identity ======================================================

/// Integer identity of a game state, unique per registering game.
pub type StateId = i32;

/// Reserved ID meaning "no state"; the controller reports it until the
/// first real state is added. Never register a state with this ID.
pub const NO_STATE: StateId = -1;

//=== GameState Trait =====================================================

/// One self-contained mode of gameplay (menu, play, pause, ...) with its
/// own update, render and input logic.
///
/// `G` is the opaque render sink type the hosting loop supplies; the
/// core passes it through untouched.
///
/// # Lifecycle
///
/// `init` runs exactly once, after registration with a running game and
/// before any `enter`. `enter`/`leave` run once per activation cycle, in
/// matching pairs. `update` and `render` run every non-paused frame
/// while the state is current. Input callbacks arrive only while the
/// state is current and the controller is neither transitioning nor
/// update-paused.
///
/// # Minimal Implementation
///
/// Only `id()` is required; every other hook defaults to a no-op:
///
/// ```rust
/// # use stagecraft::prelude::*;
/// struct MenuState;
///
/// impl<G> GameState<G> for MenuState {
///     fn id(&self) -> StateId {
///         1
///     }
/// }
/// ```
pub trait GameState<G> {
    /// Constant, unique identity.
    fn id(&self) -> StateId;

    /// One-time setup. Failures propagate to whoever drives the loop;
    /// the controller does not attempt recovery.
    fn init(&mut self, _container: &mut GameContainer<G>) -> Result<(), GameError> {
        Ok(())
    }

    /// Called when this state becomes current.
    fn enter(&mut self, _container: &mut GameContainer<G>) {}

    /// Called when this state stops being current.
    fn leave(&mut self, _container: &mut GameContainer<G>) {}

    /// Per-frame logic while current and not paused.
    fn update(
        &mut self,
        _container: &mut GameContainer<G>,
        _delta_ms: u64,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Per-frame rendering while current and not render-paused.
    fn render(&mut self, _container: &mut GameContainer<G>, _g: &mut G) {}

    /// Whether this state individually skips `update` calls.
    fn update_paused(&self) -> bool {
        false
    }

    /// Whether this state individually skips `render` calls.
    fn render_paused(&self) -> bool {
        false
    }

    //--- Input Callbacks --------------------------------------------------

    fn key_pressed(&mut self, _key: KeyCode) {}

    fn key_released(&mut self, _key: KeyCode) {}

    fn mouse_pressed(&mut self, _button: MouseButton, _x: i32, _y: i32) {}

    fn mouse_released(&mut self, _button: MouseButton, _x: i32, _y: i32) {}

    fn mouse_moved(&mut self, _old_x: i32, _old_y: i32, _new_x: i32, _new_y: i32) {}

    fn mouse_wheel_moved(&mut self, _delta: i32) {}

    fn controller_button_pressed(&mut self, _controller: usize, _button: usize) {}

    fn controller_button_released(&mut self, _controller: usize, _button: usize) {}

    fn controller_axis_moved(&mut self, _controller: usize, _axis: usize, _value: f32) {}

    //--- Dispatch ---------------------------------------------------------

    /// Routes a unified event to the matching callback. Implementations
    /// normally override the individual callbacks, not this.
    fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyPressed(key) => self.key_pressed(key),
            InputEvent::KeyReleased(key) => self.key_released(key),
            InputEvent::MousePressed { button, x, y } => self.mouse_pressed(button, x, y),
            InputEvent::MouseReleased { button, x, y } => self.mouse_released(button, x, y),
            InputEvent::MouseMoved { old_x, old_y, new_x, new_y } => {
                self.mouse_moved(old_x, old_y, new_x, new_y)
            }
            InputEvent::MouseWheel(delta) => self.mouse_wheel_moved(delta),
            InputEvent::ControllerButtonPressed { controller, button } => {
                self.controller_button_pressed(controller, button)
            }
            InputEvent::ControllerButtonReleased { controller, button } => {
                self.controller_button_released(controller, button)
            }
            InputEvent::ControllerAxisMoved { controller, axis, value } => {
                self.controller_axis_moved(controller, axis, value)
            }
        }
    }
}
