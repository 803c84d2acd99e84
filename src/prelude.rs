//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// State layer
pub use crate::core::container::GameContainer;
pub use crate::core::state::{
    EmptyTransition, GameState, StateBasedGame, StateId, TimedTransition, Transition, NO_STATE,
};

// Input system
pub use crate::core::input::{
    InputEvent, InputSystem, KeyCode, Keyboard, Mouse, MouseButton, Pov,
};
pub use crate::core::input::registry::ControllerRegistry;

// Platform bridge
pub use crate::platform::{GilrsBackend, Platform, PlatformHandles, PlatformNote};

// Errors
pub use crate::error::GameError;
