//=========================================================================
// Core Systems
//
// Platform-independent heart of the framework.
//
// Responsibilities:
// - Drive the game state machine (`state`)
// - Expose the shared per-frame context states run against (`container`)
// - Poll devices and route unified input events (`input`)
//
// Notes:
// Nothing in this tree touches the OS. The platform layer feeds these
// systems through the driver contracts in `input::driver`, which is also
// how tests drive them headlessly.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod container;
pub mod input;
pub mod state;

//=== Public Exports ======================================================
pub use container::{GameContainer, StateChange};
pub use state::{
    EmptyTransition, GameState, StateBasedGame, StateId, TimedTransition, Transition, NO_STATE,
};
