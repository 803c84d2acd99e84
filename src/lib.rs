//=========================================================================
// Stagecraft — Library Root
//
// A state-machine game framework with polled device input.
//
// Responsibilities:
// - Expose the state layer (`StateBasedGame`, `GameState`, transitions)
// - Expose the device pollers (mouse, keyboard, controllers) and the
//   unified input event routing that feeds the current state
// - Bridge the OS (Winit window, gilrs controllers) through explicit
//   driver objects, so the whole core runs headlessly in tests
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// struct Menu;
//
// impl GameState<()> for Menu {
//     fn id(&self) -> StateId { 0 }
// }
//
// fn main() -> Result<(), GameError> {
//     let mut container = GameContainer::new(800, 600);
//     let mut game = StateBasedGame::new();
//     game.add_state(&mut container, Menu)?;
//     game.init(&mut container)?;
//     game.update(&mut container, 16)
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-independent systems (states, transitions,
// device pollers). `platform` holds the Winit and gilrs bridges; it is
// public so applications can wire the window host to the pollers, but
// most code only needs the prelude.
//
pub mod core;
pub mod error;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// The state controller and its error type are the crate's front door;
// re-export them so users can `use stagecraft::StateBasedGame;` without
// knowing the module layout.
//
pub use crate::core::state::StateBasedGame;
pub use error::GameError;
