//=========================================================================
// Input Subsystem
//
// Device pollers and the unified event surface they feed.
//
// Responsibilities:
// - Define the driver contracts the platform layer implements (`driver`)
// - Poll and buffer per-device state: `mouse`, `keyboard`, and the
//   controller pair `pad`/`registry`
// - Convert buffered device events into unified `InputEvent`s and route
//   them into the state controller (`system`)
//
// Notes:
// Every poller is an explicit, constructed object with an open/close
// lifecycle. There is no process-wide device state; a headless test
// attaches mock drivers and nothing else.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod driver;
pub mod event;
pub mod keyboard;
pub mod mouse;
pub mod pad;
pub mod registry;
pub mod system;

//=== Public Exports ======================================================
pub use driver::{
    ControllerDriver, ControllerEnumerator, KeyboardDriver, MouseDriver, RawKeyEvent,
    RawMouseEvent,
};
pub use event::{InputEvent, KeyCode, MouseButton, Pov};
pub use keyboard::{KeyEvent, Keyboard};
pub use mouse::{Mouse, MouseEvent, MouseEventKind};
pub use pad::{Controller, ControllerEvent, ControllerEventKind, DEFAULT_DEAD_ZONE};
pub use registry::ControllerRegistry;
pub use system::InputSystem;
