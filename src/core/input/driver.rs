//=========================================================================
// Device Driver Contracts
//=========================================================================
//
// Native-bridge capability consumed by the device pollers.
//
// The core never talks to hardware directly: a driver wraps one native
// device session and exposes a synchronous, non-blocking surface the
// poller reads once per frame. Drivers are explicit, constructed objects
// with an `open`-style lifecycle (`create`/`destroy`); there is no
// process-wide device state.
//
// Two kinds of data cross this boundary:
// - Raw events (`RawMouseEvent`, `RawKeyEvent`): discrete happenings
//   since the last drain, each stamped with monotonic milliseconds.
// - Capability queries (`button_count`, `has_wheel`, ...): checked by
//   callers before invoking the dependent operation.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::event::{KeyCode, Pov};
use crate::error::GameError;

//=== Raw Mouse Events ====================================================

/// One raw mouse happening as reported by the native layer.
///
/// Motion carries both the absolute cursor position and the relative
/// delta; the poller decides which to trust based on its grab regime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawMouseEvent {
    Moved {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        timestamp: u64,
    },
    Button {
        index: usize,
        down: bool,
        timestamp: u64,
    },
    Wheel {
        delta: i32,
        timestamp: u64,
    },
}

//=== Raw Keyboard Events =================================================

/// One raw key state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub down: bool,
    pub timestamp: u64,
}

//=== MouseDriver =========================================================

/// Native mouse session.
///
/// `read_events` drains everything buffered since the previous call; it
/// must never block. `grab` and `set_cursor_position` are best-effort:
/// a backend without native cursor control logs and ignores them.
pub trait MouseDriver {
    /// Acquires the native device. Must be called before any read.
    fn create(&mut self) -> Result<(), GameError>;

    /// Releases the native device.
    fn destroy(&mut self);

    /// Drains buffered raw events into `out` (appended in order).
    fn read_events(&mut self, out: &mut Vec<RawMouseEvent>);

    /// Switches the native cursor between grabbed (hidden, relative)
    /// and ungrabbed (visible, absolute) modes.
    fn grab(&mut self, grabbed: bool);

    /// Warps the native cursor, where supported.
    fn set_cursor_position(&mut self, x: i32, y: i32);

    /// Number of buttons the device reports.
    fn button_count(&self) -> usize;

    /// Whether the device has a scroll wheel.
    fn has_wheel(&self) -> bool;
}

//=== KeyboardDriver ======================================================

/// Native keyboard session.
pub trait KeyboardDriver {
    /// Acquires the native device. Must be called before any read.
    fn create(&mut self) -> Result<(), GameError>;

    /// Releases the native device.
    fn destroy(&mut self);

    /// Drains buffered raw events into `out` (appended in order).
    fn read_events(&mut self, out: &mut Vec<RawKeyEvent>);
}

//=== ControllerDriver ====================================================

/// Native joystick/gamepad session.
///
/// Controllers are sampled rather than evented at this boundary: the
/// poller calls `refresh` once per frame, then reads the current axis,
/// button and POV values and detects changes itself. Out-of-range
/// queries return neutral values.
pub trait ControllerDriver {
    /// Pumps the native backend so subsequent queries are current.
    fn refresh(&mut self);

    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Number of physical analog axes.
    fn axis_count(&self) -> usize;

    /// Number of buttons.
    fn button_count(&self) -> usize;

    /// Current raw value of an axis, in the device's native range.
    fn axis_value(&self, axis: usize) -> f32;

    /// Dead zone the device itself reports for an axis, if any.
    ///
    /// The poller uses the larger of this and its configured zone.
    fn axis_dead_zone(&self, axis: usize) -> f32 {
        let _ = axis;
        0.0
    }

    /// Current button state.
    fn button_down(&self, button: usize) -> bool;

    /// Current POV hat direction.
    fn pov(&self) -> Pov;

    /// Whether the device is still attached.
    fn connected(&self) -> bool {
        true
    }
}

//=== ControllerEnumerator ================================================

/// Discovers the joystick-like devices currently available.
///
/// The registry enumerates exactly once at `open`; indices are assigned
/// in enumeration order and stay stable for the registry's lifetime.
pub trait ControllerEnumerator {
    fn enumerate(&mut self) -> Vec<Box<dyn ControllerDriver>>;
}
