//=========================================================================
// Platform Event Mapper
//
// Converts Winit input events into the raw device events the pollers
// consume. Provides a clean separation between OS-specific input and
// the framework's internal event representation.
//
// Responsibilities:
// - Translate keyboard and mouse events
// - Ignore unsupported or irrelevant Winit events
// - Provide fallbacks (`Unidentified`) for unmapped inputs
//
//=========================================================================

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode as WinitKeyCode;
use winit::keyboard::PhysicalKey;

use crate::core::input::driver::{RawKeyEvent, RawMouseEvent};
use crate::core::input::event::KeyCode;

//=== Key Conversion ======================================================
//
// Maps `WinitKeyCode` values to the internal `KeyCode` enum. Only the
// supported subset is mapped; all others fall back to `Unidentified`.
//

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Numeric keys -----------------------------------------------------
            Digit0 => KeyCode::Digit0, Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2, Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4, Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6, Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8, Digit9 => KeyCode::Digit9,

            //--- Alphabetic keys --------------------------------------------------
            KeyA => KeyCode::KeyA, KeyB => KeyCode::KeyB, KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD, KeyE => KeyCode::KeyE, KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG, KeyH => KeyCode::KeyH, KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ, KeyK => KeyCode::KeyK, KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM, KeyN => KeyCode::KeyN, KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP, KeyQ => KeyCode::KeyQ, KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS, KeyT => KeyCode::KeyT, KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV, KeyW => KeyCode::KeyW, KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY, KeyZ => KeyCode::KeyZ,

            //--- Function keys ----------------------------------------------------
            F1 => KeyCode::F1, F2 => KeyCode::F2, F3 => KeyCode::F3,
            F4 => KeyCode::F4, F5 => KeyCode::F5, F6 => KeyCode::F6,
            F7 => KeyCode::F7, F8 => KeyCode::F8, F9 => KeyCode::F9,
            F10 => KeyCode::F10, F11 => KeyCode::F11, F12 => KeyCode::F12,

            //--- Arrow keys -------------------------------------------------------
            ArrowDown => KeyCode::ArrowDown, ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight, ArrowUp => KeyCode::ArrowUp,

            //--- Modifier keys ----------------------------------------------------
            ShiftLeft => KeyCode::ShiftLeft, ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft, ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft, AltRight => KeyCode::AltRight,

            //--- Editing / navigation ---------------------------------------------
            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            Insert => KeyCode::Insert,
            Home => KeyCode::Home,
            End => KeyCode::End,
            PageUp => KeyCode::PageUp,
            PageDown => KeyCode::PageDown,

            //--- Fallback ---------------------------------------------------------
            _ => KeyCode::Unidentified,
        }
    }
}

//=== Mouse Conversion ====================================================
//
// Maps Winit mouse button identifiers to poller button indices
// (0 = left, 1 = right, 2 = middle, matching the event vocabulary).
//

pub(crate) fn button_index(button: WinitMouseButton) -> usize {
    match button {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Right => 1,
        WinitMouseButton::Middle => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(n) => 5 + n as usize,
    }
}

//=== Event Mapping =======================================================

/// Converts a Winit key event into a raw keyboard event.
///
/// Returns `None` for key repeats and for keys that map to
/// `Unidentified`; the pollers only track physical press/release pairs.
pub(crate) fn map_key_event(event: &KeyEvent, timestamp: u64) -> Option<RawKeyEvent> {
    if event.repeat {
        return None;
    }

    let key = match event.physical_key {
        PhysicalKey::Code(code) => KeyCode::from(code),
        _ => return None,
    };
    if matches!(key, KeyCode::Unidentified) {
        return None;
    }

    Some(RawKeyEvent {
        key,
        down: event.state == ElementState::Pressed,
        timestamp,
    })
}

/// Converts a Winit mouse button event into a raw mouse event.
pub(crate) fn map_mouse_button(
    button: WinitMouseButton,
    state: ElementState,
    timestamp: u64,
) -> RawMouseEvent {
    RawMouseEvent::Button {
        index: button_index(button),
        down: state == ElementState::Pressed,
        timestamp,
    }
}

/// Converts a Winit scroll delta into whole wheel notches.
///
/// Line deltas map one-to-one; pixel deltas are quantized assuming a
/// conventional 120-pixel notch. Sub-notch deltas return `None`.
pub(crate) fn map_wheel(delta: MouseScrollDelta, timestamp: u64) -> Option<RawMouseEvent> {
    let notches = match delta {
        MouseScrollDelta::LineDelta(_, y) => y as i32,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / 120.0) as i32,
    };
    if notches == 0 {
        return None;
    }
    Some(RawMouseEvent::Wheel { delta: notches, timestamp })
}

//=========================================================================
// Unit Tests
//=========================================================================
