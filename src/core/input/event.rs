//=========================================================================
// Input Event Vocabulary
//
// Portable identifiers and event types shared by every device poller.
//
// This module abstracts away platform-specific input (Winit, gilrs) into
// a unified, engine-friendly format used by the input subsystem.
//
// Responsibilities:
// - Represent keys, mouse buttons and POV hats in a stable, portable way
// - Provide the static key-name tables (name ↔ code, both directions
//   resolved at compile time, no runtime introspection)
// - Define the unified `InputEvent` used to route device activity through
//   the state controller to the current game state
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced:
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
///
/// The discriminant doubles as the index into the keyboard down-state
/// table (see [`KeyCode::index`] and [`KEY_COUNT`]). `Unidentified` must
/// stay the last variant for `KEY_COUNT` to be correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    //--- Modifier Keys ----------------------------------------------------

    ShiftLeft, ShiftRight,
    ControlLeft, ControlRight,
    AltLeft, AltRight,

    //--- Editing / Navigation ---------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    /// Fallback for keys the platform layer could not map.
    Unidentified,
}

/// Size of the keyboard down-state table.
pub const KEY_COUNT: usize = KeyCode::Unidentified as usize + 1;

impl KeyCode {
    /// Index into the keyboard down-state table.
    pub const fn index(self) -> usize {
        self as usize
    }

    //--- name() -----------------------------------------------------------
    //
    // Human-readable key name. Static table, one entry per variant.
    //
    pub const fn name(self) -> &'static str {
        use KeyCode::*;
        match self {
            Digit0 => "0", Digit1 => "1", Digit2 => "2", Digit3 => "3",
            Digit4 => "4", Digit5 => "5", Digit6 => "6", Digit7 => "7",
            Digit8 => "8", Digit9 => "9",

            KeyA => "A", KeyB => "B", KeyC => "C", KeyD => "D", KeyE => "E",
            KeyF => "F", KeyG => "G", KeyH => "H", KeyI => "I", KeyJ => "J",
            KeyK => "K", KeyL => "L", KeyM => "M", KeyN => "N", KeyO => "O",
            KeyP => "P", KeyQ => "Q", KeyR => "R", KeyS => "S", KeyT => "T",
            KeyU => "U", KeyV => "V", KeyW => "W", KeyX => "X", KeyY => "Y",
            KeyZ => "Z",

            F1 => "F1", F2 => "F2", F3 => "F3", F4 => "F4", F5 => "F5",
            F6 => "F6", F7 => "F7", F8 => "F8", F9 => "F9", F10 => "F10",
            F11 => "F11", F12 => "F12",

            ArrowUp => "Up", ArrowDown => "Down",
            ArrowLeft => "Left", ArrowRight => "Right",

            ShiftLeft => "LShift", ShiftRight => "RShift",
            ControlLeft => "LCtrl", ControlRight => "RCtrl",
            AltLeft => "LAlt", AltRight => "RAlt",

            Space => "Space",
            Enter => "Enter",
            Escape => "Escape",
            Tab => "Tab",
            Backspace => "Backspace",
            Delete => "Delete",
            Insert => "Insert",
            Home => "Home",
            End => "End",
            PageUp => "PageUp",
            PageDown => "PageDown",

            Unidentified => "Unidentified",
        }
    }

    //--- from_name() ------------------------------------------------------
    //
    // Reverse lookup for the same table. Exact, case-sensitive match;
    // unknown names return `None` rather than `Unidentified` so callers
    // can distinguish bad configuration from a real key we cannot map.
    //
    pub fn from_name(name: &str) -> Option<Self> {
        use KeyCode::*;
        let key = match name {
            "0" => Digit0, "1" => Digit1, "2" => Digit2, "3" => Digit3,
            "4" => Digit4, "5" => Digit5, "6" => Digit6, "7" => Digit7,
            "8" => Digit8, "9" => Digit9,

            "A" => KeyA, "B" => KeyB, "C" => KeyC, "D" => KeyD, "E" => KeyE,
            "F" => KeyF, "G" => KeyG, "H" => KeyH, "I" => KeyI, "J" => KeyJ,
            "K" => KeyK, "L" => KeyL, "M" => KeyM, "N" => KeyN, "O" => KeyO,
            "P" => KeyP, "Q" => KeyQ, "R" => KeyR, "S" => KeyS, "T" => KeyT,
            "U" => KeyU, "V" => KeyV, "W" => KeyW, "X" => KeyX, "Y" => KeyY,
            "Z" => KeyZ,

            "F1" => F1, "F2" => F2, "F3" => F3, "F4" => F4, "F5" => F5,
            "F6" => F6, "F7" => F7, "F8" => F8, "F9" => F9, "F10" => F10,
            "F11" => F11, "F12" => F12,

            "Up" => ArrowUp, "Down" => ArrowDown,
            "Left" => ArrowLeft, "Right" => ArrowRight,

            "LShift" => ShiftLeft, "RShift" => ShiftRight,
            "LCtrl" => ControlLeft, "RCtrl" => ControlRight,
            "LAlt" => AltLeft, "RAlt" => AltRight,

            "Space" => Space,
            "Enter" => Enter,
            "Escape" => Escape,
            "Tab" => Tab,
            "Backspace" => Backspace,
            "Delete" => Delete,
            "Insert" => Insert,
            "Home" => Home,
            "End" => End,
            "PageUp" => PageUp,
            "PageDown" => PageDown,

            "Unidentified" => Unidentified,
            _ => return None,
        };
        Some(key)
    }
}

//=== MouseButton =========================================================

/// Mouse button identifier.
///
/// Pollers store buttons by raw index (drivers report a button count);
/// this enum is the portable view used in game-state callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side buttons, thumb buttons, anything beyond the first three.
    Other,
}

impl MouseButton {
    /// Maps a raw driver button index to the portable identifier.
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Middle,
            _ => Self::Other,
        }
    }
}

//=== Pov =================================================================

/// Point-of-view hat (d-pad) direction.
///
/// Hardware reports one of eight discrete directions or centered; the
/// controller poller maps each direction onto a signed (x, y) axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pov {
    Centered,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Pov {
    //--- axes() -----------------------------------------------------------
    //
    // Eight-direction-to-sign lookup. Left-ish directions are -1 on X,
    // right-ish +1; up-ish are -1 on Y, down-ish +1; centered is (0, 0).
    //
    pub const fn axes(self) -> (f32, f32) {
        match self {
            Pov::Centered => (0.0, 0.0),
            Pov::Up => (0.0, -1.0),
            Pov::Down => (0.0, 1.0),
            Pov::Left => (-1.0, 0.0),
            Pov::Right => (1.0, 0.0),
            Pov::UpLeft => (-1.0, -1.0),
            Pov::UpRight => (1.0, -1.0),
            Pov::DownLeft => (-1.0, 1.0),
            Pov::DownRight => (1.0, 1.0),
        }
    }
}

impl Default for Pov {
    fn default() -> Self {
        Pov::Centered
    }
}

//=== InputEvent ==========================================================

/// Unified input event, ready for dispatch to the current game state.
///
/// Device pollers buffer their own richer event types; the
/// [`InputSystem`](crate::core::input::InputSystem) flattens those into
/// this enum when routing callbacks through the state controller.
///
/// Mouse coordinates are the poller's clamped absolute position;
/// `MouseMoved` carries both the previous and the new position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),

    MousePressed { button: MouseButton, x: i32, y: i32 },
    MouseReleased { button: MouseButton, x: i32, y: i32 },
    MouseMoved { old_x: i32, old_y: i32, new_x: i32, new_y: i32 },
    MouseWheel(i32),

    ControllerButtonPressed { controller: usize, button: usize },
    ControllerButtonReleased { controller: usize, button: usize },
    ControllerAxisMoved { controller: usize, axis: usize, value: f32 },
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Key Name Tables --------------------------------------------------

    #[test]
    fn key_name_round_trips() {
        for key in [
            KeyCode::Digit0,
            KeyCode::KeyA,
            KeyCode::KeyZ,
            KeyCode::F12,
            KeyCode::ArrowLeft,
            KeyCode::ShiftRight,
            KeyCode::Space,
            KeyCode::PageDown,
            KeyCode::Unidentified,
        ] {
            assert_eq!(KeyCode::from_name(key.name()), Some(key));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(KeyCode::from_name("Hyper"), None);
        assert_eq!(KeyCode::from_name(""), None);
        assert_eq!(KeyCode::from_name("a"), None, "lookup is case-sensitive");
    }

    #[test]
    fn key_indices_fit_the_table() {
        assert!(KeyCode::Digit0.index() < KEY_COUNT);
        assert!(KeyCode::Unidentified.index() < KEY_COUNT);
        assert_eq!(KeyCode::Unidentified.index(), KEY_COUNT - 1);
    }

    //--- Mouse Buttons ----------------------------------------------------

    #[test]
    fn button_index_mapping() {
        assert_eq!(MouseButton::from_index(0), MouseButton::Left);
        assert_eq!(MouseButton::from_index(1), MouseButton::Right);
        assert_eq!(MouseButton::from_index(2), MouseButton::Middle);
        assert_eq!(MouseButton::from_index(7), MouseButton::Other);
    }

    //--- POV Mapping ------------------------------------------------------

    #[test]
    fn pov_axes_signs() {
        assert_eq!(Pov::Centered.axes(), (0.0, 0.0));
        assert_eq!(Pov::Up.axes(), (0.0, -1.0));
        assert_eq!(Pov::Down.axes(), (0.0, 1.0));
        assert_eq!(Pov::Left.axes(), (-1.0, 0.0));
        assert_eq!(Pov::Right.axes(), (1.0, 0.0));
        assert_eq!(Pov::UpLeft.axes(), (-1.0, -1.0));
        assert_eq!(Pov::UpRight.axes(), (1.0, -1.0));
        assert_eq!(Pov::DownLeft.axes(), (-1.0, 1.0));
        assert_eq!(Pov::DownRight.axes(), (1.0, 1.0));
    }

    #[test]
    fn pov_default_is_centered() {
        assert_eq!(Pov::default(), Pov::Centered);
    }
}
