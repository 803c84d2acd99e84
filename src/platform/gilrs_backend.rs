//=========================================================================
// Gilrs Controller Backend
//=========================================================================
//
// Controller driver implementation on top of gilrs.
//
// One `Gilrs` context serves every attached pad, shared between the
// per-pad drivers through `Rc<RefCell<..>>` (gilrs contexts are neither
// cheap nor cloneable). `refresh` pumps the shared event queue; state
// queries then read the gamepad's cached snapshot.
//
// Axis and button indices are fixed tables so the same physical control
// lands on the same index regardless of OS or driver quirks. The D-pad
// is not exposed as buttons; it surfaces as the POV hat, which the
// poller turns into virtual axes.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== External Crates =====================================================

use gilrs::{Axis, Button, GamepadId, Gilrs};
use log::{info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::driver::{ControllerDriver, ControllerEnumerator};
use crate::core::input::event::Pov;
use crate::error::GameError;

//=== Index Tables ========================================================

/// Physical analog axes, in index order.
const AXIS_TABLE: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

/// Buttons, in index order (Xbox-style layout).
const BUTTON_TABLE: [Button; 13] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::Mode,
];

//=== POV Quantization ====================================================

/// Collapses the four D-pad buttons into a POV hat direction.
///
/// Opposed directions cancel rather than fight.
fn pov_from_dpad(up: bool, down: bool, left: bool, right: bool) -> Pov {
    let vertical = i8::from(down) - i8::from(up);
    let horizontal = i8::from(right) - i8::from(left);
    match (horizontal, vertical) {
        (-1, -1) => Pov::UpLeft,
        (0, -1) => Pov::Up,
        (1, -1) => Pov::UpRight,
        (-1, 0) => Pov::Left,
        (1, 0) => Pov::Right,
        (-1, 1) => Pov::DownLeft,
        (0, 1) => Pov::Down,
        (1, 1) => Pov::DownRight,
        _ => Pov::Centered,
    }
}

//=== Shared Context ======================================================

struct GilrsShared {
    gilrs: Gilrs,
}

impl GilrsShared {
    /// Drains pending gilrs events so gamepad snapshots are current.
    fn pump(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            trace!("gilrs event: {:?}", event.event);
        }
    }
}

//=== GilrsPad ============================================================

/// One attached pad, viewed through the shared gilrs context.
pub struct GilrsPad {
    shared: Rc<RefCell<GilrsShared>>,
    id: GamepadId,
    name: String,
}

impl ControllerDriver for GilrsPad {
    fn refresh(&mut self) {
        self.shared.borrow_mut().pump();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn axis_count(&self) -> usize {
        AXIS_TABLE.len()
    }

    fn button_count(&self) -> usize {
        BUTTON_TABLE.len()
    }

    fn axis_value(&self, axis: usize) -> f32 {
        let Some(&mapped) = AXIS_TABLE.get(axis) else {
            return 0.0;
        };
        let shared = self.shared.borrow();
        shared.gilrs.gamepad(self.id).value(mapped)
    }

    fn axis_dead_zone(&self, axis: usize) -> f32 {
        let Some(&mapped) = AXIS_TABLE.get(axis) else {
            return 0.0;
        };
        let shared = self.shared.borrow();
        let gamepad = shared.gilrs.gamepad(self.id);
        gamepad
            .axis_code(mapped)
            .and_then(|code| gamepad.deadzone(code))
            .unwrap_or(0.0)
    }

    fn button_down(&self, button: usize) -> bool {
        let Some(&mapped) = BUTTON_TABLE.get(button) else {
            return false;
        };
        let shared = self.shared.borrow();
        shared.gilrs.gamepad(self.id).is_pressed(mapped)
    }

    fn pov(&self) -> Pov {
        let shared = self.shared.borrow();
        let gamepad = shared.gilrs.gamepad(self.id);
        pov_from_dpad(
            gamepad.is_pressed(Button::DPadUp),
            gamepad.is_pressed(Button::DPadDown),
            gamepad.is_pressed(Button::DPadLeft),
            gamepad.is_pressed(Button::DPadRight),
        )
    }

    fn connected(&self) -> bool {
        self.shared.borrow().gilrs.gamepad(self.id).is_connected()
    }
}

//=== GilrsBackend ========================================================

/// Enumerates every pad gilrs can see, sharing one native context.
pub struct GilrsBackend {
    shared: Rc<RefCell<GilrsShared>>,
}

impl GilrsBackend {
    /// Initializes the native controller subsystem.
    pub fn new() -> Result<Self, GameError> {
        let gilrs = Gilrs::new().map_err(|e| GameError::Platform(e.to_string()))?;
        info!("gilrs initialized, {} pad(s) visible", gilrs.gamepads().count());
        Ok(Self {
            shared: Rc::new(RefCell::new(GilrsShared { gilrs })),
        })
    }
}

impl ControllerEnumerator for GilrsBackend {
    fn enumerate(&mut self) -> Vec<Box<dyn ControllerDriver>> {
        let pads: Vec<(GamepadId, String)> = {
            let shared = self.shared.borrow();
            shared
                .gilrs
                .gamepads()
                .map(|(id, gamepad)| (id, gamepad.name().to_string()))
                .collect()
        };

        if pads.is_empty() {
            warn!("no controllers detected");
        }

        pads.into_iter()
            .map(|(id, name)| {
                Box::new(GilrsPad {
                    shared: Rc::clone(&self.shared),
                    id,
                    name,
                }) as Box<dyn ControllerDriver>
            })
            .collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Native gilrs contexts are unavailable on CI runners; only the pure
    // mapping logic is exercised here.

    //--- POV Quantization -------------------------------------------------

    #[test]
    fn single_directions_map_straight() {
        assert_eq!(pov_from_dpad(true, false, false, false), Pov::Up);
        assert_eq!(pov_from_dpad(false, true, false, false), Pov::Down);
        assert_eq!(pov_from_dpad(false, false, true, false), Pov::Left);
        assert_eq!(pov_from_dpad(false, false, false, true), Pov::Right);
    }

    #[test]
    fn diagonals_combine() {
        assert_eq!(pov_from_dpad(true, false, true, false), Pov::UpLeft);
        assert_eq!(pov_from_dpad(false, true, false, true), Pov::DownRight);
    }

    #[test]
    fn opposed_directions_cancel() {
        assert_eq!(pov_from_dpad(true, true, false, false), Pov::Centered);
        assert_eq!(pov_from_dpad(true, true, true, true), Pov::Centered);
        assert_eq!(pov_from_dpad(false, false, false, false), Pov::Centered);
    }

    //--- Index Tables -----------------------------------------------------

    #[test]
    fn tables_have_no_duplicates() {
        for (i, a) in AXIS_TABLE.iter().enumerate() {
            assert!(!AXIS_TABLE[i + 1..].contains(a));
        }
        for (i, b) in BUTTON_TABLE.iter().enumerate() {
            assert!(!BUTTON_TABLE[i + 1..].contains(b));
        }
    }
}
