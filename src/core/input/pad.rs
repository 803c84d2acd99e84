//=========================================================================
// Controller Poller
//=========================================================================
//
// Reconciles one joystick-like device into normalized axis/button state
// and synthesizes change events into the registry's shared queue.
//
// Axis pipeline, per raw sample:
//   1. Dead zone: the larger of the configured zone (default 0.05) and
//      any device-reported zone; magnitudes below it are forced to zero.
//   2. Calibration: a per-axis running maximum, starting at 1.0 and never
//      decreasing, is raised when the sample's magnitude exceeds it.
//   3. The (possibly zeroed) sample is divided by the running maximum.
//
// The calibration is deliberately lossy: an early extreme reading
// permanently desensitizes the axis's future reported range.
//
// POV hats are mapped onto two virtual axes appended after the physical
// ones; virtual samples flow through the same pipeline (their running
// maximum stays at 1.0, so ±1 inputs pass through unchanged).
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use crate::core::input::driver::ControllerDriver;

//=== Constants ===========================================================

/// Default per-axis dead zone.
pub const DEFAULT_DEAD_ZONE: f32 = 0.05;

/// Virtual axes appended for the POV hat (X then Y).
pub const POV_AXES: usize = 2;

//=== Controller Events ===================================================

/// What a buffered controller event reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEventKind {
    Button { button: usize, down: bool },
    Axis { axis: usize, value: f32 },
}

/// One buffered controller event, tagged with the originating device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerEvent {
    pub controller: usize,
    pub kind: ControllerEventKind,
    pub timestamp: u64,
}

//=== Controller ==========================================================

/// Normalized view over one joystick-like device.
///
/// Owned by the [`ControllerRegistry`](super::ControllerRegistry), which
/// assigns the device index and holds the shared event queue this poller
/// feeds.
pub struct Controller {
    index: usize,
    driver: Box<dyn ControllerDriver>,

    /// Configured zones, one per axis (physical + virtual).
    dead_zones: Vec<f32>,

    /// Running-maximum calibration, monotonically non-decreasing.
    peaks: Vec<f32>,

    /// Last reported normalized values; change detection baseline.
    axes: Vec<f32>,

    buttons: Vec<bool>,
}

impl Controller {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(index: usize, driver: Box<dyn ControllerDriver>) -> Self {
        let total_axes = driver.axis_count() + POV_AXES;
        let buttons = vec![false; driver.button_count()];
        Self {
            index,
            driver,
            dead_zones: vec![DEFAULT_DEAD_ZONE; total_axes],
            peaks: vec![1.0; total_axes],
            axes: vec![0.0; total_axes],
            buttons,
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        self.driver.name()
    }

    /// Physical axis count; virtual POV axes come after these.
    pub fn axis_count(&self) -> usize {
        self.driver.axis_count()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Index of the virtual POV X axis.
    pub fn pov_x_axis(&self) -> usize {
        self.driver.axis_count()
    }

    /// Index of the virtual POV Y axis.
    pub fn pov_y_axis(&self) -> usize {
        self.driver.axis_count() + 1
    }

    //--- Configuration ----------------------------------------------------

    /// Overrides the dead zone for one axis. Out-of-range is ignored.
    pub fn set_dead_zone(&mut self, axis: usize, zone: f32) {
        if let Some(slot) = self.dead_zones.get_mut(axis) {
            *slot = zone;
        }
    }

    /// Configured dead zone for an axis; out-of-range is the default.
    pub fn dead_zone(&self, axis: usize) -> f32 {
        self.dead_zones.get(axis).copied().unwrap_or(DEFAULT_DEAD_ZONE)
    }

    //--- Live Queries -----------------------------------------------------

    /// Last normalized value of an axis (physical or virtual), in
    /// [-1, 1]. Out-of-range indices are 0.0.
    pub fn axis_value(&self, axis: usize) -> f32 {
        self.axes.get(axis).copied().unwrap_or(0.0)
    }

    pub fn pov_x(&self) -> f32 {
        self.axis_value(self.pov_x_axis())
    }

    pub fn pov_y(&self) -> f32 {
        self.axis_value(self.pov_y_axis())
    }

    /// Out-of-range indices are `false`, never an error.
    pub fn is_button_down(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }

    //--- Polling ----------------------------------------------------------

    /// Samples the driver and synthesizes one event per changed button
    /// or axis into `queue`, tagged with this device's index and `now`.
    pub(crate) fn poll(&mut self, now: u64, queue: &mut VecDeque<ControllerEvent>) {
        self.driver.refresh();
        if !self.driver.connected() {
            return;
        }

        for axis in 0..self.driver.axis_count() {
            let raw = self.driver.axis_value(axis);
            let device_zone = self.driver.axis_dead_zone(axis);
            let value = self.normalize(axis, raw, device_zone);
            self.report_axis(axis, value, now, queue);
        }

        let (pov_x, pov_y) = self.driver.pov().axes();
        let x_axis = self.pov_x_axis();
        let y_axis = self.pov_y_axis();
        let value = self.normalize(x_axis, pov_x, 0.0);
        self.report_axis(x_axis, value, now, queue);
        let value = self.normalize(y_axis, pov_y, 0.0);
        self.report_axis(y_axis, value, now, queue);

        for button in 0..self.buttons.len() {
            let down = self.driver.button_down(button);
            if down != self.buttons[button] {
                self.buttons[button] = down;
                queue.push_back(ControllerEvent {
                    controller: self.index,
                    kind: ControllerEventKind::Button { button, down },
                    timestamp: now,
                });
            }
        }
    }

    //--- Normalization ----------------------------------------------------

    fn normalize(&mut self, axis: usize, raw: f32, device_zone: f32) -> f32 {
        let zone = self.dead_zones[axis].max(device_zone);
        let value = if raw.abs() < zone { 0.0 } else { raw };

        let magnitude = value.abs();
        if magnitude > self.peaks[axis] {
            self.peaks[axis] = magnitude;
        }

        value / self.peaks[axis]
    }

    fn report_axis(
        &mut self,
        axis: usize,
        value: f32,
        now: u64,
        queue: &mut VecDeque<ControllerEvent>,
    ) {
        if (value - self.axes[axis]).abs() > f32::EPSILON {
            self.axes[axis] = value;
            queue.push_back(ControllerEvent {
                controller: self.index,
                kind: ControllerEventKind::Axis { axis, value },
                timestamp: now,
            });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
