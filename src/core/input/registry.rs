//=========================================================================
// Controller Registry
//=========================================================================
//
// Enumerates available joystick-like devices, assigns stable indices,
// and aggregates their synthesized events into one ordered FIFO queue.
//
// Enumeration happens exactly once at `open`; indices follow enumeration
// order and never change for the registry's lifetime. The queue is
// single-producer (the `poll_all` call) / single-consumer (the `next`
// drain loop) per frame.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;
use std::time::Instant;

//=== External Crates =====================================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::input::driver::ControllerEnumerator;
use crate::core::input::pad::{Controller, ControllerEvent, ControllerEventKind};

//=== ControllerRegistry ==================================================

/// Owns every enumerated controller and the shared event queue.
pub struct ControllerRegistry {
    controllers: Vec<Controller>,
    queue: VecDeque<ControllerEvent>,
    current: Option<ControllerEvent>,

    /// Epoch for event timestamps (monotonic milliseconds).
    epoch: Instant,
}

impl ControllerRegistry {
    //--- Lifecycle --------------------------------------------------------

    /// Enumerates devices and assigns indices in enumeration order.
    pub fn open(enumerator: &mut dyn ControllerEnumerator) -> Self {
        let controllers: Vec<Controller> = enumerator
            .enumerate()
            .into_iter()
            .enumerate()
            .map(|(index, driver)| Controller::new(index, driver))
            .collect();

        info!("Controller registry opened: {} device(s)", controllers.len());
        for pad in &controllers {
            info!("  [{}] {}", pad.index(), pad.name());
        }

        Self {
            controllers,
            queue: VecDeque::new(),
            current: None,
            epoch: Instant::now(),
        }
    }

    /// An empty registry, for hosts without controller support.
    pub fn empty() -> Self {
        Self {
            controllers: Vec::new(),
            queue: VecDeque::new(),
            current: None,
            epoch: Instant::now(),
        }
    }

    //--- Access -----------------------------------------------------------

    pub fn count(&self) -> usize {
        self.controllers.len()
    }

    pub fn controller(&self, index: usize) -> Option<&Controller> {
        self.controllers.get(index)
    }

    pub fn controller_mut(&mut self, index: usize) -> Option<&mut Controller> {
        self.controllers.get_mut(index)
    }

    //--- Polling ----------------------------------------------------------

    /// Polls every controller once, appending change events to the
    /// shared queue in device order.
    pub fn poll_all(&mut self) {
        let now = self.epoch.elapsed().as_millis() as u64;
        for pad in &mut self.controllers {
            pad.poll(now, &mut self.queue);
        }
    }

    //--- Buffered Events --------------------------------------------------

    /// Advances to the next buffered event. Returns `false` when the
    /// queue is exhausted, leaving the current-event accessors untouched.
    pub fn next(&mut self) -> bool {
        match self.queue.pop_front() {
            Some(event) => {
                self.current = Some(event);
                true
            }
            None => false,
        }
    }

    /// The event most recently returned by [`next`](Self::next).
    pub fn event(&self) -> Option<&ControllerEvent> {
        self.current.as_ref()
    }

    /// Originating device index of the current event.
    pub fn event_controller(&self) -> Option<usize> {
        self.current.map(|e| e.controller)
    }

    /// Button index of the current event; `None` for axis events.
    pub fn event_button(&self) -> Option<usize> {
        match self.current {
            Some(ControllerEvent { kind: ControllerEventKind::Button { button, .. }, .. }) => {
                Some(button)
            }
            _ => None,
        }
    }

    /// Whether the current event is a button press.
    pub fn event_pressed(&self) -> bool {
        matches!(
            self.current,
            Some(ControllerEvent { kind: ControllerEventKind::Button { down: true, .. }, .. })
        )
    }

    /// Axis index of the current event; `None` for button events.
    pub fn event_axis(&self) -> Option<usize> {
        match self.current {
            Some(ControllerEvent { kind: ControllerEventKind::Axis { axis, .. }, .. }) => {
                Some(axis)
            }
            _ => None,
        }
    }

    /// Axis value of the current event; 0.0 for button events.
    pub fn event_value(&self) -> f32 {
        match self.current {
            Some(ControllerEvent { kind: ControllerEventKind::Axis { value, .. }, .. }) => value,
            _ => 0.0,
        }
    }

    pub fn event_timestamp(&self) -> u64 {
        self.current.map_or(0, |e| e.timestamp)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
