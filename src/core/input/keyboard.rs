//=========================================================================
// Keyboard Poller
//=========================================================================
//
// Polled/buffered duality over one native keyboard session.
//
// The live snapshot is a fixed-size down-state table indexed by
// `KeyCode::index()`; the buffered side is a FIFO of key state changes
// advanced with `next()`. Name ↔ code lookup lives on `KeyCode` itself
// as static tables.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;

//=== External Crates =====================================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::input::driver::{KeyboardDriver, RawKeyEvent};
use crate::core::input::event::{KeyCode, KEY_COUNT};
use crate::error::GameError;

//=== KeyEvent ============================================================

/// One buffered key state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub down: bool,
    pub timestamp: u64,
}

//=== Keyboard ============================================================

/// Polled/buffered view over one native keyboard session.
pub struct Keyboard {
    driver: Box<dyn KeyboardDriver>,
    created: bool,
    down: [bool; KEY_COUNT],
    scratch: Vec<RawKeyEvent>,
    queue: VecDeque<KeyEvent>,
    current: Option<KeyEvent>,
}

impl Keyboard {
    //--- Construction -----------------------------------------------------

    pub fn new(driver: Box<dyn KeyboardDriver>) -> Self {
        Self {
            driver,
            created: false,
            down: [false; KEY_COUNT],
            scratch: Vec::new(),
            queue: VecDeque::new(),
            current: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn open(&mut self) -> Result<(), GameError> {
        self.driver.create()?;
        self.created = true;
        debug!("Keyboard opened: {} key table entries", KEY_COUNT);
        Ok(())
    }

    pub fn close(&mut self) {
        if self.created {
            self.driver.destroy();
            self.created = false;
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    //--- Polling ----------------------------------------------------------

    /// Drains the driver, updating the down table and the event queue.
    pub fn poll(&mut self) -> Result<(), GameError> {
        if !self.created {
            return Err(GameError::DeviceNotCreated);
        }
        self.scratch.clear();
        self.driver.read_events(&mut self.scratch);
        for raw in self.scratch.drain(..) {
            self.down[raw.key.index()] = raw.down;
            self.queue.push_back(KeyEvent {
                key: raw.key,
                down: raw.down,
                timestamp: raw.timestamp,
            });
        }
        Ok(())
    }

    //--- Live Queries -----------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.down[key.index()]
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

    /// The event most recently returned by [`next`](Keyboard::next).
    pub fn event(&self) -> Option<&KeyEvent> {
        self.current.as_ref()
    }

    pub fn event_key(&self) -> Option<KeyCode> {
        self.current.map(|e| e.key)
    }

    pub fn event_pressed(&self) -> bool {
        self.current.map_or(false, |e| e.down)
    }

    pub fn event_timestamp(&self) -> u64 {
        self.current.map_or(0, |e| e.timestamp)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
