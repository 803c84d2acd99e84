//=========================================================================
// Channel-Backed Device Drivers
//=========================================================================
//
// Driver implementations that sit on the logic side of the platform
// boundary. The windowing thread pushes raw events into crossbeam
// channels; these drivers drain them non-blockingly when the pollers
// ask. Cursor control flows the other way, as commands the windowing
// thread applies at its next frame boundary.
//
// A disconnected channel is tolerated: the windowing thread may exit
// first during shutdown, and the drivers then simply report nothing.
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::driver::{KeyboardDriver, MouseDriver, RawKeyEvent, RawMouseEvent};
use crate::error::GameError;

//=== CursorCommand =======================================================

/// Cursor control request sent back to the windowing thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Switch between grabbed (hidden, relative) and ungrabbed modes.
    Grab(bool),

    /// Warp the native cursor to a window-relative position.
    SetPosition(i32, i32),
}

//=== ChannelMouseDriver ==================================================

/// Mouse driver fed by the windowing thread over a channel.
pub struct ChannelMouseDriver {
    events: Receiver<RawMouseEvent>,
    commands: Sender<CursorCommand>,
    button_count: usize,
    created: bool,
}

impl ChannelMouseDriver {
    pub fn new(events: Receiver<RawMouseEvent>, commands: Sender<CursorCommand>) -> Self {
        Self {
            events,
            commands,
            button_count: 3,
            created: false,
        }
    }

    fn send_command(&self, command: CursorCommand) {
        if self.commands.send(command).is_err() {
            warn!("window thread gone, dropping cursor command {:?}", command);
        }
    }
}

impl MouseDriver for ChannelMouseDriver {
    fn create(&mut self) -> Result<(), GameError> {
        self.created = true;
        Ok(())
    }

    fn destroy(&mut self) {
        self.created = false;
        // Leave the cursor usable for whoever owns the window next.
        self.send_command(CursorCommand::Grab(false));
    }

    fn read_events(&mut self, out: &mut Vec<RawMouseEvent>) {
        loop {
            match self.events.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn grab(&mut self, grabbed: bool) {
        self.send_command(CursorCommand::Grab(grabbed));
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.send_command(CursorCommand::SetPosition(x, y));
    }

    fn button_count(&self) -> usize {
        self.button_count
    }

    fn has_wheel(&self) -> bool {
        true
    }
}

//=== ChannelKeyboardDriver ===============================================

/// Keyboard driver fed by the windowing thread over a channel.
pub struct ChannelKeyboardDriver {
    events: Receiver<RawKeyEvent>,
    created: bool,
}

impl ChannelKeyboardDriver {
    pub fn new(events: Receiver<RawKeyEvent>) -> Self {
        Self { events, created: false }
    }
}

impl KeyboardDriver for ChannelKeyboardDriver {
    fn create(&mut self) -> Result<(), GameError> {
        self.created = true;
        Ok(())
    }

    fn destroy(&mut self) {
        self.created = false;
    }

    fn read_events(&mut self, out: &mut Vec<RawKeyEvent>) {
        loop {
            match self.events.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
