//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the device pollers via channels.
//
// Architecture:
// ```text
//  Main Thread:                      Logic Side:
//  ┌──────────────────────────┐     ┌────────────────────┐
//  │  Winit Event Loop        │     │  InputSystem       │
//  │   ↓                      │     │   ├─ Mouse         │
//  │  event_mapper            │     │   ├─ Keyboard      │
//  │   ├─ KeyboardInput       │     │   └─ Controllers   │
//  │   ├─ MouseInput / Wheel  │     │   ↓                │
//  │   └─ Cursor/MouseMotion  │     │  StateBasedGame    │
//  │   ↓                      │     └────────────────────┘
//  │  crossbeam channels ─────┼──────────↑   │
//  │   ↑                      │              │
//  │  CursorCommand ←─────────┼──────────────┘
//  │  (applied at redraw)     │
//  └──────────────────────────┘
// ```
//
// Key design decisions:
// - **Channels, not callbacks**: the window host never calls into game
//   code; it only feeds the channel drivers in `channel`, keeping the
//   core headless-testable.
// - **Grab decides the motion source**: ungrabbed motion comes from
//   `CursorMoved` (absolute), grabbed motion from the raw device stream
//   (relative). Sending both for one physical move would double-count.
// - **Cursor commands at the frame boundary**: grab and warp requests
//   from the logic side are applied once per `RedrawRequested`, so a
//   frame's worth of requests collapses into the final state.
// - **Graceful channel disconnect**: if the logic side is gone the host
//   logs and keeps running so the user can still close the window.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod channel;
mod event_mapper;
pub mod gilrs_backend;

//=== Standard Library Imports ============================================

use std::time::Instant;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::input::driver::{RawKeyEvent, RawMouseEvent};
use crate::error::GameError;
use channel::{ChannelKeyboardDriver, ChannelMouseDriver, CursorCommand};

pub use gilrs_backend::GilrsBackend;

//=== PlatformNote ========================================================

/// Out-of-band happenings the logic side needs to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformNote {
    /// The window client area changed size.
    Resized { width: u32, height: u32 },

    /// The user or OS asked the window to close.
    CloseRequested,
}

//=== PlatformHandles =====================================================

/// Logic-side ends of the platform channels.
///
/// Hand the drivers to the device pollers and watch `notes` for resize
/// and shutdown.
pub struct PlatformHandles {
    pub mouse: ChannelMouseDriver,
    pub keyboard: ChannelKeyboardDriver,
    pub notes: Receiver<PlatformNote>,
}

//=== Platform ============================================================

/// Window host and raw-event pump.
///
/// Runs on the main thread (a Winit requirement on macOS/iOS) and feeds
/// the channel drivers. Not Send: communication with the logic side
/// happens exclusively over the channels created in [`Platform::open`].
pub struct Platform {
    /// OS window handle (None until `resumed` fires).
    window: Option<Window>,

    title: String,
    width: u32,
    height: u32,

    mouse_tx: Sender<RawMouseEvent>,
    key_tx: Sender<RawKeyEvent>,
    cursor_rx: Receiver<CursorCommand>,
    note_tx: Sender<PlatformNote>,

    /// Origin for event timestamps (monotonic milliseconds).
    epoch: Instant,

    /// Mirrors the grab state last applied to the window; selects which
    /// native motion stream is forwarded.
    grabbed: bool,

    /// Last absolute cursor position seen, for deriving window-event
    /// deltas and anchoring relative motion.
    last_cursor: Option<(i32, i32)>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the host and the logic-side handles. The window itself is
    /// created lazily once the event loop starts.
    pub fn open(title: &str, width: u32, height: u32) -> (Self, PlatformHandles) {
        let (mouse_tx, mouse_rx) = unbounded();
        let (key_tx, key_rx) = unbounded();
        let (cursor_tx, cursor_rx) = unbounded();
        let (note_tx, note_rx) = unbounded();

        info!("platform channels ready for \"{}\" ({}x{})", title, width, height);

        let platform = Self {
            window: None,
            title: title.to_string(),
            width,
            height,
            mouse_tx,
            key_tx,
            cursor_rx,
            note_tx,
            epoch: Instant::now(),
            grabbed: false,
            last_cursor: None,
        };

        let handles = PlatformHandles {
            mouse: ChannelMouseDriver::new(mouse_rx, cursor_tx),
            keyboard: ChannelKeyboardDriver::new(key_rx),
            notes: note_rx,
        };

        (platform, handles)
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// Blocks the calling thread; must be the main thread.
    pub fn run(mut self) -> Result<(), GameError> {
        debug!("starting winit event loop");
        let event_loop =
            EventLoop::new().map_err(|e| GameError::Platform(e.to_string()))?;
        event_loop
            .run_app(&mut self)
            .map_err(|e| GameError::Platform(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn send_mouse(&self, event: RawMouseEvent) {
        if self.mouse_tx.send(event).is_err() {
            trace!("logic side gone, dropping mouse event");
        }
    }

    fn send_key(&self, event: RawKeyEvent) {
        if self.key_tx.send(event).is_err() {
            trace!("logic side gone, dropping key event");
        }
    }

    /// Applies every cursor command queued since the previous frame.
    fn apply_cursor_commands(&mut self) {
        while let Ok(command) = self.cursor_rx.try_recv() {
            let Some(window) = &self.window else {
                warn!("no window yet, dropping cursor command {:?}", command);
                continue;
            };
            match command {
                CursorCommand::Grab(grabbed) => {
                    let mode = if grabbed {
                        // Locked is unsupported on some platforms;
                        // Confined still gives relative motion.
                        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
                        }
                        "grabbed"
                    } else {
                        let _ = window.set_cursor_grab(CursorGrabMode::None);
                        "released"
                    };
                    window.set_cursor_visible(!grabbed);
                    self.grabbed = grabbed;
                    debug!("cursor {}", mode);
                }
                CursorCommand::SetPosition(x, y) => {
                    if let Err(e) =
                        window.set_cursor_position(PhysicalPosition::new(x, y))
                    {
                        warn!("cursor warp to ({}, {}) failed: {}", x, y, e);
                    } else {
                        self.last_cursor = Some((x, y));
                    }
                }
            }
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation; mobile resumes reuse it.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!("window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    "window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!("window creation failed: {}", e);
                let _ = self.note_tx.send(PlatformNote::CloseRequested);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                let _ = self.note_tx.send(PlatformNote::CloseRequested);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if self.note_tx
                    .send(PlatformNote::Resized {
                        width: size.width,
                        height: size.height,
                    })
                    .is_err()
                {
                    trace!("logic side gone, dropping resize note");
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(raw) = event_mapper::map_key_event(&key_event, self.now_ms()) {
                    self.send_key(raw);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.send_mouse(event_mapper::map_mouse_button(
                    button,
                    state,
                    self.now_ms(),
                ));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(raw) = event_mapper::map_wheel(delta, self.now_ms()) {
                    self.send_mouse(raw);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let x = position.x as i32;
                let y = position.y as i32;
                let (dx, dy) = match self.last_cursor {
                    Some((px, py)) => (x - px, y - py),
                    None => (0, 0),
                };
                self.last_cursor = Some((x, y));

                // Grabbed motion comes from the raw device stream.
                if !self.grabbed {
                    self.send_mouse(RawMouseEvent::Moved {
                        x,
                        y,
                        dx,
                        dy,
                        timestamp: self.now_ms(),
                    });
                }
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: fold queued cursor commands into the
                // final window state, then schedule the next frame.
                self.apply_cursor_commands();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Focused, Moved, etc.
            }
        }
    }

    /// Raw device motion: the source of truth while grabbed.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.grabbed {
                let (x, y) = self.last_cursor.unwrap_or((0, 0));
                self.send_mouse(RawMouseEvent::Moved {
                    x,
                    y,
                    dx: dx as i32,
                    dy: dy as i32,
                    timestamp: self.now_ms(),
                });
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::driver::MouseDriver;
    use crate::core::input::event::KeyCode;

    #[test]
    fn open_wires_the_channels_through() {
        let (platform, mut handles) = Platform::open("test", 640, 480);

        platform.send_mouse(RawMouseEvent::Wheel { delta: 1, timestamp: 5 });
        platform.send_key(RawKeyEvent {
            key: KeyCode::Escape,
            down: true,
            timestamp: 5,
        });

        let mut mouse_out = Vec::new();
        handles.mouse.read_events(&mut mouse_out);
        assert_eq!(mouse_out, vec![RawMouseEvent::Wheel { delta: 1, timestamp: 5 }]);

        let mut key_out = Vec::new();
        use crate::core::input::driver::KeyboardDriver;
        handles.keyboard.read_events(&mut key_out);
        assert_eq!(key_out.len(), 1);
        assert_eq!(key_out[0].key, KeyCode::Escape);
    }

    #[test]
    fn cursor_commands_without_a_window_are_dropped() {
        let (mut platform, mut handles) = Platform::open("test", 640, 480);

        handles.mouse.grab(true);
        handles.mouse.set_cursor_position(10, 10);

        // No window exists yet; draining must not panic or block.
        platform.apply_cursor_commands();
        assert!(platform.cursor_rx.try_recv().is_err());
    }

    #[test]
    fn dropped_logic_side_does_not_poison_the_host() {
        let (platform, handles) = Platform::open("test", 640, 480);
        drop(handles);

        platform.send_mouse(RawMouseEvent::Wheel { delta: 1, timestamp: 1 });
        platform.send_key(RawKeyEvent {
            key: KeyCode::Space,
            down: true,
            timestamp: 1,
        });
        let _ = platform.note_tx.send(PlatformNote::CloseRequested);
    }
}
