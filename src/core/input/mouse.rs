//=========================================================================
// Mouse Poller
//=========================================================================
//
// Reconciles one native mouse into a polled live snapshot plus a buffered
// queue of discrete events.
//
// Two coordinate regimes:
// - Grabbed: the cursor is hidden, raw relative deltas are trusted and
//   the absolute position is their running integral.
// - Ungrabbed: the cursor is visible, raw absolute positions are trusted
//   and deltas are derived against the previous raw reading.
//
// Switching regimes re-synchronizes the raw-position anchor: the first
// motion sample after a switch reports a zero delta instead of the jump
// between the two coordinate systems.
//
// `take_dx`/`take_dy`/`take_wheel` are consuming reads: each call returns
// the accumulation since the previous call and resets it.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;

//=== External Crates =====================================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::input::driver::{MouseDriver, RawMouseEvent};
use crate::error::GameError;

//=== Mouse Events ========================================================

/// What a buffered mouse event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Cursor motion; the delta lives on the enclosing event.
    Moved,

    /// Button state change.
    Button { index: usize, down: bool },

    /// Wheel movement by `delta` notches.
    Wheel(i32),
}

/// One buffered mouse event.
///
/// `x`/`y` are the poller's clamped absolute position at the time of the
/// event; `dx`/`dy` are the regime-appropriate deltas (zero for button
/// and wheel events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub timestamp: u64,
}

//=== Mouse ===============================================================

/// Polled/buffered view over one native mouse session.
pub struct Mouse {
    driver: Box<dyn MouseDriver>,
    created: bool,
    grabbed: bool,

    /// Set at open, on regime switches and cursor warps: the next motion
    /// sample re-anchors instead of producing a delta.
    resync: bool,

    /// Display bounds for position clamping, if any.
    clamp: Option<(u32, u32)>,

    //--- Live Snapshot ----------------------------------------------------
    x: i32,
    y: i32,
    buttons: Vec<bool>,

    /// Raw-position anchor for ungrabbed delta derivation.
    last_raw: (i32, i32),

    //--- Consuming Accumulators -------------------------------------------
    dx: i32,
    dy: i32,
    dwheel: i32,

    //--- Event Buffer -----------------------------------------------------
    scratch: Vec<RawMouseEvent>,
    queue: VecDeque<MouseEvent>,
    current: Option<MouseEvent>,
}

impl Mouse {
    //--- Construction -----------------------------------------------------

    /// Wraps a driver. No native resources are touched until [`open`].
    ///
    /// [`open`]: Mouse::open
    pub fn new(driver: Box<dyn MouseDriver>) -> Self {
        Self {
            driver,
            created: false,
            grabbed: false,
            resync: true,
            clamp: None,
            x: 0,
            y: 0,
            buttons: Vec::new(),
            last_raw: (0, 0),
            dx: 0,
            dy: 0,
            dwheel: 0,
            scratch: Vec::new(),
            queue: VecDeque::new(),
            current: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Acquires the native device and sizes the button table.
    pub fn open(&mut self) -> Result<(), GameError> {
        self.driver.create()?;
        self.buttons = vec![false; self.driver.button_count()];
        self.created = true;
        self.resync = true;
        debug!(
            "Mouse opened: {} buttons, wheel: {}",
            self.buttons.len(),
            self.driver.has_wheel()
        );
        Ok(())
    }

    /// Releases the native device. Queries return neutral values after.
    pub fn close(&mut self) {
        if self.created {
            self.driver.destroy();
            self.created = false;
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    //--- Configuration ----------------------------------------------------

    /// Clamps the absolute position (live and evented alike) to
    /// `[0, width-1] x [0, height-1]`. `None` disables clamping.
    pub fn set_clamp(&mut self, bounds: Option<(u32, u32)>) {
        self.clamp = bounds;
        let (x, y) = (self.x, self.y);
        let (x, y) = self.clamped(x, y);
        self.x = x;
        self.y = y;
    }

    /// Switches between grabbed (relative) and ungrabbed (absolute)
    /// regimes. The first motion sample after a switch re-anchors and
    /// reports a zero delta.
    pub fn set_grabbed(&mut self, grabbed: bool) {
        if grabbed == self.grabbed {
            return;
        }
        self.grabbed = grabbed;
        self.resync = true;
        self.driver.grab(grabbed);
        debug!("Mouse grab: {}", grabbed);
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Warps the cursor where the backend supports it. The live position
    /// follows immediately; the next motion sample re-anchors.
    pub fn set_position(&mut self, x: i32, y: i32) {
        let (x, y) = self.clamped(x, y);
        self.x = x;
        self.y = y;
        self.resync = true;
        self.driver.set_cursor_position(x, y);
    }

    //--- Polling ----------------------------------------------------------

    /// Drains the driver, updating the live snapshot and appending to the
    /// event queue.
    pub fn poll(&mut self) -> Result<(), GameError> {
        if !self.created {
            return Err(GameError::DeviceNotCreated);
        }
        self.scratch.clear();
        self.driver.read_events(&mut self.scratch);
        let raw = std::mem::take(&mut self.scratch);
        for event in &raw {
            self.apply(*event);
        }
        self.scratch = raw;
        Ok(())
    }

    fn apply(&mut self, raw: RawMouseEvent) {
        match raw {
            RawMouseEvent::Moved { x, y, dx, dy, timestamp } => {
                let (dx, dy) = if self.resync {
                    self.resync = false;
                    self.last_raw = (x, y);
                    if !self.grabbed {
                        let (cx, cy) = self.clamped(x, y);
                        self.x = cx;
                        self.y = cy;
                    }
                    (0, 0)
                } else if self.grabbed {
                    self.last_raw = (x, y);
                    let (cx, cy) = self.clamped(self.x + dx, self.y + dy);
                    self.x = cx;
                    self.y = cy;
                    (dx, dy)
                } else {
                    let (dx, dy) = (x - self.last_raw.0, y - self.last_raw.1);
                    self.last_raw = (x, y);
                    let (cx, cy) = self.clamped(x, y);
                    self.x = cx;
                    self.y = cy;
                    (dx, dy)
                };

                self.dx += dx;
                self.dy += dy;
                self.queue.push_back(MouseEvent {
                    kind: MouseEventKind::Moved,
                    x: self.x,
                    y: self.y,
                    dx,
                    dy,
                    timestamp,
                });
            }

            RawMouseEvent::Button { index, down, timestamp } => {
                if let Some(state) = self.buttons.get_mut(index) {
                    *state = down;
                }
                self.queue.push_back(MouseEvent {
                    kind: MouseEventKind::Button { index, down },
                    x: self.x,
                    y: self.y,
                    dx: 0,
                    dy: 0,
                    timestamp,
                });
            }

            RawMouseEvent::Wheel { delta, timestamp } => {
                self.dwheel += delta;
                self.queue.push_back(MouseEvent {
                    kind: MouseEventKind::Wheel(delta),
                    x: self.x,
                    y: self.y,
                    dx: 0,
                    dy: 0,
                    timestamp,
                });
            }
        }
    }

    fn clamped(&self, x: i32, y: i32) -> (i32, i32) {
        match self.clamp {
            Some((w, h)) => (
                x.clamp(0, w.saturating_sub(1) as i32),
                y.clamp(0, h.saturating_sub(1) as i32),
            ),
            None => (x, y),
        }
    }

    //--- Live Queries -----------------------------------------------------

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Out-of-range indices are `false`, never an error.
    pub fn is_button_down(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn has_wheel(&self) -> bool {
        self.driver.has_wheel()
    }

    //--- Consuming Delta Reads --------------------------------------------
    //
    // Deliberately stateful: each read returns the accumulation since the
    // previous read and resets it to zero.
    //

    pub fn take_dx(&mut self) -> i32 {
        std::mem::take(&mut self.dx)
    }

    pub fn take_dy(&mut self) -> i32 {
        std::mem::take(&mut self.dy)
    }

    pub fn take_wheel(&mut self) -> i32 {
        std::mem::take(&mut self.dwheel)
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

    /// The event most recently returned by [`next`](Mouse::next), if any.
    pub fn event(&self) -> Option<&MouseEvent> {
        self.current.as_ref()
    }

    /// Button index of the current event; `None` for motion and wheel.
    pub fn event_button(&self) -> Option<usize> {
        match self.current {
            Some(MouseEvent { kind: MouseEventKind::Button { index, .. }, .. }) => Some(index),
            _ => None,
        }
    }

    /// Whether the current event is a button press.
    pub fn event_pressed(&self) -> bool {
        matches!(
            self.current,
            Some(MouseEvent { kind: MouseEventKind::Button { down: true, .. }, .. })
        )
    }

    pub fn event_x(&self) -> i32 {
        self.current.map_or(0, |e| e.x)
    }

    pub fn event_y(&self) -> i32 {
        self.current.map_or(0, |e| e.y)
    }

    pub fn event_dx(&self) -> i32 {
        self.current.map_or(0, |e| e.dx)
    }

    pub fn event_dy(&self) -> i32 {
        self.current.map_or(0, |e| e.dy)
    }

    pub fn event_wheel(&self) -> i32 {
        match self.current {
            Some(MouseEvent { kind: MouseEventKind::Wheel(delta), .. }) => delta,
            _ => 0,
        }
    }

    pub fn event_timestamp(&self) -> u64 {
        self.current.map_or(0, |e| e.timestamp)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    //--- Mock Driver ------------------------------------------------------

    struct MockMouseDriver {
        batches: VecDeque<Vec<RawMouseEvent>>,
        grabs: Vec<bool>,
        created: bool,
    }

    impl MockMouseDriver {
        fn new() -> Self {
            Self {
                batches: VecDeque::new(),
                grabs: Vec::new(),
                created: false,
            }
        }

        fn with_batches(batches: Vec<Vec<RawMouseEvent>>) -> Self {
            Self {
                batches: batches.into(),
                grabs: Vec::new(),
                created: false,
            }
        }
    }

    impl MouseDriver for MockMouseDriver {
        fn create(&mut self) -> Result<(), GameError> {
            self.created = true;
            Ok(())
        }

        fn destroy(&mut self) {
            self.created = false;
        }

        fn read_events(&mut self, out: &mut Vec<RawMouseEvent>) {
            if let Some(batch) = self.batches.pop_front() {
                out.extend(batch);
            }
        }

        fn grab(&mut self, grabbed: bool) {
            self.grabs.push(grabbed);
        }

        fn set_cursor_position(&mut self, _x: i32, _y: i32) {}

        fn button_count(&self) -> usize {
            3
        }

        fn has_wheel(&self) -> bool {
            true
        }
    }

    fn moved(x: i32, y: i32, dx: i32, dy: i32) -> RawMouseEvent {
        RawMouseEvent::Moved { x, y, dx, dy, timestamp: 1 }
    }

    fn opened(batches: Vec<Vec<RawMouseEvent>>) -> Mouse {
        let mut mouse = Mouse::new(Box::new(MockMouseDriver::with_batches(batches)));
        mouse.open().unwrap();
        mouse
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn poll_before_open_is_an_error() {
        let mut mouse = Mouse::new(Box::new(MockMouseDriver::new()));
        assert!(matches!(mouse.poll(), Err(GameError::DeviceNotCreated)));
    }

    #[test]
    fn open_sizes_button_table() {
        let mouse = opened(vec![]);
        assert_eq!(mouse.button_count(), 3);
        assert!(mouse.has_wheel());
    }

    //--- Ungrabbed Regime -------------------------------------------------

    #[test]
    fn first_sample_anchors_without_spurious_delta() {
        let mut mouse = opened(vec![vec![moved(100, 150, 0, 0)]]);
        mouse.poll().unwrap();

        assert_eq!((mouse.x(), mouse.y()), (100, 150));
        assert_eq!(mouse.take_dx(), 0);
        assert_eq!(mouse.take_dy(), 0);
    }

    #[test]
    fn ungrabbed_deltas_derive_from_previous_absolute() {
        let mut mouse = opened(vec![
            vec![moved(100, 100, 0, 0)],
            vec![moved(110, 95, 0, 0)],
        ]);
        mouse.poll().unwrap();
        mouse.poll().unwrap();

        assert_eq!((mouse.x(), mouse.y()), (110, 95));
        assert_eq!(mouse.take_dx(), 10);
        assert_eq!(mouse.take_dy(), -5);
    }

    //--- Consuming Reads --------------------------------------------------

    #[test]
    fn delta_reads_consume() {
        let mut mouse = opened(vec![
            vec![moved(0, 0, 0, 0)],
            vec![moved(7, 3, 0, 0)],
        ]);
        mouse.poll().unwrap();
        mouse.poll().unwrap();

        assert_eq!(mouse.take_dx(), 7);
        assert_eq!(mouse.take_dx(), 0, "second read with no poll is zero");
        assert_eq!(mouse.take_dy(), 3);
        assert_eq!(mouse.take_dy(), 0);
    }

    #[test]
    fn wheel_accumulates_and_consumes() {
        let mut mouse = opened(vec![vec![
            RawMouseEvent::Wheel { delta: 2, timestamp: 1 },
            RawMouseEvent::Wheel { delta: -1, timestamp: 2 },
        ]]);
        mouse.poll().unwrap();

        assert_eq!(mouse.take_wheel(), 1);
        assert_eq!(mouse.take_wheel(), 0);
    }

    //--- Regime Switching -------------------------------------------------

    #[test]
    fn grab_switch_does_not_leak_a_jump() {
        let mut mouse = opened(vec![
            vec![moved(400, 300, 0, 0)],
            // Post-grab anchor jumps to the warp position; the raw
            // absolute no longer relates to the pre-grab reading.
            vec![moved(10, 10, 0, 0)],
            vec![moved(10, 10, 4, -2)],
        ]);
        mouse.poll().unwrap();
        mouse.take_dx();
        mouse.take_dy();

        mouse.set_grabbed(true);
        mouse.poll().unwrap();
        assert_eq!(mouse.take_dx(), 0, "first sample after switch is silent");
        assert_eq!(mouse.take_dy(), 0);

        mouse.poll().unwrap();
        assert_eq!(mouse.take_dx(), 4);
        assert_eq!(mouse.take_dy(), -2);
    }

    #[test]
    fn grabbed_position_integrates_deltas() {
        let mut mouse = opened(vec![
            vec![moved(200, 200, 0, 0)],
            vec![moved(0, 0, 0, 0)],
            vec![moved(0, 0, 15, 10)],
            vec![moved(0, 0, -5, 5)],
        ]);
        mouse.poll().unwrap();
        mouse.set_grabbed(true);
        mouse.poll().unwrap(); // re-anchor, position holds at (200, 200)
        mouse.poll().unwrap();
        mouse.poll().unwrap();

        assert_eq!((mouse.x(), mouse.y()), (210, 215));
    }

    #[test]
    fn regrab_same_mode_is_a_noop() {
        let mut mouse = opened(vec![]);
        mouse.set_grabbed(false);
        assert!(!mouse.is_grabbed());
    }

    //--- Clamping ---------------------------------------------------------

    #[test]
    fn live_and_event_positions_clamp_identically() {
        let mut mouse = opened(vec![
            vec![moved(10, 10, 0, 0)],
            vec![moved(1000, -40, 0, 0)],
        ]);
        mouse.set_clamp(Some((640, 480)));
        mouse.poll().unwrap();
        mouse.poll().unwrap();

        assert_eq!((mouse.x(), mouse.y()), (639, 0));

        // Second buffered event reports the same clamped position.
        assert!(mouse.next());
        assert!(mouse.next());
        assert_eq!((mouse.event_x(), mouse.event_y()), (639, 0));
    }

    //--- Buffered Events --------------------------------------------------

    #[test]
    fn exhausted_queue_is_idempotent() {
        let mut mouse = opened(vec![vec![RawMouseEvent::Button {
            index: 0,
            down: true,
            timestamp: 42,
        }]]);
        mouse.poll().unwrap();

        assert!(mouse.next());
        assert_eq!(mouse.event_button(), Some(0));
        assert!(mouse.event_pressed());
        assert_eq!(mouse.event_timestamp(), 42);

        assert!(!mouse.next());
        assert!(!mouse.next());
        // Current event untouched by the failed advances.
        assert_eq!(mouse.event_button(), Some(0));
        assert_eq!(mouse.event_timestamp(), 42);
    }

    #[test]
    fn accessors_are_neutral_before_any_event() {
        let mouse = opened(vec![]);
        assert_eq!(mouse.event_button(), None);
        assert!(!mouse.event_pressed());
        assert_eq!(mouse.event_x(), 0);
        assert_eq!(mouse.event_dx(), 0);
        assert_eq!(mouse.event_wheel(), 0);
        assert_eq!(mouse.event_timestamp(), 0);
    }

    //--- Button Table -----------------------------------------------------

    #[test]
    fn button_state_tracks_and_out_of_range_is_false() {
        let mut mouse = opened(vec![
            vec![RawMouseEvent::Button { index: 1, down: true, timestamp: 1 }],
            vec![RawMouseEvent::Button { index: 1, down: false, timestamp: 2 }],
        ]);
        mouse.poll().unwrap();
        assert!(mouse.is_button_down(1));
        assert!(!mouse.is_button_down(99));

        mouse.poll().unwrap();
        assert!(!mouse.is_button_down(1));
    }
}
