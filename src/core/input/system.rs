//=========================================================================
// Input System
//=========================================================================
//
// Front door for per-frame input handling. Owns whichever device pollers
// the platform attached, polls them in one call, and converts their
// buffered device events into unified [`InputEvent`]s routed through the
// state controller.
//
// Devices are optional: a headless setup attaches nothing and every call
// degrades to a no-op.
//
//=========================================================================

//=== External Crates =====================================================

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, MouseButton};
use crate::core::input::keyboard::Keyboard;
use crate::core::input::mouse::{Mouse, MouseEventKind};
use crate::core::input::pad::ControllerEventKind;
use crate::core::input::registry::ControllerRegistry;
use crate::core::state::StateBasedGame;
use crate::error::GameError;

//=== InputSystem =========================================================

/// Aggregates the attached device pollers behind one poll/dispatch pair.
pub struct InputSystem {
    mouse: Option<Mouse>,
    keyboard: Option<Keyboard>,
    controllers: ControllerRegistry,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates a system with no devices attached.
    pub fn new() -> Self {
        Self {
            mouse: None,
            keyboard: None,
            controllers: ControllerRegistry::empty(),
        }
    }

    //--- Device Attachment ------------------------------------------------

    /// Attaches an opened mouse poller, replacing any previous one.
    pub fn attach_mouse(&mut self, mouse: Mouse) {
        self.mouse = Some(mouse);
    }

    /// Attaches an opened keyboard poller, replacing any previous one.
    pub fn attach_keyboard(&mut self, keyboard: Keyboard) {
        self.keyboard = Some(keyboard);
    }

    /// Attaches a controller registry, replacing the previous one.
    pub fn attach_controllers(&mut self, controllers: ControllerRegistry) {
        self.controllers = controllers;
    }

    pub fn mouse(&self) -> Option<&Mouse> {
        self.mouse.as_ref()
    }

    pub fn mouse_mut(&mut self) -> Option<&mut Mouse> {
        self.mouse.as_mut()
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        self.keyboard.as_ref()
    }

    pub fn keyboard_mut(&mut self) -> Option<&mut Keyboard> {
        self.keyboard.as_mut()
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    //--- Bounds -----------------------------------------------------------

    /// Propagates the window client size to the mouse clamp region.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        if let Some(mouse) = &mut self.mouse {
            mouse.set_clamp(Some((width, height)));
        }
    }

    //--- Per-Frame Driving ------------------------------------------------

    /// Polls every attached device once. A failing device is logged and
    /// detached rather than poisoning the rest of the frame.
    pub fn poll(&mut self) {
        if let Some(mouse) = &mut self.mouse {
            if let Err(err) = mouse.poll() {
                warn!("mouse poll failed, detaching device: {err}");
                self.mouse = None;
            }
        }
        if let Some(keyboard) = &mut self.keyboard {
            if let Err(err) = keyboard.poll() {
                warn!("keyboard poll failed, detaching device: {err}");
                self.keyboard = None;
            }
        }
        self.controllers.poll_all();
    }

    /// Drains every buffered device event, converts it to an
    /// [`InputEvent`], and routes it through the state controller.
    ///
    /// Controllers drain first, then keyboard, then mouse; within a
    /// device the buffered order is preserved.
    pub fn dispatch<G>(&mut self, game: &mut StateBasedGame<G>) {
        while self.controllers.next() {
            if let Some(event) = self.controllers.event() {
                let converted = match event.kind {
                    ControllerEventKind::Button { button, down: true } => {
                        InputEvent::ControllerButtonPressed {
                            controller: event.controller,
                            button,
                        }
                    }
                    ControllerEventKind::Button { button, down: false } => {
                        InputEvent::ControllerButtonReleased {
                            controller: event.controller,
                            button,
                        }
                    }
                    ControllerEventKind::Axis { axis, value } => {
                        InputEvent::ControllerAxisMoved {
                            controller: event.controller,
                            axis,
                            value,
                        }
                    }
                };
                game.handle_input(&converted);
            }
        }

        if let Some(keyboard) = &mut self.keyboard {
            while keyboard.next() {
                if let Some(event) = keyboard.event() {
                    let converted = if event.down {
                        InputEvent::KeyPressed(event.key)
                    } else {
                        InputEvent::KeyReleased(event.key)
                    };
                    game.handle_input(&converted);
                }
            }
        }

        if let Some(mouse) = &mut self.mouse {
            while mouse.next() {
                if let Some(event) = mouse.event() {
                    let converted = match event.kind {
                        MouseEventKind::Moved => InputEvent::MouseMoved {
                            old_x: event.x - event.dx,
                            old_y: event.y - event.dy,
                            new_x: event.x,
                            new_y: event.y,
                        },
                        MouseEventKind::Button { index, down } => {
                            let button = MouseButton::from_index(index);
                            if down {
                                InputEvent::MousePressed { button, x: event.x, y: event.y }
                            } else {
                                InputEvent::MouseReleased { button, x: event.x, y: event.y }
                            }
                        }
                        MouseEventKind::Wheel(delta) => InputEvent::MouseWheel(delta),
                    };
                    game.handle_input(&converted);
                }
            }
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::container::GameContainer;
    use crate::core::input::driver::{
        KeyboardDriver, MouseDriver, RawKeyEvent, RawMouseEvent,
    };
    use crate::core::input::event::KeyCode;
    use crate::core::state::{GameState, StateId};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    //--- Fixtures ---------------------------------------------------------

    struct ScriptedMouse {
        batches: VecDeque<Vec<RawMouseEvent>>,
    }

    impl MouseDriver for ScriptedMouse {
        fn create(&mut self) -> Result<(), GameError> {
            Ok(())
        }

        fn destroy(&mut self) {}

        fn read_events(&mut self, out: &mut Vec<RawMouseEvent>) {
            if let Some(batch) = self.batches.pop_front() {
                out.extend(batch);
            }
        }

        fn grab(&mut self, _grabbed: bool) {}

        fn set_cursor_position(&mut self, _x: i32, _y: i32) {}

        fn button_count(&self) -> usize {
            3
        }

        fn has_wheel(&self) -> bool {
            true
        }
    }

    struct ScriptedKeyboard {
        batches: VecDeque<Vec<RawKeyEvent>>,
    }

    impl KeyboardDriver for ScriptedKeyboard {
        fn create(&mut self) -> Result<(), GameError> {
            Ok(())
        }

        fn destroy(&mut self) {}

        fn read_events(&mut self, out: &mut Vec<RawKeyEvent>) {
            if let Some(batch) = self.batches.pop_front() {
                out.extend(batch);
            }
        }
    }

    struct Sink {
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl GameState<()> for Sink {
        fn id(&self) -> StateId {
            7
        }

        fn key_pressed(&mut self, key: KeyCode) {
            self.journal.borrow_mut().push(format!("key {:?}", key));
        }

        fn mouse_pressed(&mut self, button: MouseButton, x: i32, y: i32) {
            self.journal
                .borrow_mut()
                .push(format!("press {:?} {} {}", button, x, y));
        }

        fn mouse_moved(&mut self, old_x: i32, old_y: i32, new_x: i32, new_y: i32) {
            self.journal
                .borrow_mut()
                .push(format!("move {} {} {} {}", old_x, old_y, new_x, new_y));
        }
    }

    fn game_with_sink(
        journal: &Rc<RefCell<Vec<String>>>,
    ) -> (StateBasedGame<()>, GameContainer<()>) {
        let mut game = StateBasedGame::new();
        let mut container = GameContainer::new(800, 600);
        game.add_state(&mut container, Sink { journal: Rc::clone(journal) })
            .unwrap();
        game.init(&mut container).unwrap();
        (game, container)
    }

    //--- Dispatch ---------------------------------------------------------

    #[test]
    fn empty_system_is_a_no_op() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let (mut game, _container) = game_with_sink(&journal);

        let mut system = InputSystem::new();
        system.poll();
        system.dispatch(&mut game);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn keyboard_events_reach_the_state() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let (mut game, _container) = game_with_sink(&journal);

        let mut keyboard = Keyboard::new(Box::new(ScriptedKeyboard {
            batches: VecDeque::from([vec![RawKeyEvent {
                key: KeyCode::Space,
                down: true,
                timestamp: 1,
            }]]),
        }));
        keyboard.open().unwrap();

        let mut system = InputSystem::new();
        system.attach_keyboard(keyboard);
        system.poll();
        system.dispatch(&mut game);

        assert_eq!(*journal.borrow(), vec!["key Space"]);
    }

    #[test]
    fn mouse_moves_report_old_and_new_positions() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let (mut game, _container) = game_with_sink(&journal);

        let mut mouse = Mouse::new(Box::new(ScriptedMouse {
            batches: VecDeque::from([vec![
                RawMouseEvent::Moved { x: 100, y: 100, dx: 0, dy: 0, timestamp: 1 },
                RawMouseEvent::Moved { x: 110, y: 95, dx: 10, dy: -5, timestamp: 2 },
                RawMouseEvent::Button { index: 0, down: true, timestamp: 3 },
            ]]),
        }));
        mouse.open().unwrap();

        let mut system = InputSystem::new();
        system.attach_mouse(mouse);
        system.poll();
        system.dispatch(&mut game);

        // The first move is the resync anchor (zero delta).
        assert_eq!(
            *journal.borrow(),
            vec![
                "move 100 100 100 100",
                "move 100 100 110 95",
                "press Left 110 95",
            ]
        );
    }

    #[test]
    fn bounds_propagate_to_the_mouse_clamp() {
        let mut mouse = Mouse::new(Box::new(ScriptedMouse {
            batches: VecDeque::from([vec![RawMouseEvent::Moved {
                x: 5000,
                y: 5000,
                dx: 0,
                dy: 0,
                timestamp: 1,
            }]]),
        }));
        mouse.open().unwrap();

        let mut system = InputSystem::new();
        system.attach_mouse(mouse);
        system.set_bounds(640, 480);
        system.poll();

        let mouse = system.mouse().unwrap();
        assert_eq!((mouse.x(), mouse.y()), (639, 479));
    }
}
