//=========================================================================
// State-Based Game Controller
//=========================================================================
//
// Owns the collection of game states and drives the current/next-state
// transition protocol.
//
// Phase machine:
//   Steady   — no transition; the current state owns update/render
//   Leaving  — the leave transition counts toward completion
//   Entering — the enter transition counts down, leave already cleared
//
// Phases execute in strict sequence Leaving → Entering → Steady, and
// exactly one phase branch runs per update call: a frame that advances
// a transition never also runs steady-state logic. There is no API to
// abort a pending transition.
//
// Input routing: every callback is forwarded to the current state unless
// a transition is in progress or updates are paused; suppressed input is
// dropped, never buffered.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== External Crates =====================================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::container::GameContainer;
use crate::core::input::event::InputEvent;
use crate::core::state::transition::{EmptyTransition, Transition};
use crate::core::state::{GameState, StateId, NO_STATE};
use crate::error::GameError;

//=== TransitionPhase =====================================================

/// Exactly one of these describes the controller at any instant.
enum TransitionPhase<G> {
    Steady,
    Leaving {
        target: StateId,
        leave: Box<dyn Transition<G>>,
        enter: Box<dyn Transition<G>>,
    },
    Entering {
        enter: Box<dyn Transition<G>>,
    },
}

//=== StateBasedGame ======================================================

/// State registry plus the machine that moves between states.
///
/// States are registered once by ID; the first state added becomes the
/// initial current state. Registering a duplicate ID replaces the
/// previous entry (last write wins, logged as a warning).
pub struct StateBasedGame<G> {
    states: HashMap<StateId, Box<dyn GameState<G>>>,

    /// Registration order; drives `init` ordering. A replaced ID keeps
    /// its original position.
    order: Vec<StateId>,

    current: StateId,
    phase: TransitionPhase<G>,
    initialized: bool,

    update_paused: bool,
    render_paused: bool,
}

impl<G> StateBasedGame<G> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty controller. `current_state_id` reports
    /// [`NO_STATE`] until the first state is added.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            current: NO_STATE,
            phase: TransitionPhase::Steady,
            initialized: false,
            update_paused: false,
            render_paused: false,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state. The first state added becomes current; if the
    /// game is already initialized, the state's `init` runs immediately.
    pub fn add_state<S>(
        &mut self,
        container: &mut GameContainer<G>,
        state: S,
    ) -> Result<(), GameError>
    where
        S: GameState<G> + 'static,
    {
        let id = state.id();
        let mut boxed: Box<dyn GameState<G>> = Box::new(state);

        if self.initialized {
            boxed.init(container)?;
        }

        if self.states.insert(id, boxed).is_some() {
            warn!("game state {} was already registered and has been replaced", id);
        } else {
            self.order.push(id);
        }

        if self.current == NO_STATE {
            self.current = id;
        }
        Ok(())
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn has_state(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    //--- Initialization ---------------------------------------------------

    /// Initializes every registered state, in registration order, then
    /// enters the initial current state. Runs at most once.
    pub fn init(&mut self, container: &mut GameContainer<G>) -> Result<(), GameError> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;

        let order = self.order.clone();
        for id in order {
            if let Some(state) = self.states.get_mut(&id) {
                state.init(container)?;
            }
        }

        if let Some(state) = self.states.get_mut(&self.current) {
            debug!("entering initial state {}", self.current);
            state.enter(container);
        }
        Ok(())
    }

    //--- State Changes ----------------------------------------------------

    /// Requests a transition to `target` with the empty transitions.
    pub fn enter_state(&mut self, target: StateId) -> Result<(), GameError> {
        self.enter_state_with(target, Box::new(EmptyTransition), Box::new(EmptyTransition))
    }

    /// Requests a transition to `target` with explicit leave and enter
    /// transitions.
    ///
    /// An unknown `target` is a fatal configuration error: the request
    /// fails and the controller is left exactly as it was. A request
    /// made while a transition is pending replaces that transition.
    pub fn enter_state_with(
        &mut self,
        target: StateId,
        mut leave: Box<dyn Transition<G>>,
        enter: Box<dyn Transition<G>>,
    ) -> Result<(), GameError> {
        if !self.states.contains_key(&target) {
            return Err(GameError::UnknownState(target));
        }

        if let (Some(from), Some(to)) = (self.states.get(&self.current), self.states.get(&target))
        {
            leave.init(from.as_ref(), to.as_ref());
        }

        debug!("leaving state {} for {}", self.current, target);
        self.phase = TransitionPhase::Leaving { target, leave, enter };
        Ok(())
    }

    /// ID of the current state; [`NO_STATE`] before any registration.
    pub fn current_state_id(&self) -> StateId {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        !matches!(self.phase, TransitionPhase::Steady)
    }

    //--- Pause Control ----------------------------------------------------

    pub fn pause_update(&mut self) {
        self.update_paused = true;
    }

    pub fn unpause_update(&mut self) {
        self.update_paused = false;
    }

    pub fn is_update_paused(&self) -> bool {
        self.update_paused
    }

    pub fn pause_render(&mut self) {
        self.render_paused = true;
    }

    pub fn unpause_render(&mut self) {
        self.render_paused = false;
    }

    pub fn is_render_paused(&self) -> bool {
        self.render_paused
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the controller by `delta_ms`.
    ///
    /// Exactly one branch runs per call: drain a pending container
    /// request, then advance the leave transition, else the enter
    /// transition, else steady-state logic (gated by the controller and
    /// per-state pause flags).
    pub fn update(
        &mut self,
        container: &mut GameContainer<G>,
        delta_ms: u64,
    ) -> Result<(), GameError> {
        if let Some(request) = container.take_state_request() {
            self.enter_state_with(request.target, request.leave, request.enter)?;
        }

        match std::mem::replace(&mut self.phase, TransitionPhase::Steady) {
            TransitionPhase::Leaving { target, mut leave, mut enter } => {
                leave.update(container, delta_ms);
                if leave.is_complete() {
                    let previous = self.current;
                    if let Some(state) = self.states.get_mut(&previous) {
                        state.leave(container);
                    }
                    self.current = target;
                    if let Some(state) = self.states.get_mut(&self.current) {
                        state.enter(container);
                    }
                    debug!("state {} is now current (left {})", self.current, previous);

                    if let (Some(now), Some(was)) =
                        (self.states.get(&self.current), self.states.get(&previous))
                    {
                        enter.init(now.as_ref(), was.as_ref());
                    }

                    // The empty transition is born complete; skip the
                    // dead Entering frame it would otherwise cost.
                    if !enter.is_complete() {
                        self.phase = TransitionPhase::Entering { enter };
                    }
                } else {
                    self.phase = TransitionPhase::Leaving { target, leave, enter };
                }
            }

            TransitionPhase::Entering { mut enter } => {
                enter.update(container, delta_ms);
                if !enter.is_complete() {
                    self.phase = TransitionPhase::Entering { enter };
                }
            }

            TransitionPhase::Steady => {
                if self.update_paused {
                    return Ok(());
                }
                if let Some(state) = self.states.get_mut(&self.current) {
                    if !state.update_paused() {
                        state.update(container, delta_ms)?;
                    }
                }
            }
        }
        Ok(())
    }

    //--- Render Loop ------------------------------------------------------

    /// Renders the current state, wrapped by whichever transition is
    /// active (leave takes priority over enter), gated by the
    /// controller-level and per-state render-pause flags.
    pub fn render(&mut self, container: &mut GameContainer<G>, g: &mut G) {
        if self.render_paused {
            return;
        }

        match &mut self.phase {
            TransitionPhase::Leaving { leave, .. } => leave.pre_render(container, g),
            TransitionPhase::Entering { enter } => enter.pre_render(container, g),
            TransitionPhase::Steady => {}
        }

        if let Some(state) = self.states.get_mut(&self.current) {
            if !state.render_paused() {
                state.render(container, g);
            }
        }

        match &mut self.phase {
            TransitionPhase::Leaving { leave, .. } => leave.post_render(container, g),
            TransitionPhase::Entering { enter } => enter.post_render(container, g),
            TransitionPhase::Steady => {}
        }
    }

    //--- Input Routing ----------------------------------------------------

    /// Forwards an input event to the current state, unless a transition
    /// is in progress or updates are paused. Suppressed input is
    /// dropped, never buffered or replayed.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.update_paused || self.is_transitioning() {
            return;
        }
        if let Some(state) = self.states.get_mut(&self.current) {
            state.handle_input(event);
        }
    }
}

impl<G> Default for StateBasedGame<G> {
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
    use crate::core::input::event::KeyCode;
    use crate::core::state::transition::TimedTransition;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Recording Fixtures -----------------------------------------------

    type Journal = Rc<RefCell<Vec<String>>>;

    struct RecState {
        id: StateId,
        journal: Journal,
        update_paused: bool,
    }

    impl RecState {
        fn new(id: StateId, journal: &Journal) -> Self {
            Self {
                id,
                journal: Rc::clone(journal),
                update_paused: false,
            }
        }

        fn log(&self, what: &str) {
            self.journal.borrow_mut().push(format!("{} {}", what, self.id));
        }
    }

    impl GameState<()> for RecState {
        fn id(&self) -> StateId {
            self.id
        }

        fn init(&mut self, _container: &mut GameContainer<()>) -> Result<(), GameError> {
            self.log("init");
            Ok(())
        }

        fn enter(&mut self, _container: &mut GameContainer<()>) {
            self.log("enter");
        }

        fn leave(&mut self, _container: &mut GameContainer<()>) {
            self.log("leave");
        }

        fn update(
            &mut self,
            _container: &mut GameContainer<()>,
            _delta_ms: u64,
        ) -> Result<(), GameError> {
            self.log("update");
            Ok(())
        }

        fn render(&mut self, _container: &mut GameContainer<()>, _g: &mut ()) {
            self.log("render");
        }

        fn update_paused(&self) -> bool {
            self.update_paused
        }

        fn key_pressed(&mut self, key: KeyCode) {
            self.journal
                .borrow_mut()
                .push(format!("key {} {:?}", self.id, key));
        }
    }

    struct RecTransition {
        journal: Journal,
        timer: TimedTransition,
    }

    impl Transition<()> for RecTransition {
        fn update(&mut self, container: &mut GameContainer<()>, delta_ms: u64) {
            Transition::<()>::update(&mut self.timer, container, delta_ms);
        }

        fn pre_render(&mut self, _container: &mut GameContainer<()>, _g: &mut ()) {
            self.journal.borrow_mut().push("pre".into());
        }

        fn post_render(&mut self, _container: &mut GameContainer<()>, _g: &mut ()) {
            self.journal.borrow_mut().push("post".into());
        }

        fn is_complete(&self) -> bool {
            Transition::<()>::is_complete(&self.timer)
        }
    }

    fn fixture(ids: &[StateId]) -> (StateBasedGame<()>, GameContainer<()>, Journal) {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut game = StateBasedGame::new();
        let mut container = GameContainer::new(800, 600);
        for &id in ids {
            game.add_state(&mut container, RecState::new(id, &journal)).unwrap();
        }
        (game, container, journal)
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn first_added_state_becomes_current() {
        let (game, _, _) = fixture(&[1, 2]);
        assert_eq!(game.current_state_id(), 1);
    }

    #[test]
    fn empty_controller_reports_no_state() {
        let game: StateBasedGame<()> = StateBasedGame::new();
        assert_eq!(game.current_state_id(), NO_STATE);
    }

    #[test]
    fn duplicate_registration_replaces_last_write_wins() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.add_state(&mut container, RecState::new(1, &journal)).unwrap();
        assert_eq!(game.state_count(), 1);
        assert_eq!(game.current_state_id(), 1);
    }

    #[test]
    fn init_runs_in_registration_order_then_enters_first() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        assert_eq!(entries(&journal), vec!["init 1", "init 2", "enter 1"]);
    }

    #[test]
    fn init_runs_at_most_once() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        game.init(&mut container).unwrap();
        assert_eq!(entries(&journal), vec!["init 1", "enter 1"]);
    }

    #[test]
    fn late_registration_initializes_immediately() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        game.add_state(&mut container, RecState::new(2, &journal)).unwrap();
        assert!(entries(&journal).contains(&"init 2".to_string()));
    }

    //--- Transition Protocol ----------------------------------------------

    #[test]
    fn menu_play_scenario_with_default_transitions() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state(2).unwrap();
        game.update(&mut container, 16).unwrap();

        assert_eq!(game.current_state_id(), 2);
        assert_eq!(entries(&journal), vec!["leave 1", "enter 2"]);
    }

    #[test]
    fn unknown_target_is_fatal_and_preserves_current() {
        let (mut game, mut container, _) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();

        let err = game.enter_state(999).unwrap_err();
        assert!(matches!(err, GameError::UnknownState(999)));
        assert_eq!(game.current_state_id(), 1);
        assert!(!game.is_transitioning());
    }

    #[test]
    fn leave_fires_strictly_before_enter() {
        let (mut game, mut container, journal) = fixture(&[1, 2, 3]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state(2).unwrap();
        game.update(&mut container, 1).unwrap();
        game.enter_state(3).unwrap();
        game.update(&mut container, 1).unwrap();

        assert_eq!(
            entries(&journal),
            vec!["leave 1", "enter 2", "leave 2", "enter 3"]
        );
    }

    #[test]
    fn timed_leave_defers_the_swap() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state_with(
            2,
            Box::new(TimedTransition::new(100)),
            Box::new(EmptyTransition),
        )
        .unwrap();

        game.update(&mut container, 50).unwrap();
        assert_eq!(game.current_state_id(), 1, "leave still counting down");
        assert!(game.is_transitioning());
        assert!(entries(&journal).is_empty(), "no lifecycle or update calls yet");

        game.update(&mut container, 60).unwrap();
        assert_eq!(game.current_state_id(), 2);
        assert_eq!(entries(&journal), vec!["leave 1", "enter 2"]);
    }

    #[test]
    fn transition_frames_never_run_steady_updates() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state_with(
            2,
            Box::new(EmptyTransition),
            Box::new(TimedTransition::new(100)),
        )
        .unwrap();

        // Frame 1: leave completes, swap happens, enter phase begins.
        game.update(&mut container, 16).unwrap();
        assert_eq!(game.current_state_id(), 2);
        assert!(game.is_transitioning());

        // Frame 2: enter transition still counting; no steady update.
        game.update(&mut container, 16).unwrap();
        assert!(!entries(&journal).contains(&"update 2".to_string()));

        // Frame 3: enter completes; frame 4 finally updates the state.
        game.update(&mut container, 100).unwrap();
        assert!(!game.is_transitioning());
        game.update(&mut container, 16).unwrap();
        assert!(entries(&journal).contains(&"update 2".to_string()));
    }

    #[test]
    fn states_request_changes_through_the_container() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        container.request_state(2);
        game.update(&mut container, 16).unwrap();

        assert_eq!(game.current_state_id(), 2);
        assert_eq!(entries(&journal), vec!["leave 1", "enter 2"]);
    }

    //--- Pause Flags ------------------------------------------------------

    #[test]
    fn controller_pause_gates_steady_updates() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.pause_update();
        game.update(&mut container, 16).unwrap();
        assert!(entries(&journal).is_empty());

        game.unpause_update();
        game.update(&mut container, 16).unwrap();
        assert_eq!(entries(&journal), vec!["update 1"]);
    }

    #[test]
    fn per_state_pause_gates_updates() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut game = StateBasedGame::new();
        let mut container = GameContainer::new(800, 600);
        let mut state = RecState::new(1, &journal);
        state.update_paused = true;
        game.add_state(&mut container, state).unwrap();
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.update(&mut container, 16).unwrap();
        assert!(entries(&journal).is_empty());
    }

    #[test]
    fn render_pause_skips_rendering() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.pause_render();
        game.render(&mut container, &mut ());
        assert!(entries(&journal).is_empty());

        game.unpause_render();
        game.render(&mut container, &mut ());
        assert_eq!(entries(&journal), vec!["render 1"]);
    }

    //--- Render Wrapping --------------------------------------------------

    #[test]
    fn active_transition_wraps_the_render() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state_with(
            2,
            Box::new(RecTransition {
                journal: Rc::clone(&journal),
                timer: TimedTransition::new(100),
            }),
            Box::new(EmptyTransition),
        )
        .unwrap();

        game.render(&mut container, &mut ());
        assert_eq!(entries(&journal), vec!["pre", "render 1", "post"]);
    }

    //--- Input Routing ----------------------------------------------------

    #[test]
    fn input_reaches_the_current_state_when_steady() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.handle_input(&InputEvent::KeyPressed(KeyCode::Space));
        assert_eq!(entries(&journal), vec!["key 1 Space"]);
    }

    #[test]
    fn input_is_dropped_while_transitioning() {
        let (mut game, mut container, journal) = fixture(&[1, 2]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.enter_state_with(
            2,
            Box::new(TimedTransition::new(100)),
            Box::new(EmptyTransition),
        )
        .unwrap();

        game.handle_input(&InputEvent::KeyPressed(KeyCode::Space));
        assert!(entries(&journal).is_empty());

        // The drop is permanent: finishing the transition replays nothing.
        game.update(&mut container, 200).unwrap();
        assert!(!entries(&journal).iter().any(|e| e.starts_with("key")));
    }

    #[test]
    fn input_is_dropped_while_update_paused() {
        let (mut game, mut container, journal) = fixture(&[1]);
        game.init(&mut container).unwrap();
        journal.borrow_mut().clear();

        game.pause_update();
        game.handle_input(&InputEvent::KeyPressed(KeyCode::KeyA));
        assert!(entries(&journal).is_empty());
    }
}
