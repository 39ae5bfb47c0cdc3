//! Turn state machine for one session.
//!
//! The controller is the only mutator of the grid, the cat and the history.
//! Hosts call [`GameController::place_wall`], [`GameController::undo`] and
//! [`GameController::reset`], then redraw from [`GameController::snapshot`] or
//! react to the [`GameEvent`]s delivered to subscribed listeners.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::board::hex::HexGrid;
use crate::board::reachability::check_reachability;
use crate::board::solver::NextMove;
use crate::engine::config::GameConfig;
use crate::engine::error::{GameError, MoveRejection};
use crate::engine::history::MoveHistory;
use crate::engine::models::*;
use crate::engine::strategy::{CatStrategy, NearestExitCat};

/// Receives an event after every successful mutating call.
pub trait StateListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> StateListener for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by [`GameController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct GameController {
    config: GameConfig,
    grid: HexGrid,
    cat: Coord,
    state: GameState,
    history: MoveHistory,
    strategy: Arc<dyn CatStrategy>,
    rng: Box<dyn RngCore>,
    listeners: Vec<(ListenerId, Box<dyn StateListener>)>,
    next_listener_id: u64,
}

impl fmt::Debug for GameController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameController")
            .field("config", &self.config)
            .field("cat", &self.cat)
            .field("state", &self.state)
            .field("moves", &self.history.len())
            .field("strategy", &self.strategy.name())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GameController {
    /// Start a session using `rng` for the initial wall layout of this and later resets.
    pub fn new(config: GameConfig, mut rng: Box<dyn RngCore>) -> Result<Self, GameError> {
        let (grid, cat) = Self::initial_layout(&config, rng.as_mut())?;
        let mut controller = Self {
            config,
            grid,
            cat,
            state: GameState::Playing,
            history: MoveHistory::new(),
            strategy: Arc::new(NearestExitCat),
            rng,
            listeners: Vec::new(),
            next_listener_id: 0,
        };
        controller.start_session();
        Ok(controller)
    }

    /// Start a session with a [`StdRng`] seeded from `seed`.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(config, Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Start a session seeded from OS entropy.
    pub fn from_entropy(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, Box::new(StdRng::from_entropy()))
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn CatStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_strategy(&mut self, strategy: Arc<dyn CatStrategy>) {
        self.strategy = strategy;
    }

    /// Replace the random source used by subsequent resets.
    pub fn set_rng(&mut self, rng: Box<dyn RngCore>) {
        self.rng = rng;
    }

    // --- Accessors ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn cat(&self) -> Coord {
        self.cat
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn strategy(&self) -> &dyn CatStrategy {
        self.strategy.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            walls: self.grid.wall_flags().to_vec(),
            cat: self.cat,
            state: self.state,
            moves: self.history.len(),
        }
    }

    // --- Listeners ---

    pub fn subscribe(&mut self, listener: impl StateListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, kind: EventKind, status: String, tone: StatusTone) {
        let event = GameEvent {
            kind,
            state: self.state,
            cat: self.cat,
            status,
            tone,
        };
        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    // --- Game logic ---

    /// Wall off `(i, j)` and let the cat respond.
    pub fn place_wall(&mut self, i: i32, j: i32) -> Result<TurnOutcome, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::IllegalStateTransition {
                action: "place a wall",
                state: self.state,
            });
        }
        let cell = self.grid.cell_at(i, j).ok_or(GameError::InvalidCoordinate {
            i,
            j,
            width: self.grid.width(),
            height: self.grid.height(),
        })?;
        if cell.is_wall {
            return Err(GameError::InvalidMove {
                i,
                j,
                reason: MoveRejection::AlreadyWall,
            });
        }
        if self.cat == (i, j) {
            return Err(GameError::InvalidMove {
                i,
                j,
                reason: MoveRejection::CatCell,
            });
        }

        self.grid.set_wall(i, j, true)?;
        let cat_before = self.cat;
        self.history.push(MoveRecord {
            cat_before,
            wall_placed: (i, j),
        });

        let trapped = check_reachability(&self.grid, cat_before).is_trapped();
        let (resolution, status, tone) = if trapped {
            self.state = GameState::Win;
            (
                Resolution::Trapped,
                "You blocked the cat! You Win!".to_string(),
                StatusTone::Win,
            )
        } else {
            match self.strategy.next_move(&self.grid, cat_before) {
                NextMove::MoveTo(to) if self.grid.is_open(to.0, to.1) => {
                    self.cat = to;
                    (
                        Resolution::Moved,
                        format!("The cat moved to ({}, {}).", to.0, to.1),
                        StatusTone::Normal,
                    )
                }
                NextMove::MoveTo(to) => {
                    // A strategy pointing at a wall or off-grid cell forfeits its move.
                    tracing::warn!(
                        strategy = self.strategy.name(),
                        target = ?to,
                        "cat strategy chose an illegal cell"
                    );
                    self.state = GameState::Win;
                    (
                        Resolution::GaveUp,
                        "The cat gave up! You Win!".to_string(),
                        StatusTone::Win,
                    )
                }
                NextMove::Escape => {
                    self.state = GameState::Lose;
                    (
                        Resolution::Escaped,
                        "The cat escaped! You lose.".to_string(),
                        StatusTone::Lose,
                    )
                }
                NextMove::Stuck => {
                    self.state = GameState::Win;
                    (
                        Resolution::GaveUp,
                        "The cat gave up! You Win!".to_string(),
                        StatusTone::Win,
                    )
                }
            }
        };

        let outcome = TurnOutcome {
            wall: (i, j),
            state: self.state,
            cat_before,
            cat_after: self.cat,
            resolution,
        };
        tracing::debug!(
            wall = ?outcome.wall,
            cat_before = ?outcome.cat_before,
            cat_after = ?outcome.cat_after,
            resolution = ?outcome.resolution,
            state = %outcome.state,
            "turn resolved"
        );
        self.emit(EventKind::WallPlaced { outcome }, status, tone);
        Ok(outcome)
    }

    /// Revert the most recent move, resuming play if the game had ended.
    pub fn undo(&mut self) -> Result<MoveRecord, GameError> {
        let record = self.history.pop().ok_or(GameError::EmptyHistory)?;
        let (wi, wj) = record.wall_placed;
        self.grid.set_wall(wi, wj, false)?;
        self.cat = record.cat_before;
        self.state = GameState::Playing;
        tracing::debug!(wall = ?record.wall_placed, cat = ?record.cat_before, "move undone");
        self.emit(
            EventKind::Undone { record },
            "Undo successful.".to_string(),
            StatusTone::Normal,
        );
        Ok(record)
    }

    /// Boolean form of [`GameController::undo`]: `true` if a move was reverted.
    pub fn try_undo(&mut self) -> bool {
        self.undo().is_ok()
    }

    /// Start a new session with `config`. Callable from any state.
    ///
    /// On an invalid config the current session is left untouched.
    pub fn reset(&mut self, config: GameConfig) -> Result<(), GameError> {
        let (grid, cat) = Self::initial_layout(&config, self.rng.as_mut())?;
        self.grid = grid;
        self.cat = cat;
        self.config = config;
        self.start_session();
        Ok(())
    }

    /// Validated grid with its random walls, plus the cat's starting cell.
    fn initial_layout(
        config: &GameConfig,
        rng: &mut dyn RngCore,
    ) -> Result<(HexGrid, Coord), GameError> {
        config.validate()?;
        let mut grid = HexGrid::new(config.width, config.height)?;
        let cat = config.effective_cat_start();
        place_random_walls(&mut grid, cat, config.initial_wall_count, rng)?;
        Ok((grid, cat))
    }

    fn start_session(&mut self) {
        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            walls = self.grid.wall_count(),
            cat = ?self.cat,
            "new session"
        );
        self.history.clear();
        self.state = GameState::Playing;
        self.emit(
            EventKind::Reset,
            "Click a dot to block the cat.".to_string(),
            StatusTone::Normal,
        );
    }

    /// Reset with the current config.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.reset(self.config.clone())
    }
}

/// Wall `count` distinct random cells other than `cat`, using a partial
/// Fisher–Yates shuffle over the row-major list of non-cat cells.
///
/// `count` is clamped to the number of available cells.
pub fn place_random_walls(
    grid: &mut HexGrid,
    cat: Coord,
    count: usize,
    rng: &mut dyn RngCore,
) -> Result<(), GameError> {
    let mut cells: Vec<Coord> = grid
        .cells()
        .map(|c| (c.i, c.j))
        .filter(|&c| c != cat)
        .collect();
    let n = cells.len();
    for k in 0..count.min(n) {
        let pick = rng.gen_range(k..n);
        cells.swap(k, pick);
        let (i, j) = cells[k];
        grid.set_wall(i, j, true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open_session(w: i32, h: i32) -> GameController {
        GameController::seeded(GameConfig::new(w, h, 0), 0).unwrap()
    }

    /// Test strategy that always reports the same decision.
    struct FixedCat(NextMove);

    impl CatStrategy for FixedCat {
        fn name(&self) -> &str {
            "fixed"
        }

        fn next_move(&self, _grid: &HexGrid, _cat: Coord) -> NextMove {
            self.0
        }
    }

    #[test]
    fn test_new_session_state() {
        let game = GameController::seeded(GameConfig::new(7, 7, 5), 3).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.cat(), (3, 3));
        assert_eq!(game.grid().wall_count(), 5);
        assert!(!game.grid().is_wall(3, 3));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_random_walls_clamped_to_available_cells() {
        let game = GameController::seeded(GameConfig::new(3, 3, 100), 1).unwrap();
        assert_eq!(game.grid().wall_count(), 8);
        assert!(!game.grid().is_wall(1, 1));
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let a = GameController::seeded(GameConfig::default(), 42).unwrap();
        let b = GameController::seeded(GameConfig::default(), 42).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_new_draws_layout_once() {
        // Construction consumes the rng exactly like a single reset would.
        let config = GameConfig::new(9, 9, 10);
        let built = GameController::seeded(config.clone(), 17).unwrap();

        let mut reset = open_session(3, 3);
        reset.set_rng(Box::new(StdRng::seed_from_u64(17)));
        reset.reset(config).unwrap();
        assert_eq!(built.snapshot(), reset.snapshot());

        // Invalid configs fail before any layout is drawn.
        assert!(matches!(
            GameController::seeded(GameConfig::new(4, 4, 0).with_cat_start(9, 9), 0),
            Err(GameError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_place_random_walls_uses_fisher_yates_order() {
        // An rng that always yields zero picks index k at step k: the first cells in row-major order.
        struct ZeroRng;
        impl RngCore for ZeroRng {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }
        let mut grid = HexGrid::new(3, 3).unwrap();
        place_random_walls(&mut grid, (0, 0), 3, &mut ZeroRng).unwrap();
        assert_eq!(grid.walls().collect::<Vec<_>>(), vec![(1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn test_rejects_wall_on_cat() {
        let mut game = open_session(5, 5);
        let before = game.snapshot();
        let err = game.place_wall(2, 2).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidMove {
                i: 2,
                j: 2,
                reason: MoveRejection::CatCell
            }
        );
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_rejects_existing_wall() {
        let mut game = open_session(7, 7);
        game.place_wall(0, 0).unwrap();
        let before = game.snapshot();
        let err = game.place_wall(0, 0).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidMove {
                reason: MoveRejection::AlreadyWall,
                ..
            }
        ));
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut game = open_session(5, 5);
        assert!(matches!(
            game.place_wall(5, 0),
            Err(GameError::InvalidCoordinate { i: 5, j: 0, .. })
        ));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_rejects_moves_after_game_over() {
        let mut game = open_session(5, 5).with_strategy(Arc::new(FixedCat(NextMove::Escape)));
        game.place_wall(0, 0).unwrap();
        assert_eq!(game.state(), GameState::Lose);
        let before = game.snapshot();
        assert!(matches!(
            game.place_wall(1, 0),
            Err(GameError::IllegalStateTransition {
                state: GameState::Lose,
                ..
            })
        ));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_cat_moves_toward_exit() {
        let mut game = open_session(7, 7);
        let outcome = game.place_wall(0, 0).unwrap();
        assert_eq!(outcome.resolution, Resolution::Moved);
        assert_eq!(outcome.cat_before, (3, 3));
        assert_eq!(outcome.cat_moved(), Some(game.cat()));
        assert_ne!(game.cat(), (3, 3));
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_trap_wins_without_cat_moving() {
        let mut game = open_session(5, 5);
        let ring = crate::board::hex::hex_neighbors(2, 2);
        for &(i, j) in &ring[..5] {
            game.grid.set_wall(i, j, true).unwrap();
        }
        let (li, lj) = ring[5];
        let outcome = game.place_wall(li, lj).unwrap();
        assert_eq!(outcome.resolution, Resolution::Trapped);
        assert_eq!(outcome.state, GameState::Win);
        assert_eq!(outcome.cat_moved(), None);
        assert_eq!(game.cat(), (2, 2));
        assert_eq!(
            game.history().last(),
            Some(&MoveRecord {
                cat_before: (2, 2),
                wall_placed: (li, lj)
            })
        );
    }

    #[test]
    fn test_stuck_strategy_ends_in_win() {
        let mut game = open_session(5, 5).with_strategy(Arc::new(FixedCat(NextMove::Stuck)));
        let outcome = game.place_wall(0, 0).unwrap();
        assert_eq!(outcome.resolution, Resolution::GaveUp);
        assert_eq!(game.state(), GameState::Win);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_illegal_strategy_target_forfeits() {
        let mut game = open_session(5, 5).with_strategy(Arc::new(FixedCat(NextMove::MoveTo((0, 0)))));
        let outcome = game.place_wall(0, 0).unwrap();
        assert_eq!(outcome.resolution, Resolution::GaveUp);
        assert_eq!(game.cat(), (2, 2));
        assert!(!game.grid().is_wall(game.cat().0, game.cat().1));
    }

    #[test]
    fn test_undo_restores_previous_turn() {
        let mut game = open_session(7, 7);
        game.place_wall(0, 0).unwrap();
        let before = game.snapshot();
        game.place_wall(6, 6).unwrap();
        let record = game.undo().unwrap();
        assert_eq!(record.wall_placed, (6, 6));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_undo_empty_history() {
        let mut game = open_session(5, 5);
        assert_eq!(game.undo(), Err(GameError::EmptyHistory));
        assert!(!game.try_undo());
    }

    #[test]
    fn test_undo_from_terminal_resumes_play() {
        let mut game = open_session(5, 5).with_strategy(Arc::new(FixedCat(NextMove::Escape)));
        game.place_wall(1, 1).unwrap();
        assert_eq!(game.state(), GameState::Lose);
        assert!(game.try_undo());
        assert_eq!(game.state(), GameState::Playing);
        assert!(!game.grid().is_wall(1, 1));
    }

    #[test]
    fn test_reset_from_terminal_state() {
        let mut game = open_session(5, 5).with_strategy(Arc::new(FixedCat(NextMove::Escape)));
        game.place_wall(1, 1).unwrap();
        game.reset(GameConfig::new(4, 6, 3)).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!((game.grid().width(), game.grid().height()), (4, 6));
        assert_eq!(game.grid().wall_count(), 3);
        assert_eq!(game.cat(), (2, 3));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_invalid_reset_keeps_session() {
        let mut game = open_session(5, 5);
        game.place_wall(0, 0).unwrap();
        let before = game.snapshot();
        assert!(game.reset(GameConfig::new(0, 0, 0)).is_err());
        assert!(game.reset(GameConfig::new(65536, 65536, 0)).is_err());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_listeners_receive_events() {
        let seen: Rc<RefCell<Vec<GameEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut game = open_session(7, 7);
        let id = game.subscribe(move |e: &GameEvent| sink.borrow_mut().push(e.clone()));

        game.place_wall(0, 0).unwrap();
        let _ = game.place_wall(0, 0);
        game.undo().unwrap();
        game.restart().unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 3, "rejected moves must not notify");
        assert!(matches!(events[0].kind, EventKind::WallPlaced { .. }));
        assert!(matches!(events[1].kind, EventKind::Undone { .. }));
        assert_eq!(events[1].status, "Undo successful.");
        assert_eq!(events[2].kind, EventKind::Reset);
        assert_eq!(events[2].status, "Click a dot to block the cat.");
        drop(events);

        assert!(game.unsubscribe(id));
        assert!(!game.unsubscribe(id));
        game.place_wall(1, 0).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }
}
