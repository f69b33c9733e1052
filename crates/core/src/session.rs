//! Game session - turn sequencing and the public engine API
//!
//! The session owns the board, score, undo history and booster inventory, and
//! holds its three collaborators: a random source, an event sink and a
//! session store. Every operation runs to completion before returning and
//! either commits fully or leaves the session untouched.
//!
//! A successful move runs: slide/merge, win tracking, tile spawn, history
//! push, terminal check (a `life` booster may revive the game here), save.

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::boosters::{BombState, BoosterInventory};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::events::{EventSink, GameEvent, SessionSummary};
use crate::history::History;
use crate::moves::{self, MoveResult};
use crate::rng::RandomSource;
use crate::snapshot::{HistorySnapshot, SessionState};
use crate::store::SessionStore;
use crate::types::{BoosterKind, Direction, GameAction, Position};

/// Reshuffles tried when a life booster revives the game
const LIFE_SHUFFLE_ATTEMPTS: usize = 8;

pub struct GameSession<R, E, P> {
    config: EngineConfig,
    board: Board,
    history: History,
    boosters: BoosterInventory,
    bomb: BombState,
    score: u32,
    /// Monotonic within a game; undo does not roll it back
    merge_count: u32,
    move_count: u32,
    highest_tile: u32,
    game_over: bool,
    won: bool,
    rng: R,
    sink: E,
    store: P,
}

impl<R: RandomSource, E: EventSink, P: SessionStore> GameSession<R, E, P> {
    fn blank(config: EngineConfig, rng: R, sink: E, store: P) -> Self {
        let history = History::new(config.history_depth);
        Self {
            config,
            board: Board::new(),
            history,
            boosters: BoosterInventory::default(),
            bomb: BombState::Idle,
            score: 0,
            merge_count: 0,
            move_count: 0,
            highest_tile: 0,
            game_over: false,
            won: false,
            rng,
            sink,
            store,
        }
    }

    /// Start a fresh game without consulting the store.
    pub fn new(config: EngineConfig, rng: R, sink: E, store: P) -> Self {
        let mut session = Self::blank(config, rng, sink, store);
        session.new_game();
        session
    }

    /// Resume the persisted session, or start a new game when there is none
    /// or it must not be resumed. The booster inventory is kept either way.
    pub fn restore_or_new(config: EngineConfig, rng: R, sink: E, mut store: P) -> Self {
        let loaded = store.load_session();
        let mut session = Self::blank(config, rng, sink, store);

        let Some(state) = loaded else {
            debug!("no saved session, starting new game");
            session.new_game();
            return session;
        };

        session.boosters = state.boosters;
        match state.validate() {
            Ok(()) => {
                session.resume(&state);
                info!(
                    score = session.score,
                    history = session.history.len(),
                    "restored saved session"
                );
            }
            Err(reason) => {
                warn!(reason = reason.as_str(), "discarding saved session");
                session.new_game();
            }
        }
        session
    }

    fn resume(&mut self, state: &SessionState) {
        self.board = state.board();
        self.score = state.score;
        self.merge_count = state.merge_count;
        self.move_count = state.move_count;
        self.highest_tile = state.highest_tile.max(self.board.highest_tile());
        self.won = state.won;
        self.game_over = false;
        self.bomb = BombState::Idle;
        self.history = state.restore_history(self.config.history_depth);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn merge_count(&self) -> u32 {
        self.merge_count
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Highest tile seen this game
    pub fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn boosters(&self) -> &BoosterInventory {
        &self.boosters
    }

    pub fn bomb_state(&self) -> BombState {
        self.bomb
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Snapshot for the persistence collaborator
    pub fn snapshot(&self) -> SessionState {
        SessionState {
            board: self.board.to_rows(),
            score: self.score,
            merge_count: self.merge_count,
            move_count: self.move_count,
            highest_tile: self.highest_tile,
            game_over: self.game_over,
            won: self.won,
            boosters: self.boosters,
            history: self.history.iter().map(HistorySnapshot::from).collect(),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Deal a fresh board. Boosters carry over; everything else resets.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.score = 0;
        self.merge_count = 0;
        self.move_count = 0;
        self.highest_tile = 0;
        self.game_over = false;
        self.won = false;
        self.bomb = BombState::Idle;

        self.sink.emit(&GameEvent::GameStarted);
        for _ in 0..self.config.initial_tiles {
            self.spawn_tile();
        }
        self.history.reset(&self.board, self.score);
        info!("new game");
        self.persist();
    }

    /// Replace the live position, e.g. to load a puzzle.
    ///
    /// The history restarts from this position and terminal flags are
    /// cleared. No events are emitted and nothing is saved.
    pub fn set_position(&mut self, board: Board, score: u32) {
        self.board = board;
        self.score = score;
        self.highest_tile = self.highest_tile.max(board.highest_tile());
        self.game_over = false;
        self.bomb = BombState::Idle;
        self.history.reset(&self.board, self.score);
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.game_over {
            Err(GameError::InvalidMove)
        } else {
            Ok(())
        }
    }

    // ---------------------------------------------------------------------
    // Moves
    // ---------------------------------------------------------------------

    /// Slide the board in `direction`.
    ///
    /// A move that changes nothing returns `moved == false` and has no other
    /// effect: no spawn, no history entry, no save.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveResult, GameError> {
        self.ensure_active()?;

        let result = moves::apply_move(&mut self.board, direction);
        if !result.moved {
            return Ok(result);
        }

        self.score += result.score_delta;
        self.merge_count += result.merge_count();
        self.move_count += 1;
        self.sink.emit(&GameEvent::Moved {
            direction,
            score_delta: result.score_delta,
            merges: result.merges.clone(),
            score: self.score,
        });

        self.track_progress();
        self.spawn_tile();
        self.history.push(&self.board, self.score);
        self.settle();
        Ok(result)
    }

    fn track_progress(&mut self) {
        let top = self.board.highest_tile();
        self.highest_tile = self.highest_tile.max(top);
        if !self.won && top >= self.config.win_tile {
            self.won = true;
            info!(tile = top, score = self.score, "win tile reached");
            self.sink.emit(&GameEvent::Won { tile: top });
        }
    }

    fn spawn_tile(&mut self) {
        match self
            .board
            .place_random_tile(&mut self.rng, self.config.spawn_four_probability)
        {
            Ok((pos, value)) => {
                self.highest_tile = self.highest_tile.max(value);
                self.sink.emit(&GameEvent::TileSpawned { pos, value });
            }
            Err(err) => {
                debug_assert!(false, "tile spawn on a full board: {}", err);
                warn!(%err, "tile spawn skipped");
            }
        }
    }

    /// Run the terminal check on the committed board, then save.
    fn settle(&mut self) {
        if self.board.is_terminal() {
            self.enter_game_over();
        }
        self.persist();
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        if self.bomb.disarm() {
            self.sink.emit(&GameEvent::BombCancelled { expired: false });
        }

        if self.boosters.has(BoosterKind::Life) && self.revive() {
            return;
        }

        info!(
            score = self.score,
            highest_tile = self.highest_tile,
            moves = self.move_count,
            "game over"
        );
        self.sink.emit(&GameEvent::GameOver);
        self.sink.emit(&GameEvent::SessionEnded(SessionSummary {
            score: self.score,
            highest_tile: self.highest_tile,
            won: self.won,
            moves: self.move_count,
            merges: self.merge_count,
        }));
    }

    /// Spend a life: reshuffle into a playable board and clear game over.
    ///
    /// Leaves everything untouched (and the life unspent) when no arrangement
    /// of the current tiles could be playable.
    fn revive(&mut self) -> bool {
        if !self.board.has_duplicate_tile() {
            warn!("life booster cannot help: no two tiles share a value");
            return false;
        }

        let mut next = self.board;
        for _ in 0..LIFE_SHUFFLE_ATTEMPTS {
            next.shuffle_tiles(&mut self.rng);
            if !next.is_terminal() {
                break;
            }
        }
        if next.is_terminal() {
            next.pair_up_duplicate();
        }

        if self.boosters.consume(BoosterKind::Life).is_err() {
            return false;
        }
        // The stuck board on top is never worth undoing to.
        self.board = next;
        self.game_over = false;
        self.history.replace_current(&self.board, self.score);
        info!(lives = self.boosters.life, "life booster revived the game");
        self.sink.emit(&GameEvent::LifeUsed);
        self.sink.emit(&GameEvent::BoosterUsed(BoosterKind::Life));
        true
    }

    // ---------------------------------------------------------------------
    // Boosters
    // ---------------------------------------------------------------------

    /// Roll back to the previous history snapshot.
    pub fn use_undo(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        self.boosters.require(BoosterKind::Undo)?;
        let entry = self.history.undo()?;
        self.boosters.consume(BoosterKind::Undo)?;

        self.board = entry.board;
        self.score = entry.score;
        debug!(score = self.score, remaining = self.boosters.undo, "undo");
        self.sink.emit(&GameEvent::BoosterUsed(BoosterKind::Undo));
        self.settle();
        Ok(())
    }

    /// Redistribute every tile at random. The result is a new history entry.
    pub fn use_shuffle(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        self.boosters.consume(BoosterKind::Shuffle)?;

        self.board.shuffle_tiles(&mut self.rng);
        self.history.push(&self.board, self.score);
        debug!(remaining = self.boosters.shuffle, "shuffle");
        self.sink.emit(&GameEvent::BoosterUsed(BoosterKind::Shuffle));
        self.settle();
        Ok(())
    }

    /// Arm the bomb. Nothing is consumed until a target is selected.
    ///
    /// Arming an already armed bomb restarts its timeout.
    pub fn arm_bomb(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        self.boosters.require(BoosterKind::Bomb)?;
        self.bomb.arm();
        debug!(timeout_ms = self.config.bomb_timeout_ms, "bomb armed");
        self.sink.emit(&GameEvent::BombArmed);
        Ok(())
    }

    /// Disarm a pending bomb without consuming it. Returns whether one was armed.
    pub fn cancel_bomb(&mut self) -> bool {
        if !self.bomb.disarm() {
            return false;
        }
        debug!("bomb cancelled");
        self.sink.emit(&GameEvent::BombCancelled { expired: false });
        true
    }

    /// Advance the bomb timeout. Returns true when the pending bomb expired.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.bomb.tick(elapsed_ms, self.config.bomb_timeout_ms) {
            return false;
        }
        debug!("bomb expired");
        self.sink.emit(&GameEvent::BombCancelled { expired: true });
        true
    }

    /// Destroy the tile at `pos` with the armed bomb. Returns its value.
    ///
    /// Invalid targets keep the bomb armed.
    pub fn select_target(&mut self, pos: Position) -> Result<u32, GameError> {
        if !self.bomb.is_armed() {
            return Err(GameError::NoTarget);
        }
        self.ensure_active()?;
        if self.boosters.require(BoosterKind::Bomb).is_err() {
            self.cancel_bomb();
            return Err(GameError::InsufficientBoosters(BoosterKind::Bomb));
        }

        let value = self.board.get_at(pos).ok_or(GameError::OutOfBounds {
            row: pos.row,
            col: pos.col,
        })?;
        if value == 0 {
            return Err(GameError::EmptyTargetCell {
                row: pos.row,
                col: pos.col,
            });
        }
        if self.board.tile_count() == 1 {
            return Err(GameError::LastTile);
        }

        self.boosters.consume(BoosterKind::Bomb)?;
        self.board.set_at(pos, 0);
        self.bomb.disarm();
        self.history.push(&self.board, self.score);
        debug!(row = pos.row, col = pos.col, value, "tile destroyed");
        self.sink.emit(&GameEvent::BoosterUsed(BoosterKind::Bomb));
        self.persist();
        Ok(value)
    }

    // ---------------------------------------------------------------------
    // Inventory
    // ---------------------------------------------------------------------

    /// Add boosters (purchases, rewards). Returns the new count.
    pub fn grant(&mut self, kind: BoosterKind, amount: u32) -> u32 {
        let count = self.boosters.grant(kind, amount);
        debug!(kind = kind.as_str(), amount, count, "boosters granted");
        self.persist();
        count
    }

    /// Reload booster counts from the store after an external change.
    ///
    /// Board state is never touched. Returns whether the inventory changed.
    pub fn sync_inventory(&mut self) -> bool {
        let Some(state) = self.store.load_session() else {
            return false;
        };
        if state.boosters == self.boosters {
            return false;
        }
        self.boosters = state.boosters;
        if !self.boosters.has(BoosterKind::Bomb) {
            self.cancel_bomb();
        }
        debug!(boosters = ?self.boosters, "inventory reloaded");
        true
    }

    // ---------------------------------------------------------------------
    // Input dispatch
    // ---------------------------------------------------------------------

    /// Apply one input-surface request. Returns whether the board changed.
    pub fn apply_action(&mut self, action: GameAction) -> Result<bool, GameError> {
        match action {
            GameAction::Move(direction) => Ok(self.apply_move(direction)?.moved),
            GameAction::Undo => self.use_undo().map(|_| true),
            GameAction::Shuffle => self.use_shuffle().map(|_| true),
            GameAction::Bomb => self.arm_bomb().map(|_| false),
            GameAction::CancelBomb => {
                self.cancel_bomb();
                Ok(false)
            }
            GameAction::Target(pos) => self.select_target(pos).map(|_| true),
            GameAction::NewGame => {
                self.new_game();
                Ok(true)
            }
        }
    }

    fn persist(&mut self) {
        let state = self.snapshot();
        self.store.save_session(&state);
    }
}
