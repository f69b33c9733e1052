//! Integration tests for the game session

use tile_merge::core::{
    Board, BoosterInventory, EngineConfig, GameError, GameEvent, GameSession, MemoryStore,
    SessionState, SimpleRng, Statistics,
};
use tile_merge::types::{BoosterKind, Direction, GameAction, Position};

type Session = GameSession<SimpleRng, (Vec<GameEvent>, Statistics), MemoryStore>;

fn session(seed: u32) -> Session {
    GameSession::new(
        EngineConfig::default(),
        SimpleRng::new(seed),
        (Vec::new(), Statistics::default()),
        MemoryStore::new(),
    )
}

fn events(s: &Session) -> &[GameEvent] {
    &s.sink().0
}

/// Play deterministic moves until the game ends or `limit` moves were tried.
fn play(s: &mut Session, limit: usize) {
    for step in 0..limit {
        if s.is_game_over() {
            return;
        }
        let dir = Direction::ALL[step % 4];
        s.apply_move(dir).unwrap();
    }
}

#[test]
fn test_game_lifecycle() {
    let mut s = session(12345);
    assert_eq!(s.board().tile_count(), 2);
    assert!(!s.is_game_over());

    play(&mut s, 5_000);
    assert!(s.is_game_over());
    assert!(s.board().is_terminal());
    assert_eq!(s.apply_move(Direction::Left), Err(GameError::InvalidMove));

    let ended = events(&s)
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
        .count();
    assert_eq!(ended, 1);
    assert_eq!(s.sink().1.games_played, 1);
    assert_eq!(s.sink().1.best_score, s.score());

    // The final state is saved with the game-over flag set.
    assert!(s.store().state().unwrap().game_over);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = session(99);
    let mut b = session(99);
    play(&mut a, 300);
    play(&mut b, 300);
    assert_eq!(a.board(), b.board());
    assert_eq!(a.score(), b.score());
}

#[test]
fn test_noop_move_changes_nothing() {
    let mut s = session(1);
    s.set_position(
        Board::from_rows([[2, 4, 8, 16], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        40,
    );
    let saves = s.store().saves();

    let result = s.apply_move(Direction::Left).unwrap();
    assert!(!result.moved);
    assert_eq!(s.score(), 40);
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.board().tile_count(), 4);
    assert_eq!(s.store().saves(), saves);
}

#[test]
fn test_history_bound_limits_undo() {
    let mut s = session(2024);
    s.grant(BoosterKind::Undo, 100);

    let mut moves = 0;
    let mut step = 0;
    while moves < 15 {
        if s.apply_move(Direction::ALL[step % 4]).unwrap().moved {
            moves += 1;
        }
        step += 1;
        assert!(s.history().len() <= 10);
    }
    assert_eq!(s.history().len(), 10);

    let mut undone = 0;
    while s.use_undo().is_ok() {
        undone += 1;
    }
    assert_eq!(undone, 9);
    assert_eq!(s.use_undo(), Err(GameError::InsufficientHistory));
    assert_eq!(s.boosters().undo, 91);
}

#[test]
fn test_undo_round_trip() {
    let mut s = session(5);
    s.grant(BoosterKind::Undo, 1);
    let board = Board::from_rows([[2, 2, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 0]]);
    s.set_position(board, 100);

    assert!(s.apply_move(Direction::Left).unwrap().moved);
    assert_ne!(*s.board(), board);
    s.use_undo().unwrap();

    assert_eq!(*s.board(), board);
    assert_eq!(s.score(), 100);
    assert!(events(&s).contains(&GameEvent::BoosterUsed(BoosterKind::Undo)));
}

#[test]
fn test_shuffle_can_be_undone() {
    let mut s = session(8);
    s.grant(BoosterKind::Shuffle, 1);
    s.grant(BoosterKind::Undo, 1);
    let board = Board::from_rows([[2, 4, 8, 16], [32, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 64]]);
    s.set_position(board, 0);

    s.use_shuffle().unwrap();
    let mut before = board.tiles();
    let mut after = s.board().tiles();
    before.sort_unstable();
    after.sort_unstable();
    assert_eq!(before, after);
    assert_eq!(s.board().empty_cells().len(), board.empty_cells().len());

    s.use_undo().unwrap();
    assert_eq!(*s.board(), board);
}

#[test]
fn test_bomb_awaits_target_until_valid_cell() {
    let mut s = session(3);
    s.grant(BoosterKind::Bomb, 1);
    s.set_position(
        Board::from_rows([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 16, 0], [0, 0, 0, 0]]),
        0,
    );

    assert_eq!(s.apply_action(GameAction::Bomb), Ok(false));
    assert_eq!(
        s.apply_action(GameAction::Target(Position::new(1, 1))),
        Err(GameError::EmptyTargetCell { row: 1, col: 1 })
    );
    assert!(s.bomb_state().is_armed());
    assert_eq!(s.boosters().bomb, 1);

    assert_eq!(
        s.apply_action(GameAction::Target(Position::new(2, 2))),
        Ok(true)
    );
    assert_eq!(s.board().get(2, 2), Some(0));
    assert_eq!(s.boosters().bomb, 0);
    assert!(!s.bomb_state().is_armed());
    assert!(events(&s).contains(&GameEvent::BoosterUsed(BoosterKind::Bomb)));
}

#[test]
fn test_bomb_timeout_does_not_consume() {
    let mut s = session(3);
    s.grant(BoosterKind::Bomb, 2);
    s.arm_bomb().unwrap();

    for _ in 0..99 {
        assert!(!s.tick(100));
    }
    assert!(s.tick(100));
    assert_eq!(s.boosters().bomb, 2);
    assert_eq!(
        s.select_target(Position::new(0, 0)),
        Err(GameError::NoTarget)
    );
}

#[test]
fn test_life_keeps_game_going() {
    let mut s = session(77);
    s.grant(BoosterKind::Life, 1);

    play(&mut s, 5_000);
    assert!(events(&s).contains(&GameEvent::LifeUsed));
    assert_eq!(s.boosters().life, 0);

    // The revival comes before the final game over.
    let revived_at = events(&s)
        .iter()
        .position(|e| *e == GameEvent::LifeUsed)
        .unwrap();
    let over_at = events(&s)
        .iter()
        .position(|e| *e == GameEvent::GameOver)
        .unwrap();
    assert!(revived_at < over_at);
    assert!(s.is_game_over());
}

#[test]
fn test_win_does_not_end_session() {
    let mut s = session(4);
    s.set_position(
        Board::from_rows([[1024, 1024, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        0,
    );
    s.apply_move(Direction::Left).unwrap();

    assert!(s.has_won());
    assert!(!s.is_game_over());
    assert_eq!(s.highest_tile(), 2048);
    assert!(events(&s).contains(&GameEvent::Won { tile: 2048 }));
}

#[test]
fn test_new_game_keeps_boosters() {
    let mut s = session(6);
    s.grant(BoosterKind::Shuffle, 3);
    play(&mut s, 20);

    s.apply_action(GameAction::NewGame).unwrap();
    assert_eq!(s.score(), 0);
    assert_eq!(s.move_count(), 0);
    assert_eq!(s.merge_count(), 0);
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.board().tile_count(), 2);
    assert_eq!(s.boosters().shuffle, 3);
}

fn saved(board: [[u32; 4]; 4], game_over: bool) -> SessionState {
    SessionState {
        board,
        score: 64,
        merge_count: 5,
        move_count: 9,
        highest_tile: 16,
        game_over,
        won: false,
        boosters: BoosterInventory::new(2, 0, 1, 0),
        history: Vec::new(),
    }
}

fn restore(state: SessionState) -> Session {
    GameSession::restore_or_new(
        EngineConfig::default(),
        SimpleRng::new(1),
        (Vec::new(), Statistics::default()),
        MemoryStore::with_state(state),
    )
}

#[test]
fn test_restore_resumes_valid_session() {
    let board = [[2, 4, 0, 0], [0, 16, 0, 0], [0, 0, 0, 0], [0, 0, 0, 8]];
    let s = restore(saved(board, false));

    assert_eq!(s.board().to_rows(), board);
    assert_eq!(s.score(), 64);
    assert_eq!(s.move_count(), 9);
    assert_eq!(s.boosters(), &BoosterInventory::new(2, 0, 1, 0));
    assert_eq!(s.history().len(), 1);
}

#[test]
fn test_restore_discards_game_over_but_keeps_boosters() {
    let board = [[2, 4, 0, 0], [0, 16, 0, 0], [0, 0, 0, 0], [0, 0, 0, 8]];
    let s = restore(saved(board, true));

    assert_eq!(s.score(), 0);
    assert_eq!(s.board().tile_count(), 2);
    assert!(!s.is_game_over());
    assert_eq!(s.boosters(), &BoosterInventory::new(2, 0, 1, 0));
}

#[test]
fn test_restore_discards_malformed_and_stuck_boards() {
    let malformed = [[3, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
    assert_eq!(restore(saved(malformed, false)).score(), 0);

    let stuck = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
    assert_eq!(restore(saved(stuck, false)).score(), 0);

    let empty = [[0; 4]; 4];
    assert_eq!(restore(saved(empty, false)).score(), 0);
}

#[test]
fn test_sync_inventory_reads_external_grants() {
    let mut s = session(10);
    s.grant(BoosterKind::Bomb, 1);

    s.store_mut().state_mut().unwrap().boosters.bomb = 5;
    assert!(s.sync_inventory());
    assert_eq!(s.boosters().bomb, 5);
    assert!(!s.sync_inventory());
}
