//! Terminal tile-merge runner (default binary).
//!
//! Wires the engine to real collaborators: a `rand` random source, the JSON
//! file store and a crossterm terminal.
//!
//! Environment:
//! - `TILE_MERGE_SEED`: fixed seed for reproducible games
//! - `TILE_MERGE_LOG`: log file path (no logging when unset)
//! - `TILE_MERGE_LOG_LEVEL`: `trace`..`error` (default `info`)
//! - plus the engine and store variables read by `EngineConfig::from_env`
//!   and `StoreConfig::from_env`

use std::env;
use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use tile_merge::core::{EngineConfig, GameEvent, GameSession, RandRng};
use tile_merge::input::{handle_key_event, should_quit, TargetCursor};
use tile_merge::store::{JsonFileStore, StoreConfig};
use tile_merge::term::{GameView, TerminalRenderer, ViewFrame};
use tile_merge::types::GameAction;

/// Bomb timeout resolution
const TICK_MS: u64 = 100;

fn main() -> Result<()> {
    init_tracing()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing() -> Result<()> {
    let Some(path) = env::var("TILE_MERGE_LOG")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let level = env::var("TILE_MERGE_LOG_LEVEL")
        .ok()
        .and_then(|s| s.trim().parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn seeded_rng() -> StdRng {
    match env::var("TILE_MERGE_SEED")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
    {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let store = JsonFileStore::open(StoreConfig::from_env())?;
    let (stats_sink, stats) = store.stats_recorder();

    let mut session = GameSession::restore_or_new(
        EngineConfig::from_env(),
        RandRng(seeded_rng()),
        (stats_sink, Vec::<GameEvent>::new()),
        store,
    );

    let view = GameView::default();
    let mut cursor = TargetCursor::default();
    let mut message: Option<String> = None;

    let tick_duration = Duration::from_millis(TICK_MS);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let armed = session.bomb_state().is_armed();
        let frame = ViewFrame::from_session(&session)
            .with_cursor(armed.then(|| cursor.position()))
            .with_stats(&stats.borrow())
            .with_message(message.clone());
        term.draw(view.render_lines(&frame))?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }

                    let action = if armed {
                        cursor.handle_key(key)
                    } else {
                        handle_key_event(key)
                    };
                    if let Some(action) = action {
                        if action == GameAction::Bomb {
                            cursor = TargetCursor::default();
                        }
                        message = session.apply_action(action).err().map(|e| e.to_string());
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }

        for event in session.sink_mut().1.drain(..) {
            if let Some(text) = describe(&event) {
                message = Some(text);
            }
        }
    }
}

/// One-line notice for events worth surfacing.
fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Won { tile } => Some(format!("{} reached!", tile)),
        GameEvent::LifeUsed => Some(String::from("Life used: board reshuffled")),
        GameEvent::BombCancelled { expired: true } => Some(String::from("Bomb timed out")),
        GameEvent::GameStarted => Some(String::from("New game")),
        _ => None,
    }
}
