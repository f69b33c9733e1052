//! Persistence contract.
//!
//! The session only needs to load one snapshot at start-up and hand over a
//! snapshot after each committed change. Implementations decide the medium;
//! `save_session` must not block on I/O and must not fail back into the engine.

use crate::snapshot::SessionState;

pub trait SessionStore {
    fn load_session(&mut self) -> Option<SessionState>;
    fn save_session(&mut self, state: &SessionState);
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<SessionState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut SessionState> {
        self.state.as_mut()
    }

    /// Number of saves received
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SessionStore for MemoryStore {
    fn load_session(&mut self) -> Option<SessionState> {
        self.state.clone()
    }

    fn save_session(&mut self, state: &SessionState) {
        self.state = Some(state.clone());
        self.saves += 1;
    }
}

/// Stores nothing; every start is a first run
impl SessionStore for () {
    fn load_session(&mut self) -> Option<SessionState> {
        None
    }

    fn save_session(&mut self, _state: &SessionState) {}
}

impl<T: SessionStore + ?Sized> SessionStore for &mut T {
    fn load_session(&mut self) -> Option<SessionState> {
        (**self).load_session()
    }

    fn save_session(&mut self, state: &SessionState) {
        (**self).save_session(state)
    }
}
