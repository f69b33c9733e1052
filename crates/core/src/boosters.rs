//! Boosters - inventory counts and the bomb targeting state machine
//!
//! The inventory is owned by the session; collaborators (shop, rewards,
//! persistence) go through [`BoosterInventory::grant`] and
//! [`BoosterInventory::consume`] instead of touching the counts directly.
//!
//! The bomb is the only booster with a pending state:
//!
//! ```text
//! Idle --arm--> AwaitingTarget --valid target--> Idle   (consumed)
//!                      |
//!                      +--cancel / timeout-----> Idle   (not consumed)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::BoosterKind;

/// Non-negative count per booster kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterInventory {
    pub undo: u32,
    pub shuffle: u32,
    pub bomb: u32,
    pub life: u32,
}

impl BoosterInventory {
    pub fn new(undo: u32, shuffle: u32, bomb: u32, life: u32) -> Self {
        Self {
            undo,
            shuffle,
            bomb,
            life,
        }
    }

    pub fn count(&self, kind: BoosterKind) -> u32 {
        match kind {
            BoosterKind::Undo => self.undo,
            BoosterKind::Shuffle => self.shuffle,
            BoosterKind::Bomb => self.bomb,
            BoosterKind::Life => self.life,
        }
    }

    fn slot_mut(&mut self, kind: BoosterKind) -> &mut u32 {
        match kind {
            BoosterKind::Undo => &mut self.undo,
            BoosterKind::Shuffle => &mut self.shuffle,
            BoosterKind::Bomb => &mut self.bomb,
            BoosterKind::Life => &mut self.life,
        }
    }

    pub fn has(&self, kind: BoosterKind) -> bool {
        self.count(kind) > 0
    }

    /// Add `amount` boosters (saturating). Returns the new count.
    pub fn grant(&mut self, kind: BoosterKind, amount: u32) -> u32 {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
        *slot
    }

    /// Take one booster. Returns the remaining count.
    pub fn consume(&mut self, kind: BoosterKind) -> Result<u32, GameError> {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return Err(GameError::InsufficientBoosters(kind));
        }
        *slot -= 1;
        Ok(*slot)
    }

    /// Fail unless at least one booster of `kind` is held
    pub fn require(&self, kind: BoosterKind) -> Result<(), GameError> {
        if self.has(kind) {
            Ok(())
        } else {
            Err(GameError::InsufficientBoosters(kind))
        }
    }
}

/// Bomb targeting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BombState {
    #[default]
    Idle,
    /// Armed and waiting for a tile selection; `elapsed_ms` counts towards the timeout
    AwaitingTarget { elapsed_ms: u32 },
}

impl BombState {
    pub fn is_armed(&self) -> bool {
        matches!(self, BombState::AwaitingTarget { .. })
    }

    /// Arm (or re-arm, restarting the timer)
    pub fn arm(&mut self) {
        *self = BombState::AwaitingTarget { elapsed_ms: 0 };
    }

    /// Return to idle. Returns whether a bomb was armed.
    pub fn disarm(&mut self) -> bool {
        let was_armed = self.is_armed();
        *self = BombState::Idle;
        was_armed
    }

    /// Advance the timer. Returns true when this tick made the bomb expire.
    pub fn tick(&mut self, elapsed_ms: u32, timeout_ms: u32) -> bool {
        if let BombState::AwaitingTarget { elapsed_ms: waited } = self {
            *waited = waited.saturating_add(elapsed_ms);
            if *waited >= timeout_ms {
                *self = BombState::Idle;
                return true;
            }
        }
        false
    }
}
