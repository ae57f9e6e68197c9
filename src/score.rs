//! Score ledger
//!
//! Tracks the session total alongside the points earned in the current
//! level attempt, so a retry can hand exactly those points back.

use serde::{Deserialize, Serialize};

/// Running score with per-level forfeiture
///
/// Invariant: `total >= level_earned` at all times, so forfeiting can
/// never drive the total negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    total: u32,
    level_earned: u32,
}

impl ScoreLedger {
    /// Fresh ledger with both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Session total
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Points earned since the current level (re)started
    pub fn level_earned(&self) -> u32 {
        self.level_earned
    }

    /// Bank points for a collection
    pub fn award(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
        self.level_earned = self.level_earned.saturating_add(points);
    }

    /// Hand back everything earned this level attempt, clamped at zero
    pub fn forfeit_level(&mut self) {
        self.total = self.total.saturating_sub(self.level_earned);
        self.level_earned = 0;
    }

    /// Begin a fresh level attempt
    pub fn start_level(&mut self) {
        self.level_earned = 0;
    }

    /// Wipe both counters (new game)
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}
