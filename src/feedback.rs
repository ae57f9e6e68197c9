//! Declarative feedback events for the audio/LED collaborators
//!
//! The core never talks to a speaker or LED driver. It enqueues these on
//! the game state and the host drains them once per tick, mapping each to
//! whatever tones and light patterns the hardware offers.

use serde::{Deserialize, Serialize};

/// A single audio/LED cue emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackEvent {
    /// An ingredient was collected
    Collected,
    /// A hazard fired: bee-blocked shake, shark contact, or level timeout
    Penalty,
    /// Menu navigation (rotate or confirm)
    Selection,
    /// A level was cleared (also the jingle after initials are saved)
    LevelClear,
    /// Cooking progress crossed a 10% step (payload is the new percent)
    CookingProgress(u8),
    /// All 11 levels cleared
    Victory,
    /// Back on the title screen
    Idle,
}
