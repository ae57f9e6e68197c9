//! Harvest Hustle - a farm-to-feast collection game for a pocket handheld
//!
//! Core modules:
//! - `gesture`: Accelerometer/encoder/button samples -> discrete events
//! - `levels`: Static 11-level campaign table with integrity validation
//! - `sim`: Deterministic simulation (screen flow, entity field, cooking)
//! - `score`: Running-total ledger with retry forfeiture
//! - `highscores`: 3-entry leaderboard over a 15-byte storage block
//! - `render`: Display-facing snapshot of the current tick
//! - `feedback`: Declarative audio/LED event queue
//!
//! The engine is single threaded and tick driven: the host calls
//! [`sim::tick`] once per frame with an optional input sample and the
//! wall-clock delta, then drains feedback events and reads a render model.

pub mod feedback;
pub mod gesture;
pub mod highscores;
pub mod levels;
pub mod render;
pub mod score;
pub mod sim;

pub use highscores::HighScores;
pub use score::ScoreLedger;
pub use sim::{GameState, Screen};

/// Game configuration constants
pub mod consts {
    /// Accelerometer magnitude (m/s²) that registers a shake
    pub const SHAKE_THRESHOLD: f32 = 18.0;
    /// Dominant-axis deviation (m/s²) that registers a tilt
    pub const TILT_THRESHOLD: f32 = 4.0;
    /// Minimum seconds between accepted tilts
    pub const TILT_DEBOUNCE: f32 = 0.1;
    /// Minimum seconds between honored button transitions
    pub const BUTTON_DEBOUNCE: f32 = 0.05;

    /// Points per collection method
    pub const TILT_POINTS: u32 = 10;
    pub const TOUCH_POINTS: u32 = 20;
    pub const SHAKE_POINTS: u32 = 30;
    pub const ROTATE_POINTS: u32 = 50;

    /// Continuous proximity seconds before a touch catch completes
    pub const TOUCH_HOLD: f32 = 0.6;
    /// Rotate ticks to finish a station when the level has no override
    pub const ROTATE_NEEDED_DEFAULT: u32 = 5;

    /// Collection radii (display pixels)
    pub const ITEM_RADIUS: f32 = 12.0;
    pub const TOUCH_RADIUS: f32 = 15.0;
    pub const ROTATE_RADIUS: f32 = 15.0;
    pub const TREE_RADIUS: f32 = 18.0;
    pub const BEE_RADIUS: f32 = 18.0;
    pub const HAZARD_RADIUS: f32 = 12.0;

    /// Player bounds on the 128x64 panel
    pub const PLAYER_X_MIN: f32 = 12.0;
    pub const PLAYER_X_MAX: f32 = 116.0;
    pub const PLAYER_Y_MIN: f32 = 16.0;
    pub const PLAYER_Y_MAX: f32 = 46.0;
    /// Animals roam a slightly tighter box
    pub const ANIMAL_X_MIN: f32 = 15.0;
    pub const ANIMAL_X_MAX: f32 = 113.0;
    pub const ANIMAL_Y_MIN: f32 = 16.0;
    pub const ANIMAL_Y_MAX: f32 = 46.0;
    /// Drifting pickups bounce inside this box
    pub const ITEM_X_MIN: f32 = 12.0;
    pub const ITEM_X_MAX: f32 = 116.0;
    pub const ITEM_Y_MIN: f32 = 14.0;
    pub const ITEM_Y_MAX: f32 = 48.0;

    /// Side-view lane geometry
    pub const SIDE_PLAYER_Y: f32 = 45.0;
    pub const SIDE_SKY_Y: f32 = 12.0;
    pub const SIDE_GROUND_Y: f32 = 44.0;
    /// Entities at or below this y are inside the ground lane
    pub const SIDE_LANE_Y: f32 = 38.0;
    /// Side-view items despawn past this y
    pub const SIDE_DESPAWN_Y: f32 = 55.0;

    /// Player step per accepted tilt
    pub const PLAYER_STEP: f32 = 6.0;
    /// Knockback along x when a hazard connects
    pub const HAZARD_PUSH: f32 = 15.0;

    /// Animal speeds (px/s)
    pub const PATROL_SPEED: f32 = 30.0;
    pub const FLEE_SPEED: f32 = 60.0;
    pub const HAZARD_SPEED: f32 = 45.0;
    /// Flee animals steer away once the player is this close
    pub const FLEE_TRIGGER: f32 = 20.0;
    /// A pig speeds up by this factor after being collected from
    pub const PIG_SPOOK_FACTOR: f32 = 1.3;

    /// Pickup motion (px/s)
    pub const ITEM_FALL_SPEED: f32 = 36.0;
    pub const ITEM_DRIFT_X: f32 = 9.0;
    pub const ITEM_DRIFT_Y: f32 = 6.0;
    /// Fish drift slower than land pickups
    pub const FISH_DRIFT_X: f32 = 4.5;
    pub const FISH_DRIFT_Y: f32 = 3.0;

    /// Spawn scheduling (seconds / counts)
    pub const SPAWN_INTERVAL: f32 = 2.5;
    pub const SPAWN_INTERVAL_FAST: f32 = 2.0;
    pub const MAX_FIELD_ITEMS: usize = 4;
    pub const TREE_INTERVAL: f32 = 3.0;
    pub const TREE_LIFETIME: f32 = 4.5;
    pub const MAX_TREES: usize = 2;
    pub const BERRY_INTERVAL: f32 = 2.5;
    pub const BERRY_LIFETIME: f32 = 4.0;
    pub const MAX_BERRIES: usize = 2;
    pub const STATION_INTERVAL: f32 = 3.0;
    /// Non-flee chickens lay an egg this often
    pub const EGG_LAY_INTERVAL: f32 = 2.5;

    /// Cooking minigame rates
    pub const COOK_HOLD_RATE: f32 = 40.0; // percent per second of button hold
    pub const COOK_SPIN_RATE: f32 = 5.0; // percent per encoder tick
}

/// Mix a session seed with context salts into a per-stream seed
#[inline]
pub fn mix_seed(seed: u64, salt_a: u64, salt_b: u64) -> u64 {
    seed.wrapping_mul(2654435761)
        .wrapping_add(salt_a.wrapping_mul(7919))
        .wrapping_add(salt_b)
}
