//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module is pure and deterministic:
//! seeded RNG only, timers advanced by the caller's measured dt, stable
//! iteration order by entity id, and no rendering or platform code.

pub mod collision;
pub mod cooking;
pub mod field;
pub mod state;
pub mod tick;

pub use cooking::{CookPhase, Cooking};
pub use field::{Entity, EntityKind, Field, Lifecycle};
pub use state::{
    Difficulty, GameState, MenuState, OverChoice, Player, Screen, ScoresExit, Session,
};
pub use tick::tick;
