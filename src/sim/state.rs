//! Game state and screen flow types
//!
//! Everything the engine needs to resume a session lives here and is
//! serializable; the only state crossing a power cycle is the high-score
//! table, which the host loads before calling [`GameState::new`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cooking::Cooking;
use super::field::Field;
use crate::consts::SIDE_PLAYER_Y;
use crate::feedback::FeedbackEvent;
use crate::gesture::GestureClassifier;
use crate::highscores::{HighScores, INITIALS_LEN};
use crate::levels::{Ingredient, LevelDefinition, ViewKind, LEVELS};
use crate::mix_seed;
use crate::score::ScoreLedger;

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Title,
    ModeSelect,
    LevelSelect,
    Intro,
    Gameplay,
    Cooking,
    Clear,
    GameOver,
    Win,
    EnterInitials,
    HighScores,
}

/// Session difficulty, fixes the per-level time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Seconds granted per level attempt
    pub fn time_limit(self) -> f32 {
        match self {
            Difficulty::Easy => 90.0,
            Difficulty::Medium => 60.0,
            Difficulty::Hard => 45.0,
        }
    }

    /// Clockwise cycle on the mode-select screen
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Game-over menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverChoice {
    #[default]
    RetryLevel,
    RestartGame,
}

impl OverChoice {
    pub fn toggled(self) -> Self {
        match self {
            OverChoice::RetryLevel => OverChoice::RestartGame,
            OverChoice::RestartGame => OverChoice::RetryLevel,
        }
    }
}

/// Where the high-score screen hands control back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoresExit {
    /// Restart-after-game-over path: back to mode select
    #[default]
    Restart,
    /// Campaign won: full reset to the title screen
    Victory,
}

/// Mutable per-run session data
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Session {
    pub difficulty: Difficulty,
    /// Zero-based index into [`LEVELS`]
    pub level: usize,
    /// Seconds left for the current attempt; never increases
    pub time_left: f32,
    pub retries: u32,
}

/// The farmer on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collected count per ingredient kind
    pub counts: [u8; Ingredient::COUNT],
    /// A shark took a fish back this tick
    #[serde(skip)]
    pub fish_stolen: bool,
}

impl Player {
    /// Centered starting spot for the given view
    pub fn at_level_start(view: ViewKind) -> Self {
        let y = match view {
            ViewKind::TopDown => 30.0,
            ViewKind::Side => SIDE_PLAYER_Y,
        };
        Self {
            pos: Vec2::new(64.0, y),
            counts: [0; Ingredient::COUNT],
            fish_stolen: false,
        }
    }

    pub fn count(&self, kind: Ingredient) -> u8 {
        self.counts[kind.index()]
    }

    /// Bank one collected ingredient
    pub fn record(&mut self, kind: Ingredient) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(1);
    }

    /// Remove one (the shark's doing); returns false when none were held
    pub fn take(&mut self, kind: Ingredient) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Menu and entry cursors outside gameplay
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MenuState {
    pub over_choice: OverChoice,
    pub scores_exit: ScoresExit,
    /// Current intro page (0-based)
    pub intro_page: u8,
    /// Confirmed initials so far
    pub initials: [u8; INITIALS_LEN],
    pub initials_len: u8,
    /// Letter under the cursor (0 = 'A')
    pub letter: u8,
}

/// Complete engine state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub screen: Screen,
    pub session: Session,
    pub ledger: ScoreLedger,
    pub player: Player,
    pub field: Field,
    pub cooking: Cooking,
    pub gestures: GestureClassifier,
    pub scores: HighScores,
    pub menu: MenuState,
    /// Tick counter; also salts per-level RNG streams
    pub time_ticks: u64,
    /// Feedback queued for the audio/LED collaborators
    #[serde(skip)]
    feedback: Vec<FeedbackEvent>,
}

impl GameState {
    /// Boot into the title screen with a previously loaded leaderboard
    pub fn new(seed: u64, scores: HighScores) -> Self {
        Self {
            seed,
            screen: Screen::Title,
            session: Session::default(),
            ledger: ScoreLedger::new(),
            player: Player::at_level_start(ViewKind::TopDown),
            field: Field::empty(),
            cooking: Cooking::idle(),
            gestures: GestureClassifier::default(),
            scores,
            menu: MenuState::default(),
            time_ticks: 0,
            feedback: Vec::new(),
        }
    }

    /// Definition of the session's current level
    pub fn level_def(&self) -> &'static LevelDefinition {
        &LEVELS[self.session.level]
    }

    /// Enter the current level's intro: the single (re)initialization
    /// point for the timer, the field, the player and the cooking step
    pub fn enter_intro(&mut self) {
        let level = self.level_def();
        self.ledger.start_level();
        self.session.time_left = self.session.difficulty.time_limit();
        self.player = Player::at_level_start(level.view);
        self.field = Field::populate(
            level,
            mix_seed(self.seed, self.session.level as u64, self.time_ticks),
        );
        self.cooking = Cooking::idle();
        self.menu.intro_page = 0;
        self.screen = Screen::Intro;
        log::info!(
            "intro: level {} \"{}\" ({} s budget)",
            self.session.level + 1,
            level.name,
            self.session.difficulty.time_limit()
        );
    }

    /// Full reset back to the title screen; the leaderboard survives
    pub fn full_reset(&mut self) {
        self.session = Session::default();
        self.ledger.reset_all();
        self.player = Player::at_level_start(ViewKind::TopDown);
        self.field = Field::empty();
        self.cooking = Cooking::idle();
        self.menu = MenuState::default();
        self.screen = Screen::Title;
    }

    pub(crate) fn push_feedback(&mut self, event: FeedbackEvent) {
        self.feedback.push(event);
    }

    /// Hand the queued feedback to the audio/LED collaborators
    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.feedback)
    }
}
