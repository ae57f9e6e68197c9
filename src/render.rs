//! Display-facing render model
//!
//! The engine never draws. Once per tick the host takes a snapshot of
//! everything the display collaborator needs and lays it out however the
//! hardware likes. Serializable so host tooling can log or replay frames.

use serde::Serialize;

use crate::consts::TOUCH_HOLD;
use crate::sim::state::{GameState, Screen};
use crate::sim::CookPhase;

/// Per-tick snapshot for the display collaborator
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub screen: Screen,
    /// Present on the gameplay and cooking screens
    pub hud: Option<Hud>,
    pub payload: Payload,
}

/// Always-visible gameplay header
#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub time_left: f32,
    pub score: u32,
    pub needs: Vec<NeedLine>,
}

/// One collected-vs-required line
#[derive(Debug, Clone, Serialize)]
pub struct NeedLine {
    pub kind: &'static str,
    pub method: &'static str,
    pub have: u8,
    pub need: u8,
}

/// One drawable field object
#[derive(Debug, Clone, Serialize)]
pub struct Sprite {
    pub kind: &'static str,
    pub pos: [f32; 2],
    /// Open catch window, 0..1 (a progress ring around the animal)
    pub catch: f32,
    /// Rotate ticks banked at a station
    pub spins: u32,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub initials: String,
    pub score: u16,
}

/// Screen-specific content
#[derive(Debug, Clone, Serialize)]
pub enum Payload {
    Title,
    ModeSelect {
        difficulty: &'static str,
    },
    LevelSelect {
        level: usize,
        name: &'static str,
    },
    Intro {
        name: &'static str,
        dish: &'static str,
        page: u8,
        pages: u8,
    },
    Gameplay {
        player: [f32; 2],
        sprites: Vec<Sprite>,
    },
    Cooking {
        label: &'static str,
        percent: u8,
        /// Second phase of a double cook
        second: bool,
    },
    Clear {
        level: usize,
        dish: &'static str,
        score: u32,
    },
    GameOver {
        retry_selected: bool,
    },
    Win {
        score: u32,
    },
    EnterInitials {
        entered: String,
        cursor: char,
    },
    HighScores {
        rows: Vec<ScoreRow>,
    },
}

impl GameState {
    /// Snapshot the current tick for the display collaborator
    pub fn render_model(&self) -> RenderModel {
        let level = self.level_def();
        let hud = match self.screen {
            Screen::Gameplay | Screen::Cooking => Some(Hud {
                time_left: self.session.time_left,
                score: self.ledger.total(),
                needs: level
                    .ingredients
                    .iter()
                    .map(|need| NeedLine {
                        kind: need.kind.label(),
                        method: need.method.label(),
                        have: self.player.count(need.kind).min(need.count),
                        need: need.count,
                    })
                    .collect(),
            }),
            _ => None,
        };

        let payload = match self.screen {
            Screen::Title => Payload::Title,
            Screen::ModeSelect => Payload::ModeSelect {
                difficulty: self.session.difficulty.label(),
            },
            Screen::LevelSelect => Payload::LevelSelect {
                level: self.session.level + 1,
                name: level.name,
            },
            Screen::Intro => Payload::Intro {
                name: level.name,
                dish: level.dish,
                page: self.menu.intro_page + 1,
                pages: level.intro_pages(),
            },
            Screen::Gameplay => Payload::Gameplay {
                player: self.player.pos.into(),
                sprites: self
                    .field
                    .entities
                    .iter()
                    .filter(|e| e.in_play())
                    .map(|e| Sprite {
                        kind: e.kind.label(),
                        pos: e.pos.into(),
                        catch: (e.catch_progress / TOUCH_HOLD).min(1.0),
                        spins: e.rotate_progress,
                    })
                    .collect(),
            },
            Screen::Cooking => {
                let spec = level.cooking.unwrap_or(crate::levels::CookingSpec {
                    label: "Cooking...",
                    second: None,
                });
                let second = self.cooking.phase == CookPhase::Phase2;
                Payload::Cooking {
                    label: if second {
                        spec.second.unwrap_or(spec.label)
                    } else {
                        spec.label
                    },
                    percent: self.cooking.progress as u8,
                    second,
                }
            }
            Screen::Clear => Payload::Clear {
                level: self.session.level + 1,
                dish: level.dish,
                score: self.ledger.total(),
            },
            Screen::GameOver => Payload::GameOver {
                retry_selected: self.menu.over_choice
                    == crate::sim::state::OverChoice::RetryLevel,
            },
            Screen::Win => Payload::Win {
                score: self.ledger.total(),
            },
            Screen::EnterInitials => Payload::EnterInitials {
                entered: self.menu.initials[..self.menu.initials_len as usize]
                    .iter()
                    .map(|&b| b as char)
                    .collect(),
                cursor: (b'A' + self.menu.letter) as char,
            },
            Screen::HighScores => Payload::HighScores {
                rows: self
                    .scores
                    .entries
                    .iter()
                    .map(|entry| ScoreRow {
                        initials: entry.initials_str().to_owned(),
                        score: entry.score,
                    })
                    .collect(),
            },
        };

        RenderModel {
            screen: self.screen,
            hud,
            payload,
        }
    }
}
