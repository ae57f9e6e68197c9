//! Host bring-up binary
//!
//! Diagnostic driver for the engine: validates the campaign table, loads
//! the leaderboard from a small file, then plays a scripted session with
//! synthetic sensor samples, printing one JSON render snapshot per
//! simulated second. On the device the same tick loop runs against the
//! real sensor, display and NVM collaborators.

use std::fs;
use std::path::PathBuf;

use glam::Vec3;

use harvest_hustle::gesture::InputSample;
use harvest_hustle::highscores::{HighScores, StorageBlock, StorageError, BLOCK_LEN};
use harvest_hustle::levels;
use harvest_hustle::sim::{tick, GameState};

/// Ticks per simulated second
const TICK_HZ: u32 = 30;
const DT: f32 = 1.0 / TICK_HZ as f32;

/// The 15-byte high-score block persisted as a plain file
struct FileStore {
    path: PathBuf,
}

impl StorageBlock for FileStore {
    fn read_block(&mut self) -> Result<[u8; BLOCK_LEN], StorageError> {
        let bytes = fs::read(&self.path).map_err(|_| StorageError::Read)?;
        if bytes.len() != BLOCK_LEN {
            return Err(StorageError::Read);
        }
        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&bytes);
        Ok(block)
    }

    fn write_block(&mut self, block: &[u8; BLOCK_LEN]) -> Result<(), StorageError> {
        fs::write(&self.path, block).map_err(|_| StorageError::Write)
    }
}

fn rest() -> InputSample {
    InputSample {
        accel: Vec3::new(0.0, 0.0, 9.8),
        encoder_delta: 0,
        button: false,
    }
}

/// One debounced press-and-release
fn press(state: &mut GameState, store: &mut dyn StorageBlock) {
    let down = InputSample {
        button: true,
        ..rest()
    };
    tick(state, Some(&down), 0.1, store);
    tick(state, Some(&rest()), 0.1, store);
}

fn main() {
    env_logger::init();

    if let Err(err) = levels::validate_all() {
        log::error!("campaign table rejected: {err}");
        std::process::exit(1);
    }

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xFA12_5EED);
    log::info!("session seed {seed:#x}");

    let mut store = FileStore {
        path: PathBuf::from("highscores.bin"),
    };
    let scores = HighScores::load_from(&mut store);
    let mut state = GameState::new(seed, scores);

    // Click through Title, ModeSelect, LevelSelect and the intro into
    // level 1 on Easy
    for _ in 0..4 {
        press(&mut state, &mut store);
    }

    // Thirty simulated seconds of wobbling, spinning and the odd shake
    for i in 0..(30 * TICK_HZ) {
        let t = i as f32 * DT;
        let shake = i % 90 == 60;
        let sample = InputSample {
            accel: if shake {
                Vec3::new(14.0, 6.0, 14.0)
            } else {
                Vec3::new((t * 1.7).sin() * 6.0, (t * 1.1).cos() * 3.0, 9.8)
            },
            encoder_delta: i32::from(i % 45 == 0),
            button: false,
        };
        tick(&mut state, Some(&sample), DT, &mut store);

        for event in state.drain_feedback() {
            log::info!("t={t:.2}s feedback {event:?}");
        }
        if i % TICK_HZ == 0 {
            match serde_json::to_string(&state.render_model()) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("snapshot failed: {err}"),
            }
        }
    }

    log::info!(
        "scripted run finished on {:?} with {} pts",
        state.render_model().screen,
        state.ledger.total()
    );
}
