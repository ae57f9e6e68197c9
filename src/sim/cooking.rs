//! Cooking minigame
//!
//! A small sub-machine that runs after the field requirements are met on
//! levels with a cooking step. Phase1 fills while the button is held and
//! never drains; double-phase levels then fill Phase2 with encoder spin.

use serde::{Deserialize, Serialize};

use crate::consts::{COOK_HOLD_RATE, COOK_SPIN_RATE};
use crate::gesture::{ButtonEvent, GestureEvent};

/// Minigame phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookPhase {
    Idle,
    /// Hold-the-button phase
    Phase1,
    /// Spin-the-encoder phase (double-phase cooks only)
    Phase2,
    Complete,
}

/// Cooking minigame state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooking {
    pub phase: CookPhase,
    /// Percent complete of the current phase (0..=100, monotonic per phase)
    pub progress: f32,
    /// A second rotate phase gates completion
    pub double: bool,
    /// Last 10% step already reported as feedback
    reported: u8,
}

impl Cooking {
    /// Parked state outside the cooking screen
    pub fn idle() -> Self {
        Self {
            phase: CookPhase::Idle,
            progress: 0.0,
            double: false,
            reported: 0,
        }
    }

    /// Start Phase1; `double` adds the encoder phase before completion
    pub fn begin(double: bool) -> Self {
        Self {
            phase: CookPhase::Phase1,
            progress: 0.0,
            double,
            reported: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == CookPhase::Complete
    }

    /// Currently in the encoder phase
    pub fn second_phase(&self) -> bool {
        self.phase == CookPhase::Phase2
    }

    /// Advance by one tick's events
    ///
    /// Returns `Some(percent)` when the visible percent crosses a 10%
    /// step, for the `CookingProgress` feedback cue.
    pub fn advance(&mut self, events: &[GestureEvent], dt: f32) -> Option<u8> {
        match self.phase {
            CookPhase::Idle | CookPhase::Complete => return None,
            CookPhase::Phase1 => {
                let held = events
                    .iter()
                    .any(|e| matches!(e, GestureEvent::Button(ButtonEvent::Held { .. })));
                if held {
                    self.progress = (self.progress + COOK_HOLD_RATE * dt).min(100.0);
                }
            }
            CookPhase::Phase2 => {
                let spin: u32 = events
                    .iter()
                    .filter_map(|e| match e {
                        GestureEvent::RotateTick(delta) => Some(delta.unsigned_abs()),
                        _ => None,
                    })
                    .sum();
                if spin > 0 {
                    self.progress = (self.progress + COOK_SPIN_RATE * spin as f32).min(100.0);
                }
            }
        }

        let step = (self.progress / 10.0) as u8;
        let report = if step > self.reported {
            self.reported = step;
            Some(step * 10)
        } else {
            None
        };

        if self.progress >= 100.0 {
            if self.phase == CookPhase::Phase1 && self.double {
                self.phase = CookPhase::Phase2;
                self.progress = 0.0;
                self.reported = 0;
            } else {
                self.phase = CookPhase::Complete;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 30.0;

    fn held() -> Vec<GestureEvent> {
        vec![GestureEvent::Button(ButtonEvent::Held { ms: 100 })]
    }

    fn spin(delta: i32) -> Vec<GestureEvent> {
        vec![GestureEvent::RotateTick(delta)]
    }

    #[test]
    fn test_single_phase_completes_on_hold() {
        let mut cook = Cooking::begin(false);
        // 40%/s: 2.5 s of holding fills the bar
        for _ in 0..100 {
            cook.advance(&held(), DT);
        }
        assert!(cook.is_complete());
    }

    #[test]
    fn test_release_never_resets_progress() {
        let mut cook = Cooking::begin(false);
        for _ in 0..30 {
            cook.advance(&held(), DT);
        }
        let before = cook.progress;
        assert!(before > 0.0);

        // A full second with the button up: progress holds
        for _ in 0..30 {
            cook.advance(&[], DT);
        }
        assert_eq!(cook.progress, before);

        // Resuming the hold picks up where it left off
        cook.advance(&held(), DT);
        assert!(cook.progress > before);
    }

    #[test]
    fn test_double_phase_gates_on_first() {
        let mut cook = Cooking::begin(true);

        // Spinning during Phase1 does nothing
        cook.advance(&spin(5), DT);
        assert_eq!(cook.phase, CookPhase::Phase1);
        assert_eq!(cook.progress, 0.0);

        for _ in 0..100 {
            cook.advance(&held(), DT);
        }
        assert_eq!(cook.phase, CookPhase::Phase2);
        assert_eq!(cook.progress, 0.0);

        // 5% per tick unit: 20 units fill Phase2, either spin direction
        for _ in 0..10 {
            cook.advance(&spin(-2), DT);
        }
        assert!(cook.is_complete());
    }

    #[test]
    fn test_progress_feedback_on_ten_percent_steps() {
        let mut cook = Cooking::begin(false);
        let mut reports = Vec::new();
        // 40%/s at 0.1 s per tick: +4% per tick
        for _ in 0..25 {
            if let Some(percent) = cook.advance(&held(), 0.1) {
                reports.push(percent);
            }
        }
        assert_eq!(reports, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(cook.is_complete());
    }

    #[test]
    fn test_idle_ignores_everything() {
        let mut cook = Cooking::idle();
        assert_eq!(cook.advance(&held(), DT), None);
        assert_eq!(cook.advance(&spin(10), DT), None);
        assert_eq!(cook.phase, CookPhase::Idle);
    }
}
