//! Gesture classification
//!
//! One raw sample per tick in, zero or more discrete events out. The
//! classifier owns only debounce state; everything else (what a gesture
//! means) belongs to the active screen's logic.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{BUTTON_DEBOUNCE, SHAKE_THRESHOLD, TILT_DEBOUNCE, TILT_THRESHOLD};

/// One tick's raw sensor readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Accelerometer reading (m/s²), gravity included
    pub accel: Vec3,
    /// Signed encoder movement since the previous sample (positive = clockwise)
    pub encoder_delta: i32,
    /// Raw button level (true = held down)
    pub button: bool,
}

/// Classifier thresholds and debounce windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// m/s² of total magnitude for a shake
    pub shake_threshold: f32,
    /// m/s² of dominant-axis deviation for a tilt
    pub tilt_threshold: f32,
    /// Seconds between accepted tilts
    pub tilt_debounce: f32,
    /// Seconds between honored button transitions
    pub button_debounce: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            shake_threshold: SHAKE_THRESHOLD,
            tilt_threshold: TILT_THRESHOLD,
            tilt_debounce: TILT_DEBOUNCE,
            button_debounce: BUTTON_DEBOUNCE,
        }
    }
}

/// Tilt direction from the dominant accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiltDirection {
    Left,
    Right,
    Forward,
    Back,
}

/// Debounced button signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Debounced rising edge
    Pressed,
    /// Debounced falling edge
    Released,
    /// Level is high; carries the accumulated hold duration
    Held { ms: u32 },
}

/// A discrete, classified input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Tilt(TiltDirection),
    Shake,
    /// Synthesized by the entity field when a touch window completes
    Touch { entity: u32 },
    /// Signed encoder movement this tick
    RotateTick(i32),
    Button(ButtonEvent),
}

/// Stateful sample-to-event classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureClassifier {
    pub config: GestureConfig,
    /// Seconds since the last accepted tilt
    since_tilt: f32,
    /// Debounced button level
    button_level: bool,
    /// Seconds since the last honored button transition
    since_button: f32,
    /// Seconds the debounced level has been high
    hold_time: f32,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            // Start with the windows elapsed so the first gesture lands
            since_tilt: config.tilt_debounce,
            button_level: false,
            since_button: config.button_debounce,
            hold_time: 0.0,
        }
    }

    /// Classify one tick's sample
    ///
    /// `None` means the input collaborator failed this tick: no events are
    /// produced but the debounce clocks still advance.
    pub fn classify(&mut self, sample: Option<&InputSample>, dt: f32) -> Vec<GestureEvent> {
        self.since_tilt += dt;
        self.since_button += dt;

        let Some(sample) = sample else {
            if self.button_level {
                self.hold_time += dt;
            }
            return Vec::new();
        };

        let mut events = Vec::new();

        // Shake wins over tilt within a tick
        if sample.accel.length() > self.config.shake_threshold {
            events.push(GestureEvent::Shake);
        } else if let Some(direction) = self.tilt_direction(sample.accel) {
            if self.since_tilt >= self.config.tilt_debounce {
                self.since_tilt = 0.0;
                events.push(GestureEvent::Tilt(direction));
            }
        }

        if sample.encoder_delta != 0 {
            events.push(GestureEvent::RotateTick(sample.encoder_delta));
        }

        // One transition per debounce window; flicker inside it is ignored
        if sample.button != self.button_level && self.since_button >= self.config.button_debounce {
            self.button_level = sample.button;
            self.since_button = 0.0;
            if sample.button {
                self.hold_time = 0.0;
                events.push(GestureEvent::Button(ButtonEvent::Pressed));
            } else {
                events.push(GestureEvent::Button(ButtonEvent::Released));
            }
        }
        if self.button_level {
            self.hold_time += dt;
            events.push(GestureEvent::Button(ButtonEvent::Held {
                ms: (self.hold_time * 1000.0) as u32,
            }));
        }

        events
    }

    /// Dominant-axis tilt: X maps to left/right, Y to forward/back.
    /// An exact tie between the axes goes to X.
    fn tilt_direction(&self, accel: Vec3) -> Option<TiltDirection> {
        let (x, y) = (accel.x, accel.y);
        if x.abs() > self.config.tilt_threshold && x.abs() >= y.abs() {
            Some(if x > 0.0 {
                TiltDirection::Right
            } else {
                TiltDirection::Left
            })
        } else if y.abs() > self.config.tilt_threshold && y.abs() > x.abs() {
            Some(if y > 0.0 {
                TiltDirection::Forward
            } else {
                TiltDirection::Back
            })
        } else {
            None
        }
    }
}
