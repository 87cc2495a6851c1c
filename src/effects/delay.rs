//! Multi-tap echo
//!
//! Repetition `i` (1-based) is the input delayed by `i * time` and attenuated
//! by `i * decay` dB. Every tap is mixed onto the dry signal, which sets the
//! output length.

use crate::buffer::AudioBuffer;
use crate::effects::Effect;

pub const DELAY_TIME_RANGE_MS: (f32, f32) = (10.0, 2000.0);
pub const DELAY_DECAY_RANGE_DB: (f32, f32) = (0.0, 20.0);
pub const MAX_REPETITIONS: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Delay {
    time_ms: f32,
    decay_db: f32,
    repetitions: u32,
}

impl Delay {
    /// Create a delay
    ///
    /// # Arguments
    /// * `time_ms` - Spacing between taps in milliseconds (clamped to 10-2000)
    /// * `decay_db` - Extra attenuation per tap in dB (clamped to 0-20)
    /// * `repetitions` - Number of taps (clamped to 0-10)
    pub fn new(time_ms: f32, decay_db: f32, repetitions: u32) -> Self {
        Self {
            time_ms: time_ms.clamp(DELAY_TIME_RANGE_MS.0, DELAY_TIME_RANGE_MS.1),
            decay_db: decay_db.clamp(DELAY_DECAY_RANGE_DB.0, DELAY_DECAY_RANGE_DB.1),
            repetitions: repetitions.min(MAX_REPETITIONS),
        }
    }

    pub fn time_ms(&self) -> f32 {
        self.time_ms
    }

    pub fn decay_db(&self) -> f32 {
        self.decay_db
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(500.0, 6.0, 2)
    }
}

impl Effect for Delay {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        let mut output = input.clone();
        for i in 1..=self.repetitions {
            let tap = input
                .with_gain_db(-self.decay_db * i as f32)
                .delayed(self.time_ms * i as f32);
            output = output.overlay(&tap);
        }
        output
    }
}
