//! Single-echo reverb
//!
//! One copy of the input, delayed and attenuated, mixed back onto the dry
//! signal. The output keeps the input length.

use crate::buffer::AudioBuffer;
use crate::effects::Effect;

pub const REVERB_DELAY_RANGE_MS: (f32, f32) = (10.0, 1000.0);
pub const REVERB_DECAY_RANGE_DB: (f32, f32) = (0.0, 20.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Reverb {
    delay_ms: f32,
    decay_db: f32,
}

impl Reverb {
    /// Create a reverb
    ///
    /// # Arguments
    /// * `delay_ms` - Echo delay in milliseconds (clamped to 10-1000)
    /// * `decay_db` - Echo attenuation in dB (clamped to 0-20)
    pub fn new(delay_ms: f32, decay_db: f32) -> Self {
        Self {
            delay_ms: delay_ms.clamp(REVERB_DELAY_RANGE_MS.0, REVERB_DELAY_RANGE_MS.1),
            decay_db: decay_db.clamp(REVERB_DECAY_RANGE_DB.0, REVERB_DECAY_RANGE_DB.1),
        }
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn decay_db(&self) -> f32 {
        self.decay_db
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(300.0, 12.0)
    }
}

impl Effect for Reverb {
    fn name(&self) -> &'static str {
        "reverb"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        let echo = input.with_gain_db(-self.decay_db).delayed(self.delay_ms);
        input.overlay(&echo)
    }
}
