//! Two-band equalizer
//!
//! The low band (lowpass at 200 Hz) and high band (highpass at 2 kHz) are
//! extracted, scaled, and mixed back onto the full-band input. Nothing is
//! subtracted first, so a 0 dB band still adds to the original.

use crate::buffer::AudioBuffer;
use crate::effects::Effect;
use crate::filters::Biquad;

pub const LOW_BAND_CUTOFF_HZ: f32 = 200.0;
pub const HIGH_BAND_CUTOFF_HZ: f32 = 2000.0;
pub const EQ_GAIN_RANGE_DB: (f32, f32) = (-10.0, 10.0);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equalizer {
    low_gain_db: f32,
    high_gain_db: f32,
}

impl Equalizer {
    /// Both gains are clamped to -10..=10 dB
    pub fn new(low_gain_db: f32, high_gain_db: f32) -> Self {
        Self {
            low_gain_db: low_gain_db.clamp(EQ_GAIN_RANGE_DB.0, EQ_GAIN_RANGE_DB.1),
            high_gain_db: high_gain_db.clamp(EQ_GAIN_RANGE_DB.0, EQ_GAIN_RANGE_DB.1),
        }
    }

    pub fn low_gain_db(&self) -> f32 {
        self.low_gain_db
    }

    pub fn high_gain_db(&self) -> f32 {
        self.high_gain_db
    }
}

impl Effect for Equalizer {
    fn name(&self) -> &'static str {
        "eq"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        let sample_rate = input.sample_rate as f32;

        let lows = input
            .map_channels(|c| Biquad::lowpass(sample_rate, LOW_BAND_CUTOFF_HZ).process_block(c))
            .with_gain_db(self.low_gain_db);
        let highs = input
            .map_channels(|c| Biquad::highpass(sample_rate, HIGH_BAND_CUTOFF_HZ).process_block(c))
            .with_gain_db(self.high_gain_db);

        input.overlay(&lows).overlay(&highs)
    }
}
