//! Ordered effect chains and their serialisable settings

use crate::buffer::AudioBuffer;
use crate::effects::{Delay, Effect, Equalizer, PitchShift, Reverb, SpectralLowpass};
use serde::{Deserialize, Serialize};

/// Effects applied one after another, each to the previous result
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push`](Self::push)
    pub fn with<E: Effect + 'static>(mut self, effect: E) -> Self {
        self.push(effect);
        self
    }

    pub fn push<E: Effect + 'static>(&mut self, effect: E) {
        self.effects.push(Box::new(effect));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Fold every effect over `input` in order. An empty chain returns a copy.
    pub fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        self.effects.iter().fold(input.clone(), |buffer, effect| {
            log::debug!("applying {} to {} frames", effect.name(), buffer.frames());
            effect.apply(&buffer)
        })
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Effect toggles and parameters, as stored in a chain settings file.
///
/// Values are kept as given and clamped to each effect's range when the
/// chain is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub reverb_enabled: bool,
    pub reverb_delay_ms: f32,
    pub reverb_decay_db: f32,

    pub delay_enabled: bool,
    pub delay_time_ms: f32,
    pub delay_decay_db: f32,
    pub delay_repetitions: u32,

    pub eq_enabled: bool,
    pub eq_low_gain_db: f32,
    pub eq_high_gain_db: f32,

    pub pitch_enabled: bool,
    pub pitch_semitones: i32,

    pub lowpass_enabled: bool,
    pub lowpass_cutoff_hz: f32,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            reverb_enabled: true,
            reverb_delay_ms: 300.0,
            reverb_decay_db: 12.0,
            delay_enabled: true,
            delay_time_ms: 500.0,
            delay_decay_db: 6.0,
            delay_repetitions: 2,
            eq_enabled: true,
            eq_low_gain_db: 0.0,
            eq_high_gain_db: 0.0,
            pitch_enabled: true,
            pitch_semitones: 0,
            lowpass_enabled: false,
            lowpass_cutoff_hz: 3000.0,
        }
    }
}

impl ChainSettings {
    /// Settings with every effect switched off
    pub fn none() -> Self {
        Self {
            reverb_enabled: false,
            delay_enabled: false,
            eq_enabled: false,
            pitch_enabled: false,
            lowpass_enabled: false,
            ..Self::default()
        }
    }

    /// Build the chain: reverb, delay, eq, pitch shift, low-pass
    pub fn to_chain(&self) -> EffectChain {
        let mut chain = EffectChain::new();
        if self.reverb_enabled {
            chain.push(Reverb::new(self.reverb_delay_ms, self.reverb_decay_db));
        }
        if self.delay_enabled {
            chain.push(Delay::new(
                self.delay_time_ms,
                self.delay_decay_db,
                self.delay_repetitions,
            ));
        }
        if self.eq_enabled {
            chain.push(Equalizer::new(self.eq_low_gain_db, self.eq_high_gain_db));
        }
        if self.pitch_enabled {
            chain.push(PitchShift::new(self.pitch_semitones));
        }
        if self.lowpass_enabled {
            chain.push(SpectralLowpass::new(self.lowpass_cutoff_hz));
        }
        chain
    }
}
