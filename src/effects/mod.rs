//! Offline effects applied to whole [`AudioBuffer`]s
//!
//! Each effect takes a buffer and returns a new one; inputs are never
//! modified. Effects are combined with [`EffectChain`].

pub mod chain;
pub mod delay;
pub mod eq;
pub mod gain_profile;
pub mod lowpass_filter;
pub mod pitch_shift;
pub mod reverb;

pub use self::chain::{ChainSettings, EffectChain};
pub use self::delay::Delay;
pub use self::eq::Equalizer;
pub use self::gain_profile::GainProfile;
pub use self::lowpass_filter::SpectralLowpass;
pub use self::pitch_shift::PitchShift;
pub use self::reverb::Reverb;

use crate::buffer::AudioBuffer;

/// Trait that all chain effects must implement
pub trait Effect: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Produce the processed copy of `input`
    fn apply(&self, input: &AudioBuffer) -> AudioBuffer;
}
