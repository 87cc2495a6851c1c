//! Per-frame gain curve
//!
//! Bakes a distance-driven volume curve (see
//! [`volume_profile`](crate::attenuation::volume_profile)) into the samples.

use crate::attenuation::{volume_profile, AttenuationSettings};
use crate::buffer::AudioBuffer;
use crate::effects::Effect;
use glam::Vec3;

/// Linear gains sampled once per animation frame
#[derive(Clone, Debug, PartialEq)]
pub struct GainProfile {
    gains: Vec<f32>,
    fps: f32,
}

impl GainProfile {
    pub fn new(gains: Vec<f32>, fps: f32) -> Self {
        Self { gains, fps }
    }

    /// Bake the distance attenuation of per-frame `(object, camera)` positions
    pub fn from_positions<I>(positions: I, settings: &AttenuationSettings, fps: f32) -> Self
    where
        I: IntoIterator<Item = (Vec3, Vec3)>,
    {
        Self::new(volume_profile(positions, settings), fps)
    }

    pub fn gains(&self) -> &[f32] {
        &self.gains
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Gain at `seconds` from the start; holds the last value past the end
    pub fn gain_at(&self, seconds: f32) -> f32 {
        let Some(&last) = self.gains.last() else {
            return 1.0;
        };
        let pos = (seconds * self.fps).max(0.0);
        let index = pos.floor() as usize;
        if index + 1 >= self.gains.len() {
            return last;
        }
        let frac = pos - index as f32;
        let a = self.gains[index];
        a + (self.gains[index + 1] - a) * frac
    }
}

impl Effect for GainProfile {
    fn name(&self) -> &'static str {
        "gain_profile"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        if self.gains.is_empty() || self.fps <= 0.0 || input.sample_rate == 0 {
            return input.clone();
        }

        let channels = input.channels as usize;
        let sample_rate = input.sample_rate as f32;
        let mut output = input.clone();
        for (frame, chunk) in output.samples.chunks_mut(channels).enumerate() {
            let gain = self.gain_at(frame as f32 / sample_rate);
            for sample in chunk {
                *sample = (*sample * gain).clamp(-1.0, 1.0);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_interpolates_between_frames() {
        let profile = GainProfile::new(vec![1.0, 0.0, 0.5], 10.0);
        assert_eq!(profile.gain_at(0.0), 1.0);
        assert!((profile.gain_at(0.05) - 0.5).abs() < 1e-6);
        assert!((profile.gain_at(0.15) - 0.25).abs() < 1e-6);
        assert_eq!(profile.gain_at(3.0), 0.5);
    }

    #[test]
    fn test_applies_curve_to_every_channel() {
        let input = AudioBuffer::new(vec![1.0; 40], 2, 10, 16);
        let output = GainProfile::new(vec![1.0, 0.0], 1.0).apply(&input);

        assert_eq!(output.frames(), 20);
        assert_eq!(output.samples[0], 1.0);
        assert_eq!(output.samples[1], 1.0);
        assert!((output.samples[10] - 0.5).abs() < 1e-6);
        assert!((output.samples[11] - 0.5).abs() < 1e-6);
        // Held at the last gain
        assert_eq!(output.samples[39], 0.0);
    }

    #[test]
    fn test_from_positions() {
        let camera = Vec3::ZERO;
        let positions = [0.0, 10.0, 30.0].map(|x| (Vec3::new(x, 0.0, 0.0), camera));
        let profile = GainProfile::from_positions(positions, &AttenuationSettings::legacy(), 24.0);
        assert_eq!(profile.fps(), 24.0);
        assert_eq!(profile.gains().len(), 3);
        assert!((profile.gains()[1] - 0.5).abs() < 1e-6);
        assert_eq!(profile.gains()[2], 0.1);
    }

    #[test]
    fn test_empty_profile_is_identity() {
        let input = AudioBuffer::mono(vec![0.3; 10], 100);
        assert_eq!(GainProfile::new(Vec::new(), 24.0).apply(&input), input);
    }
}
