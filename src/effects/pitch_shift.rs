//! Resampling pitch shift
//!
//! The buffer is resampled by `2^(semitones/12)`, which moves the pitch and
//! changes the length, then stretched back to the original length with a
//! windowed overlap-add. Grain boundary artifacts are audible on sustained
//! tones and are accepted.

use crate::buffer::AudioBuffer;
use crate::effects::Effect;
use std::f32::consts::PI;

pub const SEMITONE_RANGE: (i32, i32) = (-12, 12);

/// Overlap-add grain length
const GRAIN_MS: f32 = 50.0;
const MIN_GRAIN: usize = 16;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PitchShift {
    semitones: i32,
}

impl PitchShift {
    /// `semitones` is clamped to -12..=12
    pub fn new(semitones: i32) -> Self {
        Self {
            semitones: semitones.clamp(SEMITONE_RANGE.0, SEMITONE_RANGE.1),
        }
    }

    pub fn semitones(&self) -> i32 {
        self.semitones
    }

    pub fn ratio(&self) -> f64 {
        2f64.powf(self.semitones as f64 / 12.0)
    }
}

impl Effect for PitchShift {
    fn name(&self) -> &'static str {
        "pitch_shift"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        if self.semitones == 0 || input.is_empty() {
            return input.clone();
        }

        let ratio = self.ratio();
        let grain = input.ms_to_frames(GRAIN_MS).max(MIN_GRAIN);

        input.map_channels(|channel| {
            let len = channel.len();
            let shifted_len = ((len as f64 / ratio).round() as usize).max(1);
            let shifted = resample(channel, shifted_len);
            stretch(&shifted, len, grain)
        })
    }
}

/// Linear-interpolation resample of `input` to exactly `out_len` samples
fn resample(input: &[f32], out_len: usize) -> Vec<f32> {
    let Some(&last) = input.last() else {
        return vec![0.0; out_len];
    };
    let step = input.len() as f64 / out_len as f64;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let index = pos.floor() as usize;
            let frac = (pos - index as f64) as f32;
            let a = input.get(index).copied().unwrap_or(last);
            let b = input.get(index + 1).copied().unwrap_or(last);
            a + (b - a) * frac
        })
        .collect()
}

/// Overlap-add time stretch of `input` to `out_len` samples without changing pitch.
///
/// Grains of `grain` samples are read at a hop scaled by the length ratio and
/// written at half-grain spacing, then normalised by the summed window. The
/// grain never exceeds the input, so every grain reads a full window and every
/// output sample ends up with a nonzero weight.
fn stretch(input: &[f32], out_len: usize, grain: usize) -> Vec<f32> {
    if input.is_empty() {
        return vec![0.0; out_len];
    }
    let grain = grain.clamp(1, input.len());
    let hop = (grain / 2).max(1);
    // Shifted by half a sample so no window coefficient is zero
    let window: Vec<f32> = (0..grain)
        .map(|k| 0.5 - 0.5 * (2.0 * PI * (k as f32 + 0.5) / grain as f32).cos())
        .collect();

    let scale = input.len() as f64 / out_len.max(1) as f64;
    let mut output = vec![0.0f32; out_len];
    let mut weight = vec![0.0f32; out_len];

    let mut out_pos = 0;
    while out_pos < out_len {
        let in_pos = ((out_pos as f64 * scale).round() as usize)
            .min(input.len().saturating_sub(grain));
        for (k, w) in window.iter().enumerate() {
            let (Some(out), Some(&sample)) = (output.get_mut(out_pos + k), input.get(in_pos + k))
            else {
                break;
            };
            *out += sample * w;
            weight[out_pos + k] += w;
        }
        out_pos += hop;
    }

    for (sample, w) in output.iter_mut().zip(&weight) {
        if *w > 0.0 {
            *sample /= w;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> AudioBuffer {
        let samples = (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        AudioBuffer::mono(samples, sample_rate)
    }

    fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_zero_semitones_is_identity() {
        let input = sine(220.0, 8000, 800);
        assert_eq!(PitchShift::new(0).apply(&input), input);
    }

    #[test]
    fn test_semitones_are_clamped() {
        assert_eq!(PitchShift::new(30).semitones(), 12);
        assert_eq!(PitchShift::new(-30).semitones(), -12);
        assert!((PitchShift::new(12).ratio() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_is_preserved() {
        let input = sine(220.0, 8000, 8000);
        for semitones in [-12, -5, 3, 12] {
            let output = PitchShift::new(semitones).apply(&input);
            assert_eq!(output.frames(), input.frames(), "semitones {}", semitones);
        }
    }

    #[test]
    fn test_octave_up_doubles_frequency() {
        let input = sine(220.0, 44100, 44100);
        let output = PitchShift::new(12).apply(&input);

        let before = zero_crossings(&input.samples) as f32;
        let after = zero_crossings(&output.samples) as f32;
        let ratio = after / before;
        assert!(
            (1.7..2.3).contains(&ratio),
            "crossings went from {} to {}",
            before,
            after
        );
    }

    #[test]
    fn test_clip_shorter_than_a_grain_keeps_its_tail() {
        // 1000 frames is well under one 50 ms grain at 44.1 kHz
        let input = AudioBuffer::mono(vec![0.5; 1000], 44100);
        for semitones in [12, 7, -12] {
            let output = PitchShift::new(semitones).apply(&input);
            assert_eq!(output.frames(), 1000);
            assert!(
                output.samples.iter().all(|s| (s - 0.5).abs() < 1e-4),
                "semitones {}: constant input should stay constant",
                semitones
            );
        }

        let tone = sine(1000.0, 44100, 1000);
        let output = PitchShift::new(12).apply(&tone);
        let silent = output.samples[500..].iter().filter(|&&s| s == 0.0).count();
        assert!(silent < 10, "second half has {} silent samples", silent);
    }

    #[test]
    fn test_stereo_channels_stay_aligned() {
        let mono = sine(440.0, 8000, 4000);
        let samples = mono.samples.iter().flat_map(|&s| [s, -s]).collect();
        let stereo = AudioBuffer::new(samples, 2, 8000, 16);

        let output = PitchShift::new(-7).apply(&stereo);
        assert_eq!(output.frames(), 4000);
        let left = output.channel(0);
        let right = output.channel(1);
        assert!(left.iter().zip(&right).all(|(l, r)| (l + r).abs() < 1e-5));
    }
}
