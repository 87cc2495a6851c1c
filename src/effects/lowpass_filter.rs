//! Spectral low-pass filter
//!
//! Transforms each channel as one block, zeroes every bin above the cutoff
//! and transforms back. The whole clip is needed up front, so this is only
//! usable offline.

use crate::buffer::AudioBuffer;
use crate::effects::Effect;
use rustfft::{num_complex::Complex, FftPlanner};

pub const DEFAULT_CUTOFF_HZ: f32 = 3000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SpectralLowpass {
    cutoff_hz: f32,
}

impl SpectralLowpass {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz: cutoff_hz.max(0.0),
        }
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }
}

impl Default for SpectralLowpass {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_HZ)
    }
}

impl Effect for SpectralLowpass {
    fn name(&self) -> &'static str {
        "lowpass"
    }

    fn apply(&self, input: &AudioBuffer) -> AudioBuffer {
        if input.is_empty() {
            return input.clone();
        }

        let mut planner = FftPlanner::<f32>::new();
        let sample_rate = input.sample_rate as f32;
        let cutoff = self.cutoff_hz;

        input
            .map_channels(|channel| {
                let n = channel.len();
                let forward = planner.plan_fft_forward(n);
                let inverse = planner.plan_fft_inverse(n);

                let mut spectrum: Vec<Complex<f32>> =
                    channel.iter().map(|&s| Complex::new(s, 0.0)).collect();
                forward.process(&mut spectrum);

                // Bins k and n-k share the same absolute frequency
                for (k, bin) in spectrum.iter_mut().enumerate() {
                    let freq = k.min(n - k) as f32 * sample_rate / n as f32;
                    if freq > cutoff {
                        *bin = Complex::new(0.0, 0.0);
                    }
                }

                inverse.process(&mut spectrum);
                let norm = 1.0 / n as f32;
                spectrum.iter().map(|c| c.re * norm).collect()
            })
            .quantized()
    }
}
