//! In-memory audio buffer used by the effect chain
//!
//! Samples are interleaved `f32` normalised to [-1, 1]. `bits_per_sample`
//! records the integer width of the source so results can be quantized back
//! onto the same grid.

/// Convert decibels to a linear gain factor
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
            bits_per_sample,
        }
    }

    /// Mono 16-bit buffer, mostly handy in tests
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(samples, 1, sample_rate, 16)
    }

    /// Silence of `duration_ms` with the same layout as `self`
    pub fn silence_like(&self, duration_ms: f32) -> Self {
        let frames = self.ms_to_frames(duration_ms);
        Self {
            samples: vec![0.0; frames * self.channels as usize],
            ..self.layout_only()
        }
    }

    fn layout_only(&self) -> Self {
        Self {
            samples: Vec::new(),
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
        }
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 * 1000.0 / self.sample_rate as f64
    }

    pub fn ms_to_frames(&self, ms: f32) -> usize {
        (ms.max(0.0) as f64 * self.sample_rate as f64 / 1000.0).round() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy scaled by `db` decibels (negative attenuates), clipped to [-1, 1]
    pub fn with_gain_db(&self, db: f32) -> Self {
        let gain = db_to_gain(db);
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| (s * gain).clamp(-1.0, 1.0))
                .collect(),
            ..self.layout_only()
        }
    }

    /// Copy with `delay_ms` of silence in front
    pub fn delayed(&self, delay_ms: f32) -> Self {
        let mut out = self.silence_like(delay_ms);
        out.samples.extend_from_slice(&self.samples);
        out
    }

    /// Mix `other` onto a copy of `self`, both aligned at the start.
    ///
    /// The result keeps the length of `self`; whatever of `other` runs past the
    /// end is dropped. Sums are clipped to [-1, 1].
    pub fn overlay(&self, other: &AudioBuffer) -> Self {
        let mut samples = self.samples.clone();
        for (out, add) in samples.iter_mut().zip(&other.samples) {
            *out = (*out + add).clamp(-1.0, 1.0);
        }
        Self {
            samples,
            ..self.layout_only()
        }
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> Vec<f32> {
        let channels = self.channels as usize;
        self.samples
            .iter()
            .skip(index)
            .step_by(channels)
            .copied()
            .collect()
    }

    /// Run `f` over every channel separately and interleave the results.
    ///
    /// If channels come back with different lengths the shortest one wins.
    pub fn map_channels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        let channels = self.channels as usize;
        let processed: Vec<Vec<f32>> = (0..channels).map(|c| f(&self.channel(c))).collect();
        let frames = processed.iter().map(Vec::len).min().unwrap_or(0);

        let mut samples = Vec::with_capacity(frames * channels);
        for i in 0..frames {
            for channel in &processed {
                samples.push(channel[i]);
            }
        }
        Self {
            samples,
            ..self.layout_only()
        }
    }

    /// Round every sample onto the integer grid of `bits_per_sample`
    pub fn quantized(&self) -> Self {
        if self.bits_per_sample == 0 || self.bits_per_sample >= 32 {
            return self.clone();
        }
        let scale = ((1u32 << (self.bits_per_sample - 1)) - 1) as f32;
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| (s.clamp(-1.0, 1.0) * scale).round() / scale)
                .collect(),
            ..self.layout_only()
        }
    }
}
