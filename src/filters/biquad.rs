use std::f32::consts::PI;

/// Butterworth Q for a flat passband
pub const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiquadKind {
    Lowpass,
    Highpass,
}

/// Biquad filter - RBJ Audio EQ Cookbook implementation
///
/// 2nd order lowpass/highpass used to split a signal into bands.
/// Direct Form I processing.
pub struct Biquad {
    sample_rate: f32,

    // Normalized coefficients
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // State variables (delay line)
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Create a filter of `kind` at `freq` Hz
    ///
    /// # Arguments
    /// * `kind` - Lowpass or highpass response
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `freq` - Cutoff frequency in Hz (clamped to 10 Hz..0.95 * Nyquist)
    /// * `q` - Q factor (clamped to 0.1-100)
    pub fn new(kind: BiquadKind, sample_rate: f32, freq: f32, q: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.calculate_coefficients(kind, freq, q);
        filter
    }

    pub fn lowpass(sample_rate: f32, freq: f32) -> Self {
        Self::new(BiquadKind::Lowpass, sample_rate, freq, BUTTERWORTH_Q)
    }

    pub fn highpass(sample_rate: f32, freq: f32) -> Self {
        Self::new(BiquadKind::Highpass, sample_rate, freq, BUTTERWORTH_Q)
    }

    /// Reset filter state (clear delay line)
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    fn calculate_coefficients(&mut self, kind: BiquadKind, freq: f32, q: f32) {
        let nyquist = self.sample_rate * 0.5;

        let freq = freq.clamp(10.0, (nyquist * 0.95).max(10.0));
        let q = q.clamp(0.1, 100.0);

        let omega0 = 2.0 * PI * freq / self.sample_rate;
        let sin_omega = omega0.sin();
        let cos_omega = omega0.cos();

        let alpha = sin_omega / (2.0 * q);

        let (b0, b1, b2) = match kind {
            BiquadKind::Lowpass => {
                let b1 = 1.0 - cos_omega;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            BiquadKind::Highpass => {
                let b1 = -(1.0 + cos_omega);
                (-b1 / 2.0, b1, -b1 / 2.0)
            }
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    /// Process a single sample through the filter
    ///
    /// Direct Form I: y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        if output.abs() < 1e-15 {
            return 0.0;
        }

        output
    }

    /// Filter a whole block from a cleared state
    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        self.reset();
        input.iter().map(|&x| self.process(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_biquad_reset() {
        let mut filter = Biquad::highpass(44100.0, 1000.0);
        for _ in 0..100 {
            filter.process(1.0);
        }
        filter.reset();
        assert_eq!(filter.x1, 0.0);
        assert_eq!(filter.x2, 0.0);
        assert_eq!(filter.y1, 0.0);
        assert_eq!(filter.y2, 0.0);
    }

    #[test]
    fn test_highpass_attenuates_dc() {
        let mut filter = Biquad::highpass(44100.0, 1000.0);

        let mut output = 0.0;
        for _ in 0..2000 {
            output = filter.process(1.0);
        }
        assert!(output.abs() < 0.1);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = Biquad::lowpass(44100.0, 200.0);
        let output = filter.process_block(&vec![1.0; 8000]);
        assert!((output[7999] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_lowpass_attenuates_highs() {
        let mut filter = Biquad::lowpass(44100.0, 200.0);
        let output = filter.process_block(&sine(5000.0, 44100.0, 4410));
        // Skip the transient
        assert!(peak(&output[1000..]) < 0.05);
    }
}
