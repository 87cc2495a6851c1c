pub mod biquad;

pub use self::biquad::{Biquad, BiquadKind, BUTTERWORTH_Q};
