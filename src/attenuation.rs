//! Distance based attenuation
//!
//! Gain falls off linearly with the distance between a sounding object and the
//! camera: `1 - distance / factor`, clamped into `[floor, 1]`. The spectral
//! modifier of the attachment then scales the result.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gain floor of the legacy per-frame handler
pub const LEGACY_FLOOR: f32 = 0.1;

/// Default distance at which gain reaches the floor
pub const DEFAULT_FACTOR: f32 = 20.0;

/// Map `distance` to a gain in `[floor, 1]`.
///
/// A non-positive `factor` means "no falloff range": anything away from the
/// camera sits at the floor. A floor that is not finite counts as 0.
pub fn attenuate(distance: f32, factor: f32, floor: f32) -> f32 {
    let floor = if floor.is_finite() {
        floor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if !(factor > 0.0) || !distance.is_finite() {
        return if distance <= 0.0 { 1.0 } else { floor };
    }
    (1.0 - distance / factor).clamp(floor, 1.0)
}

/// Scene-wide attenuation configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttenuationSettings {
    /// When disabled every object plays at full gain (times its spectral modifier)
    pub enabled: bool,
    pub factor: f32,
    pub floor: f32,
}

impl Default for AttenuationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: DEFAULT_FACTOR,
            floor: 0.0,
        }
    }
}

impl AttenuationSettings {
    pub fn new(factor: f32, floor: f32) -> Self {
        Self {
            enabled: true,
            factor,
            floor,
        }
    }

    /// Legacy settings: gain never drops below 10%
    pub fn legacy() -> Self {
        Self::new(DEFAULT_FACTOR, LEGACY_FLOOR)
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Final segment gain for an object `distance` away from the camera
    pub fn gain(&self, distance: f32, spectral_mod: f32) -> f32 {
        let base = if self.enabled {
            attenuate(distance, self.factor, self.floor)
        } else {
            1.0
        };
        base * spectral_mod
    }
}

/// Per-frame gains for an object moving relative to the camera.
///
/// Each item is the `(object, camera)` position pair for one animation frame.
/// The spectral modifier is not applied here.
pub fn volume_profile<I>(positions: I, settings: &AttenuationSettings) -> Vec<f32>
where
    I: IntoIterator<Item = (Vec3, Vec3)>,
{
    positions
        .into_iter()
        .map(|(object, camera)| settings.gain(object.distance(camera), 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_falloff() {
        assert_eq!(attenuate(0.0, 20.0, 0.0), 1.0);
        assert!((attenuate(10.0, 20.0, 0.0) - 0.5).abs() < 1e-6);
        assert_eq!(attenuate(20.0, 20.0, 0.0), 0.0);
    }

    #[test]
    fn test_clamps_at_floor() {
        assert_eq!(attenuate(40.0, 20.0, 0.0), 0.0);
        assert_eq!(attenuate(20.0, 20.0, LEGACY_FLOOR), LEGACY_FLOOR);
        assert_eq!(attenuate(400.0, 20.0, LEGACY_FLOOR), LEGACY_FLOOR);
        assert!(attenuate(1e9, 20.0, 0.0) >= 0.0);
    }

    #[test]
    fn test_degenerate_factor() {
        assert_eq!(attenuate(0.0, 0.0, 0.0), 1.0);
        assert_eq!(attenuate(3.0, 0.0, 0.2), 0.2);
        assert_eq!(attenuate(3.0, -5.0, 0.0), 0.0);
    }

    #[test]
    fn test_non_finite_floor_falls_back_to_zero() {
        let settings = AttenuationSettings::new(20.0, f32::NAN);
        assert!((settings.gain(5.0, 1.0) - 0.75).abs() < 1e-6);
        assert_eq!(settings.gain(40.0, 1.0), 0.0);
        assert_eq!(attenuate(40.0, 20.0, f32::INFINITY), 0.0);
        assert_eq!(attenuate(3.0, 0.0, f32::NAN), 0.0);
    }

    #[test]
    fn test_spectral_mod_always_applies() {
        let enabled = AttenuationSettings::default();
        assert!((enabled.gain(10.0, 2.0) - 1.0).abs() < 1e-6);

        let disabled = AttenuationSettings::disabled();
        assert_eq!(disabled.gain(1000.0, 0.5), 0.5);
    }

    #[test]
    fn test_volume_profile() {
        let camera = Vec3::ZERO;
        let path = (0..3).map(|i| (Vec3::new(i as f32 * 10.0, 0.0, 0.0), camera));
        let profile = volume_profile(path, &AttenuationSettings::legacy());
        assert_eq!(profile.len(), 3);
        assert_eq!(profile[0], 1.0);
        assert!((profile[1] - 0.5).abs() < 1e-6);
        assert_eq!(profile[2], LEGACY_FLOOR);
    }
}
