//! Rotation snapping
//!
//! Pulls a free rotation angle onto one of a configured set of target angles
//! when it comes within a threshold, and provides the angle arithmetic the
//! rotation gesture relies on.

use serde::{Deserialize, Serialize};

/// Angles a rotation snaps to by default, in degrees
pub const DEFAULT_SNAP_ANGLES: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Default snap threshold in degrees
pub const DEFAULT_SNAP_THRESHOLD: f64 = 4.0;

/// Configuration for rotation snapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSnapConfig {
    /// Enable/disable snapping
    pub enabled: bool,

    /// Target angles in degrees
    pub angles: Vec<f64>,

    /// Maximum angular distance, in degrees, at which a target captures the angle
    pub threshold: f64,
}

impl Default for RotationSnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            angles: DEFAULT_SNAP_ANGLES.to_vec(),
            threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl RotationSnapConfig {
    /// Snapping switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Replace the target angles
    pub fn with_angles(mut self, angles: Vec<f64>) -> Self {
        self.angles = angles;
        self
    }

    /// Replace the threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Outcome of snapping one angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSnap {
    /// Angle to use, normalized to `[0, 360)`
    pub angle: f64,

    /// Target that captured the angle, if any
    pub snapped_angle: Option<f64>,
}

impl RotationSnap {
    pub fn is_snapped(&self) -> bool {
        self.snapped_angle.is_some()
    }
}

/// Normalize an angle to `[0, 360)`. Non-finite input becomes 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let diff = normalize_angle(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Snap `angle` to the nearest configured target within the threshold
pub fn snap_rotation(angle: f64, config: &RotationSnapConfig) -> RotationSnap {
    let angle = normalize_angle(angle);
    if !config.enabled {
        return RotationSnap { angle, snapped_angle: None };
    }

    let best = config
        .angles
        .iter()
        .copied()
        .filter(|target| target.is_finite())
        .map(|target| (target, shortest_arc(angle, target).abs()))
        .filter(|(_, distance)| *distance <= config.threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match best {
        Some((target, _)) => {
            let snapped = normalize_angle(target);
            RotationSnap {
                angle: snapped,
                snapped_angle: Some(snapped),
            }
        }
        None => RotationSnap { angle, snapped_angle: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(720.0), 0.0);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
        assert!(normalize_angle(-1e-20) < 360.0);
    }

    #[test]
    fn test_shortest_arc_wraps() {
        assert_eq!(shortest_arc(350.0, 10.0), 20.0);
        assert_eq!(shortest_arc(10.0, 350.0), -20.0);
        assert_eq!(shortest_arc(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_snap_within_threshold() {
        let snap = snap_rotation(92.0, &RotationSnapConfig::default());
        assert_eq!(snap.angle, 90.0);
        assert!(snap.is_snapped());
    }

    #[test]
    fn test_snap_across_zero() {
        let snap = snap_rotation(358.5, &RotationSnapConfig::default());
        assert_eq!(snap.angle, 0.0);
        assert_eq!(snap.snapped_angle, Some(0.0));
    }

    #[test]
    fn test_no_snap_outside_threshold() {
        let snap = snap_rotation(95.0, &RotationSnapConfig::default());
        assert_eq!(snap.angle, 95.0);
        assert!(!snap.is_snapped());
    }

    #[test]
    fn test_disabled_snapping() {
        let snap = snap_rotation(91.0, &RotationSnapConfig::disabled());
        assert_eq!(snap.angle, 91.0);
        assert!(!snap.is_snapped());
    }

    #[test]
    fn test_custom_angles() {
        let config = RotationSnapConfig::default()
            .with_angles(vec![45.0, 135.0])
            .with_threshold(10.0);
        assert_eq!(snap_rotation(52.0, &config).angle, 45.0);
        assert_eq!(snap_rotation(88.0, &config).snapped_angle, None);
    }
}
