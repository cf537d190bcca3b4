//! Easing curves mapping linear progress to perceived progress.

use serde::{Deserialize, Serialize};

/// Cubic ease-in-out: `t² (3 − 2t)`, with zero slope at both ends.
///
/// The input is clamped to `[0, 1]`.
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Quintic ease-in-out: `t³ (t (6t − 15) + 10)`, with zero slope and
/// curvature at both ends.
#[must_use]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Easing applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing, progress follows wall-clock time.
    Linear,
    /// [`smoothstep`].
    #[default]
    Smoothstep,
    /// [`smootherstep`].
    Smootherstep,
}

impl Easing {
    /// Maps raw progress to eased progress.
    ///
    /// Every curve fixes 0 and 1 exactly.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::Smoothstep => smoothstep(t),
            Easing::Smootherstep => smootherstep(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::Smoothstep, Easing::Smootherstep] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_smoothstep_midpoint() {
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert!((smoothstep(0.25) - 0.15625).abs() < 1e-6);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_easing_serde_names() {
        let json = serde_json::to_string(&Easing::Smootherstep).unwrap();
        assert_eq!(json, "\"smootherstep\"");
        let parsed: Easing = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, Easing::Linear);
    }

    proptest! {
        #[test]
        fn prop_smoothstep_stays_in_unit_interval(t in 0.0f32..=1.0) {
            let s = smoothstep(t);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_smoothstep_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // one ulp of slack for rounding near the flat ends
            prop_assert!(smoothstep(lo) <= smoothstep(hi) + 1e-6);
        }

        #[test]
        fn prop_smootherstep_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(smootherstep(lo) <= smootherstep(hi) + 1e-6);
        }
    }
}
