// animation/easing.rs
//
// Pure easing curves for spin deceleration. Just math.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Easing function type.
///
/// Spins start fast and slow down, so only ease-out curves (plus `Linear`
/// for debugging) are offered. Every curve maps 0 to 0 and 1 to exactly 1 and
/// is monotonic in between, so a spin never overshoots its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    /// Slow end.
    QuadOut,
    /// Stronger slow end. The wheel's standard deceleration.
    #[default]
    CubicOut,
    /// Very strong slow end.
    QuartOut,
    /// Sine wave easing (gentle).
    SineOut,
    /// Exponential easing (dramatic crawl at the end).
    ExpoOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t`.
    /// `t` is clamped to [0, 1] first.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::SineOut => {
                if t == 1.0 {
                    1.0
                } else {
                    (t * FRAC_PI_2).sin()
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::QuartOut,
        Easing::SineOut,
        Easing::ExpoOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn cubic_out_matches_formula() {
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let expected = 1.0 - (1.0 - t) * (1.0 - t) * (1.0 - t);
            assert!((Easing::CubicOut.apply(t) - expected).abs() < 1e-12);
        }
        // Fast start: more than half the distance covered by the midpoint.
        assert!(Easing::CubicOut.apply(0.5) > 0.8);
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-3.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(7.0), 1.0);
        assert_eq!(Easing::CubicOut.apply(f64::NAN), 0.0);
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }

    #[test]
    fn deserializes_snake_case() {
        let e: Easing = serde_json::from_str("\"quart_out\"").unwrap();
        assert_eq!(e, Easing::QuartOut);
    }
}
