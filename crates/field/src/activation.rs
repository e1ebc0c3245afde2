//! Proximity tiers that drive line and marker alpha.
//!
//! Thresholds are squared distances in surface units and are compared
//! against [`distance_squared`](plexus_core::distance_squared) directly.

use serde::Serialize;

/// Below this squared distance a point is [`Tier::Near`].
pub const NEAR_THRESHOLD: f64 = 4_000.0;
/// Below this squared distance a point is [`Tier::Mid`].
pub const MID_THRESHOLD: f64 = 20_000.0;
/// Below this squared distance a point is [`Tier::Far`]; at or beyond it, [`Tier::Idle`].
pub const FAR_THRESHOLD: f64 = 40_000.0;

/// Activation band of a point, from its squared distance to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Under [`NEAR_THRESHOLD`].
    Near,
    Mid,
    Far,
    /// Out of reach: nothing is drawn.
    Idle,
}

impl Tier {
    /// Exactly one tier matches any distance; NaN falls through to `Idle`.
    pub fn from_distance_squared(d: f64) -> Self {
        if d < NEAR_THRESHOLD {
            Tier::Near
        } else if d < MID_THRESHOLD {
            Tier::Mid
        } else if d < FAR_THRESHOLD {
            Tier::Far
        } else {
            Tier::Idle
        }
    }

    /// Stroke alpha for the point's neighbor links.
    pub fn line_alpha(self) -> f64 {
        match self {
            Tier::Near => 0.3,
            Tier::Mid => 0.1,
            Tier::Far => 0.02,
            Tier::Idle => 0.0,
        }
    }

    /// Fill alpha for the point's marker.
    pub fn marker_alpha(self) -> f64 {
        match self {
            Tier::Near => 0.6,
            Tier::Mid => 0.3,
            Tier::Far => 0.1,
            Tier::Idle => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_is_near() {
        let tier = Tier::from_distance_squared(0.0);
        assert_eq!(tier, Tier::Near);
        assert_eq!(tier.line_alpha(), 0.3);
        assert_eq!(tier.marker_alpha(), 0.6);
    }

    #[test]
    fn boundaries_belong_to_the_outer_tier() {
        assert_eq!(Tier::from_distance_squared(3_999.999), Tier::Near);
        assert_eq!(Tier::from_distance_squared(4_000.0), Tier::Mid);
        assert_eq!(Tier::from_distance_squared(20_000.0), Tier::Far);
        assert_eq!(Tier::from_distance_squared(40_000.0), Tier::Idle);
    }

    #[test]
    fn tier_alphas_match_table() {
        let table = [
            (Tier::Mid, 0.1, 0.3),
            (Tier::Far, 0.02, 0.1),
            (Tier::Idle, 0.0, 0.0),
        ];
        for (tier, line, marker) in table {
            assert_eq!(tier.line_alpha(), line, "{tier:?}");
            assert_eq!(tier.marker_alpha(), marker, "{tier:?}");
        }
    }

    #[test]
    fn nan_and_infinity_are_idle() {
        assert_eq!(Tier::from_distance_squared(f64::NAN), Tier::Idle);
        assert_eq!(Tier::from_distance_squared(f64::INFINITY), Tier::Idle);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn alpha_never_increases_with_distance(a in 0.0f64..1e6, b in 0.0f64..1e6) {
                let (near, far) = if a <= b { (a, b) } else { (b, a) };
                let (tn, tf) = (Tier::from_distance_squared(near), Tier::from_distance_squared(far));
                prop_assert!(tn.line_alpha() >= tf.line_alpha());
                prop_assert!(tn.marker_alpha() >= tf.marker_alpha());
            }

            #[test]
            fn every_distance_has_alphas_in_unit_interval(d in 0.0f64..1e9) {
                let tier = Tier::from_distance_squared(d);
                prop_assert!((0.0..=1.0).contains(&tier.line_alpha()));
                prop_assert!((0.0..=1.0).contains(&tier.marker_alpha()));
            }
        }
    }
}
