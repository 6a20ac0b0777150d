//! Crash Curve Math
//!
//! The multiplier clock and the crash-point distribution share one
//! house edge and one cap, so the displayed multiplier and the hidden
//! crash point live on the same scale.

use crate::core::rng::RandomSource;

/// Fraction of expected value retained by the house.
pub const HOUSE_EDGE: f64 = 0.03;

/// Exponential growth rate of the live multiplier, per elapsed millisecond.
pub const GROWTH_RATE: f64 = 0.0001;

/// Upper bound shared by the live multiplier and the crash point.
pub const MAX_MULTIPLIER: f64 = 50.0;

/// Lowest legal crash point and auto-stop threshold.
pub const MIN_MULTIPLIER: f64 = 1.01;

/// Minimum stake per round, in credits.
pub const MIN_BET: u64 = 10;

/// Display multiplier after `elapsed_ms` milliseconds of play.
///
/// `m = e^(GROWTH_RATE * t) * (1 - HOUSE_EDGE)`, clamped to
/// `[1.0, MAX_MULTIPLIER]`. Pure function of elapsed wall time only,
/// so tick cadence cannot change outcomes.
pub fn multiplier_at(elapsed_ms: u64) -> f64 {
    let m = (GROWTH_RATE * elapsed_ms as f64).exp() * (1.0 - HOUSE_EDGE);
    m.clamp(1.0, MAX_MULTIPLIER)
}

/// Draw the hidden crash point for a new round.
///
/// Must be called exactly once per round, before the first tick.
pub fn crash_point(rng: &mut dyn RandomSource) -> f64 {
    crash_point_from_fraction(rng.next_fraction())
}

/// Crash point for a known random fraction in `[0, 1)`.
///
/// Inverse-transform of an exponential-like distribution: long right
/// tail of rare huge multipliers, expectation shifted in the house's
/// favor. Clamped to `[MIN_MULTIPLIER, MAX_MULTIPLIER]` and rounded
/// to 2 decimal places.
pub fn crash_point_from_fraction(r: f64) -> f64 {
    let raw = 1.0 / (1.0 - r) * (1.0 - HOUSE_EDGE);
    round2(raw.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER))
}

/// Inverse of [`crash_point_from_fraction`]: the fraction that yields
/// `target` as crash point. Used by scripted sessions and tests.
pub fn fraction_for_crash_point(target: f64) -> f64 {
    1.0 - (1.0 - HOUSE_EDGE) / target
}

/// Payout for a winning round, rounded to whole credits.
///
/// Multipliers keep 2 decimals for display; money is always integral.
pub fn win_amount(bet: u64, multiplier: f64) -> u64 {
    (bet as f64 * multiplier).round() as u64
}

/// Round a multiplier to display precision (2 decimal places).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn multiplier_starts_at_floor() {
        // e^0 * 0.97 = 0.97, clamped up to 1.0
        assert_eq!(multiplier_at(0), 1.0);
    }

    #[test]
    fn multiplier_caps_at_max() {
        assert_eq!(multiplier_at(10_000_000), MAX_MULTIPLIER);
    }

    #[test]
    fn multiplier_grows_through_known_points() {
        // m >= 1.01 first at ~404ms
        assert!(multiplier_at(400) < MIN_MULTIPLIER);
        assert!(multiplier_at(410) >= MIN_MULTIPLIER);
        // m crosses 2.0 at ln(2/0.97)/0.0001 ~= 7235ms
        assert!(multiplier_at(7200) < 2.0);
        assert!(multiplier_at(7300) > 2.0);
    }

    #[test]
    fn crash_point_known_fractions() {
        // r = 0 -> raw 0.97, clamped to the floor
        assert_eq!(crash_point_from_fraction(0.0), MIN_MULTIPLIER);
        // r = 0.5 -> 2 * 0.97
        assert_eq!(crash_point_from_fraction(0.5), 1.94);
        // r close to 1 -> clamped to the cap
        assert_eq!(crash_point_from_fraction(0.999_999), MAX_MULTIPLIER);
    }

    #[test]
    fn fraction_round_trips_target() {
        for target in [1.5, 2.0, 3.0, 10.0, 49.99] {
            let r = fraction_for_crash_point(target);
            assert_eq!(crash_point_from_fraction(r), target);
        }
    }

    #[test]
    fn win_amount_rounds_to_nearest_credit() {
        assert_eq!(win_amount(100, 1.05), 105);
        assert_eq!(win_amount(200, 3.0), 600);
        assert_eq!(win_amount(3, 1.5), 5); // 4.5 rounds away from zero
        assert_eq!(win_amount(100, 1.004), 100);
    }

    proptest! {
        #[test]
        fn multiplier_always_in_bounds(elapsed in 0u64..100_000_000) {
            let m = multiplier_at(elapsed);
            prop_assert!((1.0..=MAX_MULTIPLIER).contains(&m));
        }

        #[test]
        fn multiplier_monotone_until_cap(elapsed in 0u64..10_000_000, delta in 0u64..100_000) {
            let a = multiplier_at(elapsed);
            let b = multiplier_at(elapsed + delta);
            prop_assert!(b >= a - 1e-12);
        }

        #[test]
        fn crash_point_in_bounds_and_two_decimal(r in 0.0f64..1.0) {
            let cp = crash_point_from_fraction(r);
            prop_assert!((MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&cp));
            let hundredths = cp * 100.0;
            prop_assert!((hundredths - hundredths.round()).abs() < 1e-9);
        }
    }
}
