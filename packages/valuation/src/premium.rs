//! Distance-to-premium model.
//!
//! A fixed calibration table mapping distance from the nearest park
//! edge to the expected property value premium, with linear
//! interpolation inside the table and a fixed linear decay beyond it.

/// Calibrated (distance in miles, premium percent) pairs, ascending by
/// distance. Premium must stay non-increasing for the interpolation to
/// behave monotonically.
pub const DISTANCE_PREMIUM_TABLE: [(f64, f64); 6] = [
    (0.2, 22.3),
    (0.3, 18.3),
    (0.4, 14.6),
    (0.5, 11.2),
    (0.6, 7.9),
    (0.8, 2.1),
];

/// The premium at the innermost tier of the table.
pub const MAX_TIER_PREMIUM: f64 = DISTANCE_PREMIUM_TABLE[0].1;

/// Decay in percentage points per mile past the last tabulated
/// distance. Chosen so the premium reaches zero roughly one mile beyond
/// the table, an explicit extrapolation policy rather than a fit.
pub const DECAY_PER_MILE: f64 = 10.0;

/// Estimates the premium percentage for a distance in miles.
///
/// At or below the first tabulated distance the premium is capped flat
/// at the first entry; past the last entry it decays linearly to a
/// floor of zero; in between it interpolates linearly between the
/// bracketing entries.
///
/// The input must be finite and non-negative; callers clamp before
/// calling. Violations are caught in debug builds and undefined in
/// release builds.
#[must_use]
pub fn estimate_premium(distance_miles: f64) -> f64 {
    debug_assert!(
        distance_miles.is_finite() && distance_miles >= 0.0,
        "distance must be finite and non-negative, got {distance_miles}"
    );

    let (first_distance, first_premium) = DISTANCE_PREMIUM_TABLE[0];
    if distance_miles <= first_distance {
        return first_premium;
    }

    let (last_distance, last_premium) = DISTANCE_PREMIUM_TABLE[DISTANCE_PREMIUM_TABLE.len() - 1];
    if distance_miles >= last_distance {
        return (last_premium - (distance_miles - last_distance) * DECAY_PER_MILE).max(0.0);
    }

    for window in DISTANCE_PREMIUM_TABLE.windows(2) {
        let (current_distance, current_premium) = window[0];
        let (next_distance, next_premium) = window[1];
        if distance_miles < next_distance {
            let ratio = (distance_miles - current_distance) / (next_distance - current_distance);
            return ratio.mul_add(-(current_premium - next_premium), current_premium);
        }
    }

    last_premium
}
