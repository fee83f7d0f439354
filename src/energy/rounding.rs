//! Decimal rounding used at the fixed rounding points of the energy model.

/// Rounds `value` to `decimals` decimal places.
///
/// Works on the exact binary value and breaks exact ties towards the even
/// digit, so `2.675` (stored as `2.67499…`) rounds down to `2.67` and the
/// exact tie `0.125` rounds to `0.12`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting is exact and ties-to-even; parsing gives back the
    // nearest double to the rounded decimal.
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
