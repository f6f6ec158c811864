use crate::models::Trade;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

const PRICE_WEIGHT: f64 = 0.4;
const OVERLAP_WEIGHT: f64 = 0.3;
const CLOSE_PRICE_WEIGHT: f64 = 0.3;
/// Used in place of the close-price term when close prices are not compared.
const CLOSE_PRICE_BASELINE: f64 = 0.15;
const QUANTITY_BONUS: f64 = 0.1;

/// Confidence that two matched trades form a hedge, in `[0, 1]`.
///
/// Components are summed and only the total is clamped. The price term is
/// `0.4 * (1 - price_diff / price_threshold)` and is not clamped on its own:
/// a `price_diff` above `price_threshold` makes it negative.
///
/// `price_threshold` must be positive.
pub fn confidence_score(
    a: &Trade,
    b: &Trade,
    price_diff: f64,
    price_threshold: f64,
    include_close_price: bool,
) -> f64 {
    let mut score = 0.0;

    score += PRICE_WEIGHT * (1.0 - price_diff / price_threshold);

    // Overlap is a hard filter upstream, so any scored pair overlaps.
    score += OVERLAP_WEIGHT;

    if include_close_price {
        let close_diff = (a.close_price - b.close_price).abs();
        score += CLOSE_PRICE_WEIGHT * (1.0 - (close_diff / price_threshold).min(1.0));
    } else {
        score += CLOSE_PRICE_BASELINE;
    }

    if a.quantity == b.quantity {
        score += QUANTITY_BONUS;
    }

    score.max(0.0).min(1.0)
}
