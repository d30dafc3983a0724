/// Default absolute tolerance for weight equality.
pub const WEIGHT_MATCH_THRESHOLD: f64 = 0.01;

/// Whether `a` lies strictly within `tolerance` of `b`.
///
/// A difference that sits within a few ULPs of the tolerance is treated as
/// equal to it, so `10.01 - 10.0` (`0.00999999999999979` in binary) does not
/// slip under a tolerance of 0.01. Anything further away compares raw.
fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    let noise = 4.0 * f64::EPSILON * a.abs().max(b.abs()).max(1.0);
    if (diff - tolerance).abs() <= noise {
        return false;
    }
    diff < tolerance
}

/// True when every weight lies strictly within `tolerance` of the first one.
///
/// Zero or one weight always matches. The first weight is the pivot: this is
/// not a max-minus-min span check, so `[10.0, 10.006, 10.012]` with a
/// tolerance of 0.01 fails on the third value even though each consecutive
/// gap is below the tolerance.
pub fn weights_match(weights: &[f64], tolerance: f64) -> bool {
    match weights.split_first() {
        None => true,
        Some((pivot, rest)) => rest.iter().all(|w| within_tolerance(*w, *pivot, tolerance)),
    }
}

/// True when a source holds two or more records for a key whose weights are
/// not all exactly equal. Repeated identical weights are harmless.
pub fn has_conflicting_weights(raw: &[f64]) -> bool {
    match raw.split_first() {
        Some((first, rest)) if !rest.is_empty() => rest.iter().any(|w| w != first),
        _ => false,
    }
}
