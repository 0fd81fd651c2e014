use mga_core::models::Point;

/// The point a fraction of the way from `anchor` to `extreme`.
///
/// Every dimension moves together, so the preview is a convex combination
/// of two feasible points and therefore feasible itself. Dimensions missing
/// from `extreme` stay at the anchor.
pub fn interpolate(anchor: &Point, extreme: &Point, fraction: f64) -> Point {
    anchor
        .iter()
        .map(|(dimension, a)| {
            let e = extreme.get(dimension).copied().unwrap_or(*a);
            (dimension.clone(), (1.0 - fraction) * a + fraction * e)
        })
        .collect()
}

/// How far `value` lies along the way from `anchor` to `extreme`.
///
/// A zero-length segment yields zero.
pub fn fraction(value: f64, anchor: f64, extreme: f64) -> f64 {
    let span = extreme - anchor;
    if span == 0.0 {
        0.0
    } else {
        (value - anchor) / span
    }
}
