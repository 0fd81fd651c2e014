/// A pair of optional limits attached to one dimension.
///
/// A missing side means the dimension is unconstrained in that direction.
/// Non-finite inputs (NaN in particular) are always treated as missing rather
/// than as zero, so callers can hand raw floats to the constructors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    lower: Option<f64>,
    upper: Option<f64>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|x| x.is_finite())
}

impl Bound {
    /// A bound constraining neither side
    pub const UNBOUNDED: Self = Self {
        lower: None,
        upper: None,
    };

    /// Create a bound, dropping any non-finite side
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            lower: finite(lower),
            upper: finite(upper),
        }
    }

    /// `value ≤ x`
    pub fn at_least(value: f64) -> Self {
        Self::new(Some(value), None)
    }

    /// `x ≤ value`
    pub fn at_most(value: f64) -> Self {
        Self::new(None, Some(value))
    }

    /// `lower ≤ x ≤ upper`
    pub fn between(lower: f64, upper: f64) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    /// The lower limit, if any
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// The upper limit, if any
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// The lower limit, falling back to negative infinity
    pub fn or_neg_inf(&self) -> f64 {
        self.lower.unwrap_or(f64::NEG_INFINITY)
    }

    /// The upper limit, falling back to positive infinity
    pub fn or_pos_inf(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }

    /// True if neither side is constrained
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// True if both sides are present and equal
    pub fn is_equality(&self) -> bool {
        matches!((self.lower, self.upper), (Some(a), Some(b)) if a == b)
    }

    /// Check `value` against both sides, allowing a slack of `tolerance`
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.or_neg_inf() - tolerance && value <= self.or_pos_inf() + tolerance
    }
}
