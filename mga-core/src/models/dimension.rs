use std::{borrow::Borrow, fmt};

/// The identifier of one axis of the feasible region, e.g. an energy source
/// such as `"PV"` or `"Gas CHP"`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Dimension(String);

impl Dimension {
    /// Wrap a name as a dimension
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name of the dimension
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Dimension {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Dimension {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Allows lookups such as `point.get("PV")` without allocating a Dimension.
impl Borrow<str> for Dimension {
    fn borrow(&self) -> &str {
        &self.0
    }
}
