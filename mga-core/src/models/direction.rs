use std::{fmt, str::FromStr};
use thiserror::Error;

/// The way a user wants to move a dimension at its step of the walk.
///
/// The variant order (increase, hold, decrease) is also the order in which
/// direction combinations are enumerated when precomputing paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Push the dimension up
    Increase,
    /// Keep the dimension where it is, within a tolerance band
    Hold,
    /// Push the dimension down
    Decrease,
}

impl Direction {
    /// Every direction, in enumeration order
    pub const ALL: [Direction; 3] = [Self::Increase, Self::Hold, Self::Decrease];

    /// The objective sense that seeks this direction's extreme.
    ///
    /// Hold has no extreme of its own; it maps to minimization so that callers
    /// always have a concrete sense to hand to an oracle.
    pub fn extreme_sense(self) -> Sense {
        match self {
            Self::Increase => Sense::Maximize,
            Self::Hold | Self::Decrease => Sense::Minimize,
        }
    }

    /// Whether the direction moves the dimension at all
    pub fn is_moving(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increase => "increase",
            Self::Hold => "hold",
            Self::Decrease => "decrease",
        })
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The arrow glyphs are what the exploration dashboards store; the
        // variation selector on the pause glyph is optional.
        match s.trim() {
            "increase" | "Increase" | "up" | "+" | "↑" => Ok(Self::Increase),
            "hold" | "Hold" | "pause" | "=" | "⏸" | "⏸\u{fe0f}" => Ok(Self::Hold),
            "decrease" | "Decrease" | "down" | "-" | "↓" => Ok(Self::Decrease),
            other => Err(DirectionParseError(other.to_owned())),
        }
    }
}

/// Raised when a string does not name a direction
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction: {0:?} (expected increase, hold or decrease)")]
pub struct DirectionParseError(pub String);

/// The sense of an LP objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Sense {
    /// Find the smallest achievable value
    Minimize,
    /// Find the largest achievable value
    Maximize,
}

impl Sense {
    /// The multiplier that turns this sense into a minimization
    pub fn sign(self) -> f64 {
        match self {
            Self::Minimize => 1.0,
            Self::Maximize => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_glyphs() {
        assert_eq!("increase".parse(), Ok(Direction::Increase));
        assert_eq!("↓".parse(), Ok(Direction::Decrease));
        assert_eq!("⏸\u{fe0f}".parse(), Ok(Direction::Hold));
        assert_eq!(" hold ".parse(), Ok(Direction::Hold));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse(), Ok(direction));
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Direction::ALL).unwrap();
        assert_eq!(json, r#"["increase","hold","decrease"]"#);
    }
}
