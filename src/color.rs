use std::fmt;
use std::ops::Neg;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Cell value of an empty point.
pub const EMPTY: i32 = 0;

/// Stone colour. The discriminants are the values stored in grids, so a
/// tally of colours is a plain integer sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum Color {
    Black = 1,
    White = -1,
}

impl Color {
    /// Colour for a cell value, `None` for empty. Only the sign matters.
    pub fn from_value(v: i32) -> Option<Self> {
        match v.signum() {
            1 => Some(Color::Black),
            -1 => Some(Color::White),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn opp(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl Neg for Color {
    type Output = Self;

    fn neg(self) -> Self {
        self.opp()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}
