use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_LETTERS;

/// A board coordinate. `x` is the column, `y` the row counted from the top.
///
/// Points order row-major: by row first, then by column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Go notation for this point on a board `height` rows tall, e.g. "D4".
    ///
    /// Rows are numbered from the bottom and column letters skip 'I'.
    pub fn coord(&self, height: usize) -> String {
        let col = BOARD_LETTERS
            .get(self.x)
            .map(|&b| b as char)
            .unwrap_or('?');
        format!("{col}{}", height.saturating_sub(self.y))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
