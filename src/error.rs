use crate::constants::{MAX_HEIGHT, MAX_WIDTH};

/// Errors surfaced to callers of the estimator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// Board is empty or larger than the supported maximum.
    #[error("board size {width}x{height} is outside 1x1..={}x{}", MAX_WIDTH, MAX_HEIGHT)]
    Capacity { width: usize, height: usize },

    /// Coordinate outside the board.
    #[error("point ({x}, {y}) is off a {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Anything else wrong with the caller's input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for estimator operations.
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Why a stone could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Point is not empty
    Occupied,
    /// Move retakes a single-stone ko immediately
    Ko,
    /// Move captures nothing and leaves its own group without liberties
    Suicide,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::Occupied => write!(f, "illegal move: point not empty"),
            MoveError::Ko => write!(f, "illegal move: retakes ko"),
            MoveError::Suicide => write!(f, "illegal move: suicide"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_limit() {
        let err = EstimateError::Capacity {
            width: 30,
            height: 9,
        };
        assert_eq!(err.to_string(), "board size 30x9 is outside 1x1..=25x25");
    }

    #[test]
    fn move_error_display() {
        assert_eq!(MoveError::Ko.to_string(), "illegal move: retakes ko");
        assert_eq!(MoveError::Suicide.to_string(), "illegal move: suicide");
    }
}
