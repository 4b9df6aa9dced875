//! Capacity limits, estimation thresholds and default parameters.
//!
//! The thresholds are empirical: they reproduce the behaviour of the
//! auto-scorer this crate is tuned against and have no derivation beyond
//! that. Changing any of them changes which groups are judged alive.

// =============================================================================
// Board Geometry
// =============================================================================

/// Widest supported board.
pub const MAX_WIDTH: usize = 25;

/// Tallest supported board.
pub const MAX_HEIGHT: usize = 25;

/// Upper bound on the number of points any point sequence can hold.
pub const MAX_AREA: usize = MAX_WIDTH * MAX_HEIGHT;

/// Column letters in Go notation ('I' is skipped).
pub const BOARD_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Playout Parameters
// =============================================================================

/// Number of loop events (moves and rejected candidates) a single playout
/// may consume before it is cut short.
pub const PLAYOUT_SAFETY_CAP: usize = 1000;

// =============================================================================
// Heuristic Thresholds
// =============================================================================

/// Distinct territories a stone/territory union needs to count as alive.
pub const STRONG_LIFE_MIN_EYES: usize = 2;

/// Combined territory size that makes a union alive regardless of eye count.
pub const STRONG_LIFE_MIN_TERRITORY: usize = 5;

/// Liberty-map reading beyond which a neighbouring point is considered
/// firmly held by one colour.
pub const LIKELY_DEAD_LIBERTY_THRESHOLD: i32 = 6;

/// Divisor applied to the summed liberty readings when turning them into
/// a bias layer.
pub const LIBERTY_BIAS_DIVISOR: f64 = 100.0;

// =============================================================================
// Defaults
// =============================================================================

/// Playouts per rollout pass.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Fraction of `iterations` a tally has to exceed to be trusted.
pub const DEFAULT_TOLERANCE: f64 = 0.3;
