use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ITERATIONS, DEFAULT_TOLERANCE, PLAYOUT_SAFETY_CAP};
use crate::error::{EstimateError, Result};

/// Knobs of one estimation run.
///
/// Every confidence test compares a tally against `iterations * tolerance`,
/// so raising either one raises the bar a point has to clear before it is
/// given to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateParams {
    /// Playouts per rollout pass.
    pub iterations: usize,
    /// Fraction of `iterations` a tally must exceed to be trusted.
    pub tolerance: f64,
    /// Loop events a single playout may spend before it is cut short.
    pub safety_cap: usize,
}

impl Default for EstimateParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            safety_cap: PLAYOUT_SAFETY_CAP,
        }
    }
}

impl EstimateParams {
    pub fn new(iterations: usize, tolerance: f64) -> Self {
        Self {
            iterations,
            tolerance,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(EstimateError::InvalidInput("iterations must be positive".into()));
        }
        if !self.tolerance.is_finite() || !(0.0..=1.0).contains(&self.tolerance) {
            return Err(EstimateError::InvalidInput(format!(
                "tolerance {} is outside [0, 1]",
                self.tolerance
            )));
        }
        if self.safety_cap == 0 {
            return Err(EstimateError::InvalidInput("safety cap must be positive".into()));
        }
        Ok(())
    }

    /// `iterations * tolerance`: the tally a point must exceed to be owned.
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.iterations as f64 * self.tolerance
    }

    /// Half the confidence bar, truncated; the weight of one bias layer.
    #[inline]
    pub fn half_weight(&self) -> i32 {
        (self.confidence() / 2.0) as i32
    }
}
