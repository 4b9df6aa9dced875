//! score-estimator: territory and dead-stone estimation for Go positions.
//!
//! Ownership of every point is estimated from Monte Carlo playouts of the
//! position, steered and corrected by static readings of the board (eyes,
//! territory, liberties, seki).
//!
//! ## Modules
//!
//! - [`constants`] - Capacity limits, thresholds and defaults
//! - [`color`], [`point`], [`points`] - Basic board vocabulary
//! - [`grid`] - Integer maps over the board, flood fills, layer arithmetic
//! - [`goban`] - Board state, captures, ko, eyes and territory
//! - [`playout`] - Random game simulation
//! - [`heuristics`] - Static readings and tally interpretation
//! - [`config`] - Estimation parameters
//! - [`estimator`] - The estimation pipeline and the flat host interface
//! - [`diagram`] - Text diagrams
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use score_estimator::{Color, EstimateParams, Estimator, diagram};
//!
//! let goban = diagram::parse(
//!     ".X...
//!      XX...
//!      .....
//!      ...OO
//!      ...O.",
//! )
//! .unwrap();
//!
//! let mut estimator = Estimator::with_seed(EstimateParams::new(100, 0.3), 7).unwrap();
//! let estimate = estimator.estimate(&goban, Color::Black);
//! println!("{}", diagram::render(&estimate.ownership));
//! ```

pub mod color;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod error;
pub mod estimator;
pub mod goban;
pub mod grid;
pub mod heuristics;
pub mod playout;
pub mod point;
pub mod points;

pub use color::Color;
pub use config::EstimateParams;
pub use error::{EstimateError, MoveError};
pub use estimator::{Estimate, Estimator, RolloutStats, estimate, estimate_with_seed};
pub use goban::Goban;
pub use grid::Grid;
pub use point::Point;
pub use points::PointVec;
