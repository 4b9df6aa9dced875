//! The estimation pipeline.
//!
//! An [`Estimator`] owns its parameters and random source. Each call to
//! [`Estimator::estimate`] works on a private copy of the position:
//!
//! 1. false eyes are filled;
//! 2. an exploratory rollout pass is scanned for seki;
//! 3. the static layers (territory, liberties, strong life, biases) are read;
//! 4. a second rollout pass, seeded with the summed bias and kept out of
//!    settled areas, produces the final tally;
//! 5. the tally is thresholded, dead stones are flagged and leftover
//!    neutral regions with a single bordering colour are handed to it.

use serde::{Deserialize, Serialize};

use crate::color::{Color, EMPTY};
use crate::config::EstimateParams;
use crate::error::{EstimateError, Result};
use crate::goban::Goban;
use crate::grid::Grid;
use crate::heuristics;
use crate::playout::{PlayoutOutcome, play_out_position};
use crate::point::Point;

/// Counters over every playout of one estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutStats {
    pub playouts: usize,
    pub moves: usize,
    /// Playouts cut short by the safety cap.
    pub safety_cap_hits: usize,
}

impl RolloutStats {
    fn record(&mut self, outcome: PlayoutOutcome) {
        self.playouts += 1;
        self.moves += outcome.moves;
        if outcome.hit_safety_cap {
            self.safety_cap_hits += 1;
        }
    }
}

/// Result of one estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    /// `+1` black, `-1` white, `0` neutral, for every point, stones included.
    pub ownership: Grid,
    /// Stones the rollouts consider captured or unsettled.
    pub dead_stones: Vec<Point>,
    pub stats: RolloutStats,
}

pub struct Estimator {
    params: EstimateParams,
    rng: fastrand::Rng,
}

impl Estimator {
    /// An estimator seeded from entropy.
    pub fn new(params: EstimateParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: fastrand::Rng::new(),
        })
    }

    /// An estimator whose results are reproducible for a given seed.
    pub fn with_seed(params: EstimateParams, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    pub fn params(&self) -> &EstimateParams {
        &self.params
    }

    /// Estimates ownership of `goban` with `player` to move. The position
    /// itself is left untouched.
    pub fn estimate(&mut self, goban: &Goban, player: Color) -> Estimate {
        let (width, height) = (goban.width(), goban.height());
        let mut stats = RolloutStats::default();

        if goban.stone_count() == 0 {
            tracing::debug!("no stones on the {width}x{height} board, nothing to estimate");
            return Estimate {
                ownership: Grid::new(width, height),
                dead_stones: Vec::new(),
                stats,
            };
        }

        let mut work = goban.clone();

        let false_eyes = work.false_eyes();
        let filled = work.fill_false_eyes(&false_eyes);
        tracing::debug!(
            "filled {filled} of {} false eyes: {}",
            false_eyes.len(),
            heuristics::describe(&false_eyes, height)
        );

        let open = Grid::new(width, height);
        let exploratory = self.rollout(&work, player, &open, None, false, &mut stats);
        tracing::trace!("exploratory tally\n{exploratory}");
        let seki = heuristics::scan_for_seki(&work, &exploratory, &self.params);
        tracing::debug!("{} cells flagged as seki", seki.total());
        tracing::trace!("seki\n{seki}");

        let horseshoe = heuristics::horseshoe_bias(&work, &self.params);
        let territory_bias = heuristics::territory_bias(&work, &self.params);
        let groups = heuristics::group_map(&work);
        let territory = heuristics::territory_map(&mut work);
        let liberties = heuristics::liberty_map(&work);
        let life = heuristics::strong_life(&work, &territory);
        let liberty_bias = heuristics::liberty_bias(&liberties, &self.params);
        let dead_bias = heuristics::likely_dead_bias(&work, &liberties, &self.params);
        tracing::trace!("horseshoe bias\n{horseshoe}");
        tracing::trace!("territory bias\n{territory_bias}");
        tracing::trace!("groups\n{groups}");
        tracing::trace!("territory\n{territory}");
        tracing::trace!("liberties\n{liberties}");
        tracing::trace!("strong life\n{life}");
        tracing::trace!("liberty bias\n{liberty_bias}");
        tracing::trace!("likely dead bias\n{dead_bias}");

        let mut bias = territory_bias;
        bias += &horseshoe;
        bias += &liberty_bias;
        bias += &dead_bias;
        tracing::trace!("combined bias\n{bias}");

        let settled = heuristics::settled_mask(&life, &seki);
        tracing::debug!(
            "{} of {} points settled before the final pass",
            settled.total(),
            width * height
        );

        let tally = self.rollout(&work, player, &settled, Some(&bias), true, &mut stats);
        tracing::trace!("final tally\n{tally}");

        let dead_stones: Vec<Point> = heuristics::dead_stones(&work, &tally, &self.params)
            .into_iter()
            .filter(|&p| goban.board()[p] != EMPTY)
            .collect();
        tracing::debug!(
            "{} probable dead stones: {}",
            dead_stones.len(),
            heuristics::describe(&dead_stones, height)
        );

        let mut ownership = heuristics::threshold(&tally, &self.params);
        heuristics::resolve_neutral_regions(&work, &mut ownership);
        tracing::trace!("ownership\n{ownership}");

        tracing::debug!(
            "{} playouts, {} moves, {} safety cap hits",
            stats.playouts,
            stats.moves,
            stats.safety_cap_hits
        );
        if stats.safety_cap_hits > 0 {
            tracing::warn!(
                "{} of {} playouts exhausted the safety cap of {} events",
                stats.safety_cap_hits,
                stats.playouts,
                self.params.safety_cap
            );
        }

        Estimate {
            ownership,
            dead_stones,
            stats,
        }
    }

    /// Tallies `iterations` playouts of `goban` on top of `bias`, each
    /// finished game scored by filling its single-colour regions.
    ///
    /// Every stone group of `goban` then takes the tally of largest magnitude
    /// found on it, so connected stones share one fate. With `pull_up` the
    /// group is further pushed to the most extreme same-signed tally among
    /// its neighbours.
    fn rollout(
        &mut self,
        goban: &Goban,
        player: Color,
        exclude: &Grid,
        bias: Option<&Grid>,
        pull_up: bool,
        stats: &mut RolloutStats,
    ) -> Grid {
        let board = goban.board();
        let mut tally = match bias {
            Some(bias) => bias.clone(),
            None => Grid::new(board.width(), board.height()),
        };

        for _ in 0..self.params.iterations {
            let mut sample = goban.clone();
            let outcome = play_out_position(
                &mut sample,
                player,
                exclude,
                self.params.safety_cap,
                &mut self.rng,
            );
            stats.record(outcome);
            sample.fill_all_territory();
            tally += sample.board();
        }

        let mut visited = Grid::new(board.width(), board.height());
        for p in board.points() {
            if visited[p] != 0 || board[p] == EMPTY {
                continue;
            }
            let (group, neighbors) = board.group_and_neighbors(p);
            visited.set(&group, 1);

            let Some(mut dominant) = tally.dominant(&group) else {
                continue;
            };
            if pull_up {
                if dominant < 0 {
                    dominant = tally.min(&neighbors).map_or(dominant, |m| m.min(dominant));
                } else if dominant > 0 {
                    dominant = tally.max(&neighbors).map_or(dominant, |m| m.max(dominant));
                }
            }
            tally.set(&group, dominant);
        }
        tally
    }
}

// =============================================================================
// Flat interface
// =============================================================================

/// Estimates ownership of a row-major board of `-1`/`0`/`1` cells.
///
/// Returns a row-major grid of the same shape: `1` black, `-1` white, `0`
/// neutral. `player` is the side to move, `1` or `-1`.
pub fn estimate(
    width: usize,
    height: usize,
    cells: &[i32],
    player: i32,
    iterations: usize,
    tolerance: f64,
) -> Result<Vec<i32>> {
    let (goban, player) = prepare(width, height, cells, player)?;
    let mut estimator = Estimator::new(EstimateParams::new(iterations, tolerance))?;
    Ok(estimator.estimate(&goban, player).ownership.into_cells())
}

/// [`estimate`] with a fixed random seed.
pub fn estimate_with_seed(
    width: usize,
    height: usize,
    cells: &[i32],
    player: i32,
    iterations: usize,
    tolerance: f64,
    seed: u64,
) -> Result<Vec<i32>> {
    let (goban, player) = prepare(width, height, cells, player)?;
    let mut estimator = Estimator::with_seed(EstimateParams::new(iterations, tolerance), seed)?;
    Ok(estimator.estimate(&goban, player).ownership.into_cells())
}

fn prepare(width: usize, height: usize, cells: &[i32], player: i32) -> Result<(Goban, Color)> {
    let goban = Goban::from_cells(width, height, cells)?;
    let player = match player {
        1 => Color::Black,
        -1 => Color::White,
        _ => {
            return Err(EstimateError::InvalidInput(format!(
                "side to move must be 1 or -1, got {player}"
            )));
        }
    };
    Ok((goban, player))
}
