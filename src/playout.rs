//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random moves for both sides until neither side
//! has anything left to play. Moves into a side's own eyes and near-eyes are
//! refused, so a weak random player still leaves living shapes alive. Points
//! the caller marks as settled are never offered as candidates.

use crate::color::{Color, EMPTY};
use crate::goban::Goban;
use crate::grid::Grid;
use crate::points::PointVec;

/// What happened during one playout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayoutOutcome {
    /// Stones successfully placed.
    pub moves: usize,
    /// The loop ran out of events before both sides passed.
    pub hit_safety_cap: bool,
}

/// Plays random moves on `goban` starting with `player`.
///
/// Candidates are the empty points where `exclude` is zero. Each loop event
/// draws one candidate: an eye or safe horseshoe of the side to move, or an
/// illegal placement, is parked until the next successful move; a legal
/// placement is kept and the turn passes. A side with no candidates left
/// passes, and two passes in a row end the game. At most `safety_cap`
/// events are spent.
pub fn play_out_position(
    goban: &mut Goban,
    mut player: Color,
    exclude: &Grid,
    safety_cap: usize,
    rng: &mut fastrand::Rng,
) -> PlayoutOutcome {
    goban.clear_ko();

    let board = goban.board();
    let mut candidates: PointVec = board
        .points()
        .filter(|&p| board[p] == EMPTY && exclude[p] == 0)
        .collect();
    let mut parked = PointVec::new();

    let mut outcome = PlayoutOutcome::default();
    let mut budget = safety_cap;
    let mut passed = false;

    while !candidates.is_empty() {
        if budget == 0 {
            outcome.hit_safety_cap = true;
            break;
        }
        budget -= 1;

        let idx = rng.usize(..candidates.len());
        let mv = candidates[idx];

        // every eye is also a safe horseshoe, so one test refuses both;
        // captured points are appended, so `idx` still names `mv` afterwards
        let refused = goban.is_safe_horseshoe(mv, player);
        if !refused && goban.place_and_remove(mv, player, &mut candidates).is_ok() {
            candidates.swap_remove(idx);
            outcome.moves += 1;
            passed = false;
            player = -player;
            candidates.append(&mut parked);
            continue;
        }

        parked.push(candidates.swap_remove(idx));
        if candidates.is_empty() {
            if passed {
                break;
            }
            passed = true;
            candidates.append(&mut parked);
            player = -player;
        }
    }

    outcome
}
