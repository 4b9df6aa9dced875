//! Deterministic readings of a position that steer and correct the rollouts.
//!
//! Layers computed from the static position (territory, liberties, strong
//! life, the bias layers) are signed: positive values lean black, negative
//! lean white. Layers computed from a rollout tally (seki, dead stones)
//! compare against the confidence bar `iterations * tolerance`.

use crate::color::{Color, EMPTY};
use crate::config::EstimateParams;
use crate::constants::{
    LIBERTY_BIAS_DIVISOR, LIKELY_DEAD_LIBERTY_THRESHOLD, STRONG_LIFE_MIN_EYES,
    STRONG_LIFE_MIN_TERRITORY,
};
use crate::goban::Goban;
use crate::grid::Grid;
use crate::point::Point;
use crate::points::PointVec;

fn blank(goban: &Goban) -> Grid {
    Grid::new(goban.width(), goban.height())
}

// =============================================================================
// Static position layers
// =============================================================================

/// Weights every stone group bordering a safe horseshoe toward its own colour.
pub fn horseshoe_bias(goban: &Goban, params: &EstimateParams) -> Grid {
    let board = goban.board();
    let mut marked = blank(goban);

    for p in board.points() {
        if board[p] != EMPTY {
            continue;
        }
        if !goban.is_safe_horseshoe(p, Color::Black)
            && !goban.is_safe_horseshoe(p, Color::White)
        {
            continue;
        }
        for n in board.neighbors(p) {
            marked.set(&board.group(n), 1);
        }
    }

    // empty neighbours were marked too; multiplying by the board drops them
    marked *= board;
    marked *= params.half_weight();
    marked
}

/// Trusts that each player's enclosed area is theirs: stones and
/// single-colour territory weigh toward their owner.
pub fn territory_bias(goban: &Goban, params: &EstimateParams) -> Grid {
    let mut filled = goban.clone();
    filled.fill_all_territory();
    filled.board() * params.half_weight()
}

/// Labels every connected region of equal cells (stone groups and empty
/// regions alike) with a distinct number starting at 1.
pub fn group_map(goban: &Goban) -> Grid {
    let board = goban.board();
    let mut labels = blank(goban);
    let mut next = 1;
    for p in board.points() {
        if labels[p] == 0 {
            board.trace_group(p, &mut labels, next);
            next += 1;
        }
    }
    labels
}

/// Marks each territory point with the size of its region, signed by owner.
/// Empty regions touching both colours, or none, stay zero.
pub fn territory_map(goban: &mut Goban) -> Grid {
    let mut territory = blank(goban);
    for p in goban.board().points() {
        if territory[p] != 0 || goban.board()[p] != EMPTY {
            continue;
        }
        for color in [Color::Black, Color::White] {
            if goban.is_territory(p, color) {
                let region = goban.board().group(p);
                territory.set(&region, region.len() as i32 * color.value());
                break;
            }
        }
    }
    territory
}

/// Stone groups get their liberty count signed by colour; empty regions get
/// the sum of the stone values bordering them.
pub fn liberty_map(goban: &Goban) -> Grid {
    let board = goban.board();
    let mut liberties = blank(goban);
    let mut visited = blank(goban);

    for p in board.points() {
        if visited[p] != 0 {
            continue;
        }
        let (group, neighbors) = board.group_and_neighbors(p);
        visited.set(&group, 1);

        let reading = if board[p] == EMPTY {
            board.sum(&neighbors)
        } else {
            board.count_equal(&neighbors, EMPTY) as i32 * board[p]
        };
        liberties.set(&group, reading);
    }
    liberties
}

/// Flags unions of same-coloured stones and their territory that are alive
/// beyond doubt: at least two separate territories, or enough territory in
/// total. Flagged cells hold the union's total territory size.
pub fn strong_life(goban: &Goban, territory: &Grid) -> Grid {
    let board = goban.board();
    let mut life = blank(goban);
    let mut visited = blank(goban);

    let mut unified = blank(goban);
    for p in board.points() {
        unified[p] = if board[p] == EMPTY { territory[p].signum() } else { board[p] };
    }

    for p in board.points() {
        if visited[p] != 0 {
            continue;
        }
        let union = unified.group(p);

        let mut eyes = 0;
        let mut area = 0;
        for &q in &union {
            if visited[q] != 0 || territory[q] == 0 {
                continue;
            }
            let region = board.group(q);
            visited.set(&region, 1);
            eyes += 1;
            area += region.len();
        }
        visited.set(&union, 1);

        if eyes >= STRONG_LIFE_MIN_EYES || area >= STRONG_LIFE_MIN_TERRITORY {
            life.set(&union, area as i32);
        }
    }
    life
}

/// Leans each point toward whoever dominates the liberty readings of the
/// point and its neighbours.
pub fn liberty_bias(liberties: &Grid, params: &EstimateParams) -> Grid {
    let mut bias = Grid::new(liberties.width(), liberties.height());
    for p in liberties.points() {
        let neighbors = liberties.neighbors(p);
        let sum = liberties[p] + liberties.sum(&neighbors);
        bias[p] = (sum as f64 * params.confidence() / LIBERTY_BIAS_DIVISOR) as i32;
    }
    bias
}

/// Weighs lone stones toward the opponent when every neighbouring liberty
/// reading is firmly the opponent's.
pub fn likely_dead_bias(goban: &Goban, liberties: &Grid, params: &EstimateParams) -> Grid {
    let board = goban.board();
    let mut bias = blank(goban);

    for p in board.points() {
        let Some(color) = Color::from_value(board[p]) else {
            continue;
        };
        let neighbors = board.neighbors(p);
        if neighbors.iter().any(|&n| board[n] == color.value()) {
            continue;
        }
        let surrounded = neighbors
            .iter()
            .all(|&n| -color.value() * liberties[n] > LIKELY_DEAD_LIBERTY_THRESHOLD);
        if surrounded {
            bias[p] = -color.value() * params.half_weight();
        }
    }
    bias
}

// =============================================================================
// Rollout readings
// =============================================================================

/// Flags probable seki from an exploratory rollout tally.
///
/// A stone group whose tally is ambiguous everywhere, next to an opposing
/// group that is ambiguous too, is taken for seki when every ambiguous
/// opposing neighbour has as many liberties as it does. The group and its
/// liberties are flagged. This is an approximation, not a seki solver.
pub fn scan_for_seki(goban: &Goban, tally: &Grid, params: &EstimateParams) -> Grid {
    let board = goban.board();
    let bar = params.confidence() as i32;
    let mut seki = blank(goban);
    let mut visited = blank(goban);

    for p in board.points() {
        if visited[p] != 0 {
            continue;
        }
        let (group, neighbors) = board.group_and_neighbors(p);
        visited.set(&group, 1);

        let Some(color) = Color::from_value(board[p]) else {
            continue;
        };
        if !tally.all_abs_le(&group, bar) {
            continue;
        }

        let opposing = board.matching(&neighbors, color.opp().value());
        if !tally.any_abs_le(&opposing, bar) {
            continue;
        }

        let liberties = board.count_equal(&neighbors, EMPTY);
        let in_seki = opposing
            .iter()
            .filter(|&&n| tally[n].abs() <= bar)
            .all(|&n| {
                let (_, their_neighbors) = board.group_and_neighbors(n);
                board.count_equal(&their_neighbors, EMPTY) == liberties
            });

        if in_seki {
            seki.set(&group, 1);
            seki.set(&board.matching(&neighbors, EMPTY), 1);
        }
    }
    seki
}

/// Stones the tally says are gone: confidently owned by the other colour,
/// or not confidently owned at all.
pub fn dead_stones(goban: &Goban, tally: &Grid, params: &EstimateParams) -> PointVec {
    let board = goban.board();
    let confidence = params.confidence();
    board
        .points()
        .filter(|&p| {
            let stone = board[p];
            if stone == EMPTY {
                return false;
            }
            let t = tally[p] as f64;
            if t > confidence {
                stone == Color::White.value()
            } else if t < -confidence {
                stone == Color::Black.value()
            } else {
                true
            }
        })
        .collect()
}

/// Final ownership from a tally: black above the bar, white below its
/// negation, neutral in between.
pub fn threshold(tally: &Grid, params: &EstimateParams) -> Grid {
    let confidence = params.confidence();
    let mut ownership = Grid::new(tally.width(), tally.height());
    for p in tally.points() {
        let t = tally[p] as f64;
        ownership[p] = if t > confidence {
            Color::Black.value()
        } else if t < -confidence {
            Color::White.value()
        } else {
            EMPTY
        };
    }
    ownership
}

/// Gives each still-neutral empty region to the only colour bordering it.
/// Regions bordered by both colours, or by neither, stay neutral.
pub fn resolve_neutral_regions(goban: &Goban, ownership: &mut Grid) {
    let board = goban.board();
    let mut open = blank(goban);
    for p in board.points() {
        open[p] = (board[p] == EMPTY && ownership[p] == EMPTY) as i32;
    }

    let mut visited = blank(goban);
    for p in board.points() {
        if open[p] == 0 || visited[p] != 0 {
            continue;
        }
        let (region, border) = open.group_and_neighbors(p);
        visited.set(&region, 1);

        let black = ownership.count_equal(&border, Color::Black.value()) > 0;
        let white = ownership.count_equal(&border, Color::White.value()) > 0;
        let owner = match (black, white) {
            (true, false) => Color::Black,
            (false, true) => Color::White,
            _ => continue,
        };
        ownership.set(&region, owner.value());
    }
}

/// Seki cells and strongly alive cells together: points playouts must not invade.
pub fn settled_mask(life: &Grid, seki: &Grid) -> Grid {
    let mut mask = Grid::new(life.width(), life.height());
    for p in life.points() {
        mask[p] = (life[p] != 0 || seki[p] != 0) as i32;
    }
    mask
}

/// `points` as Go coordinates, for logs.
pub fn describe(points: &[Point], height: usize) -> String {
    points
        .iter()
        .map(|p| p.coord(height))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Goban {
        let height = rows.len();
        let width = rows[0].len();
        let cells: Vec<i32> = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|c| match c {
                'X' => 1,
                'O' => -1,
                _ => 0,
            })
            .collect();
        Goban::from_cells(width, height, &cells).unwrap()
    }

    fn pt(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    fn params(iterations: usize, tolerance: f64) -> EstimateParams {
        EstimateParams::new(iterations, tolerance)
    }

    #[test]
    fn territory_map_sizes_and_signs() {
        let mut g = board(&[
            ".X..O.",
            "XX..OO",
            "......",
        ]);
        let t = territory_map(&mut g);
        assert_eq!(t[pt(0, 0)], 1);
        assert_eq!(t[pt(5, 0)], -1);
        assert_eq!(t[pt(2, 0)], 0);
        assert_eq!(t[pt(3, 2)], 0);
    }

    #[test]
    fn group_map_labels_each_region() {
        let g = board(&[
            "X.O",
            "X.O",
        ]);
        let labels = group_map(&g);
        assert_eq!(labels[pt(0, 0)], labels[pt(0, 1)]);
        assert_eq!(labels[pt(1, 0)], labels[pt(1, 1)]);
        assert_ne!(labels[pt(0, 0)], labels[pt(1, 0)]);
        assert_ne!(labels[pt(1, 0)], labels[pt(2, 0)]);
        assert_eq!(labels.cells().iter().max(), Some(&3));
    }

    #[test]
    fn liberty_map_readings() {
        let g = board(&[
            ".X.",
            "XX.",
            "..O",
        ]);
        let libs = liberty_map(&g);
        // black group: liberties (0,0), (2,0), (2,1), (0,2), (1,2)
        assert_eq!(libs[pt(1, 1)], 5);
        // white stone: liberties (2,1), (1,2)
        assert_eq!(libs[pt(2, 2)], -2);
        // the corner region only touches black
        assert_eq!(libs[pt(0, 0)], 2);
    }

    #[test]
    fn strong_life_needs_two_eyes_or_big_territory() {
        let mut two_eyes = board(&[
            ".X.X.",
            "XXXXX",
            ".....",
            "....O",
        ]);
        let t = territory_map(&mut two_eyes);
        let life = strong_life(&two_eyes, &t);
        assert_eq!(life[pt(1, 0)], 3);
        assert_eq!(life[pt(0, 0)], 3);
        assert_eq!(life[pt(0, 3)], 0);

        let mut one_eye = board(&[
            ".X...",
            "XX...",
            ".....",
            "....O",
        ]);
        let t = territory_map(&mut one_eye);
        let life = strong_life(&one_eye, &t);
        assert!(life.cells().iter().all(|&v| v == 0));
    }

    #[test]
    fn horseshoe_bias_weights_surrounding_stones() {
        let g = board(&[
            ".....",
            ".XXX.",
            ".X.X.",
            ".....",
        ]);
        let bias = horseshoe_bias(&g, &params(100, 0.2));
        assert_eq!(bias[pt(1, 1)], 10);
        assert_eq!(bias[pt(2, 2)], 0);
        assert_eq!(bias[pt(0, 0)], 0);
    }

    #[test]
    fn territory_bias_counts_stones_and_enclosed_area() {
        let g = board(&[
            ".X...",
            "XX..O",
        ]);
        let bias = territory_bias(&g, &params(100, 0.2));
        assert_eq!(bias[pt(0, 0)], 10);
        assert_eq!(bias[pt(1, 1)], 10);
        assert_eq!(bias[pt(4, 1)], -10);
        assert_eq!(bias[pt(3, 0)], 0);
    }

    #[test]
    fn liberty_bias_scales_readings() {
        let mut libs = Grid::new(2, 1);
        libs[pt(0, 0)] = 40;
        libs[pt(1, 0)] = 10;
        let bias = liberty_bias(&libs, &params(100, 0.5));
        assert_eq!(bias[pt(0, 0)], 25);
        assert_eq!(bias[pt(1, 0)], 25);
    }

    #[test]
    fn lone_stone_in_enemy_area_is_weighted_dead() {
        let mut libs = Grid::new(3, 3);
        libs.clear(-7);
        let g = board(&["...", ".X.", "..."]);
        let bias = likely_dead_bias(&g, &libs, &params(100, 0.2));
        assert_eq!(bias[pt(1, 1)], -10);

        libs[pt(1, 0)] = 3;
        let bias = likely_dead_bias(&g, &libs, &params(100, 0.2));
        assert_eq!(bias[pt(1, 1)], 0);
    }

    #[test]
    fn tally_on_the_bar_still_compares_liberties() {
        // black has one liberty, white two; a tally of exactly the bar is ambiguous
        let g = board(&["XO.", "..."]);
        let mut tally = Grid::new(3, 2);
        tally.clear(2);
        let seki = scan_for_seki(&g, &tally, &params(10, 0.2));
        assert!(seki.cells().iter().all(|&v| v == 0), "{:?}", seki.cells());
    }

    #[test]
    fn seki_between_equal_liberty_groups() {
        let g = board(&["XO", ".."]);
        let tally = Grid::new(2, 2);
        let seki = scan_for_seki(&g, &tally, &params(10, 0.2));
        // one liberty each, both ambiguous
        assert!(seki.cells().iter().all(|&v| v == 1));
    }

    #[test]
    fn no_seki_when_liberties_differ_or_tally_is_clear() {
        let g = board(&[
            "X..O",
            "X..O",
            "X...",
        ]);
        let tally = Grid::new(4, 3);
        let seki = scan_for_seki(&g, &tally, &params(10, 0.2));
        // no opposing group touches the black one
        assert!(seki.cells().iter().all(|&v| v == 0));

        let g = board(&["XO", "X.", ".."]);
        let mut tally = Grid::new(2, 3);
        tally.clear(10);
        let seki = scan_for_seki(&g, &tally, &params(10, 0.2));
        assert!(seki.cells().iter().all(|&v| v == 0));
    }

    #[test]
    fn dead_stones_disagree_with_tally() {
        let g = board(&["XO.", "XO."]);
        let mut tally = Grid::new(3, 2);
        tally[pt(0, 0)] = 50;
        tally[pt(0, 1)] = 3;
        tally[pt(1, 0)] = 50;
        tally[pt(1, 1)] = -50;
        let dead = dead_stones(&g, &tally, &params(100, 0.2));
        assert_eq!(&dead[..], &[pt(1, 0), pt(0, 1)]);
    }

    #[test]
    fn threshold_is_strict() {
        let mut tally = Grid::new(3, 1);
        tally[pt(0, 0)] = 20;
        tally[pt(1, 0)] = 21;
        tally[pt(2, 0)] = -21;
        let owner = threshold(&tally, &params(100, 0.2));
        assert_eq!(owner.cells(), &[0, 1, -1]);
    }

    #[test]
    fn neutral_regions_go_to_their_only_neighbour() {
        let g = board(&[
            "X...",
            "X..O",
        ]);
        let mut owner = Grid::new(4, 2);
        owner[pt(0, 0)] = 1;
        owner[pt(0, 1)] = 1;
        resolve_neutral_regions(&g, &mut owner);
        assert!(owner.cells().iter().all(|&v| v == 1 || v == 0));
        assert_eq!(owner[pt(1, 0)], 1);
        assert_eq!(owner[pt(3, 0)], 1);
        // the stone itself keeps its neutral reading
        assert_eq!(owner[pt(3, 1)], 0);

        let mut contested = Grid::new(4, 2);
        contested[pt(0, 0)] = 1;
        contested[pt(3, 1)] = -1;
        resolve_neutral_regions(&g, &mut contested);
        assert_eq!(contested[pt(1, 0)], 0);
    }

    #[test]
    fn settled_mask_is_a_union() {
        let mut life = Grid::new(2, 1);
        let mut seki = Grid::new(2, 1);
        life[pt(0, 0)] = 7;
        seki[pt(1, 0)] = 1;
        assert_eq!(settled_mask(&life, &seki).cells(), &[1, 1]);
    }
}
