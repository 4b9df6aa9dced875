//! Board state and the rule primitives built on it.
//!
//! A [`Goban`] owns the stones, the current ko restriction and a scratch
//! grid of visit stamps. Traversals that need a visited set take a fresh
//! stamp instead of clearing the scratch grid: a cell counts as visited in
//! the current traversal iff it holds the current stamp. Stamps only grow,
//! so the cost of a liberty check is proportional to the group, not the
//! board.
//!
//! Cloning copies stones and ko; the stamp grid starts over, so clones
//! used as playout scratch space never share traversal state.

use std::fmt;

use crate::color::{Color, EMPTY};
use crate::constants::{MAX_HEIGHT, MAX_WIDTH};
use crate::error::{EstimateError, MoveError, Result};
use crate::grid::Grid;
use crate::point::Point;
use crate::points::PointVec;

#[derive(Debug)]
pub struct Goban {
    board: Grid,
    ko: Option<Point>,
    visited: Grid,
    stamp: i32,
}

impl Clone for Goban {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            ko: self.ko,
            visited: Grid::new(self.board.width(), self.board.height()),
            stamp: 0,
        }
    }
}

impl Goban {
    /// An empty board. Fails if the size is zero or beyond the supported maximum.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_size(width, height)?;
        Ok(Self {
            board: Grid::new(width, height),
            ko: None,
            visited: Grid::new(width, height),
            stamp: 0,
        })
    }

    /// A board from row-major cell values in {-1, 0, 1}.
    pub fn from_cells(width: usize, height: usize, cells: &[i32]) -> Result<Self> {
        let mut goban = Self::new(width, height)?;
        if cells.len() != width * height {
            return Err(EstimateError::InvalidInput(format!(
                "expected {} cells for a {width}x{height} board, got {}",
                width * height,
                cells.len()
            )));
        }
        if let Some((i, v)) = cells.iter().enumerate().find(|(_, v)| !(-1..=1).contains(*v)) {
            return Err(EstimateError::InvalidInput(format!(
                "cell {i} holds {v}, expected -1, 0 or 1"
            )));
        }
        goban.board = Grid::from_cells(width, height, cells.to_vec())
            .ok_or_else(|| EstimateError::InvalidInput("cell count mismatch".into()))?;
        Ok(goban)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.board.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.board.height()
    }

    /// The stones as a grid of cell values.
    pub fn board(&self) -> &Grid {
        &self.board
    }

    /// Point where an immediate recapture is currently forbidden.
    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn clear_ko(&mut self) {
        self.ko = None;
    }

    pub fn stone_count(&self) -> usize {
        self.board.cells().iter().filter(|&&v| v != EMPTY).count()
    }

    /// Checked read of a cell value.
    pub fn get(&self, p: Point) -> Result<i32> {
        self.board.get(p).ok_or_else(|| self.out_of_bounds(p))
    }

    /// Checked write of a stone (or `None` to clear), bypassing the rules.
    pub fn set(&mut self, p: Point, stone: Option<Color>) -> Result<()> {
        if !self.board.contains(p) {
            return Err(self.out_of_bounds(p));
        }
        self.board[p] = stone.map_or(EMPTY, Color::value);
        Ok(())
    }

    fn out_of_bounds(&self, p: Point) -> EstimateError {
        EstimateError::OutOfBounds {
            x: p.x,
            y: p.y,
            width: self.width(),
            height: self.height(),
        }
    }

    #[inline]
    fn next_stamp(&mut self) -> i32 {
        self.stamp += 1;
        self.stamp
    }

    // -------------------------------------------------------------------------
    // Liberties and captures
    // -------------------------------------------------------------------------

    /// Does the group at `p` touch at least one empty point?
    ///
    /// Stops at the first liberty found. Every stone reached is stamped,
    /// so a caller can tell which stones the check covered.
    pub fn has_liberties(&mut self, p: Point) -> bool {
        let color = self.board[p];
        let stamp = self.next_stamp();
        let mut tocheck = PointVec::new();

        self.visited[p] = stamp;
        tocheck.push(p);

        while let Some(cur) = tocheck.pop() {
            for n in self.board.neighbors(cur) {
                let c = self.board[n];
                if c == EMPTY {
                    return true;
                }
                if c == color && self.visited[n] != stamp {
                    self.visited[n] = stamp;
                    tocheck.push(n);
                }
            }
        }
        false
    }

    /// Removes the group at `p`, appending every freed point to `candidates`.
    /// Returns the number of stones removed.
    pub fn remove_group(&mut self, p: Point, candidates: &mut PointVec) -> usize {
        let color = self.board[p];
        let mut tocheck = PointVec::new();
        let mut removed = 0;

        self.board[p] = EMPTY;
        tocheck.push(p);

        while let Some(cur) = tocheck.pop() {
            candidates.push(cur);
            removed += 1;
            for n in self.board.neighbors(cur) {
                if self.board[n] == color {
                    self.board[n] = EMPTY;
                    tocheck.push(n);
                }
            }
        }
        removed
    }

    /// Places `player` at `p` and captures whatever that kills.
    ///
    /// Captured points are appended to `candidates`. A move that captures
    /// exactly one stone leaves a ko restriction on that point; any other
    /// successful move lifts it. Illegal moves leave the board untouched.
    pub fn place_and_remove(
        &mut self,
        p: Point,
        player: Color,
        candidates: &mut PointVec,
    ) -> std::result::Result<(), MoveError> {
        if self.board[p] != EMPTY {
            return Err(MoveError::Occupied);
        }
        if self.ko == Some(p) {
            return Err(MoveError::Ko);
        }

        self.board[p] = player.value();
        let opponent = player.opp().value();

        let mut captured = 0;
        let mut last_capture = None;
        self.next_stamp();
        for n in self.board.neighbors(p) {
            // a previous liberty check may already have covered this stone
            if self.board[n] == opponent
                && self.visited[n] != self.stamp
                && !self.has_liberties(n)
            {
                captured += self.remove_group(n, candidates);
                last_capture = Some(n);
            }
        }

        if captured == 0 && !self.has_liberties(p) {
            self.board[p] = EMPTY;
            return Err(MoveError::Suicide);
        }

        self.ko = if captured == 1 { last_capture } else { None };
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Shapes
    // -------------------------------------------------------------------------

    /// True if at least half of the diagonals of `p` hold `player`'s opponent.
    /// A board corner has one diagonal, so an empty or friendly one leaves it
    /// a possible eye. Corners are deliberately not ruled out as eyes.
    fn corners_compromised(&self, p: Point, player: Color) -> bool {
        let corners = self.board.corners(p);
        2 * self.board.count_equal(&corners, player.opp().value()) >= corners.len()
    }

    /// Is `p` an eye of `player`: every orthogonal neighbour (or edge) is
    /// `player`'s and fewer than half the diagonals are the opponent's.
    pub fn is_eye(&self, p: Point, player: Color) -> bool {
        let neighbors = self.board.neighbors(p);
        self.board.all_equal_to(&neighbors, player.value()) && !self.corners_compromised(p, player)
    }

    /// Is `p` nearly an eye of `player`: all but at most one orthogonal
    /// neighbour are `player`'s, none is the opponent's, and the diagonals
    /// pass the same test as [`Goban::is_eye`].
    pub fn is_safe_horseshoe(&self, p: Point, player: Color) -> bool {
        let neighbors = self.board.neighbors(p);
        let own = self.board.count_equal(&neighbors, player.value());
        let theirs = self.board.count_equal(&neighbors, player.opp().value());
        own + 1 >= neighbors.len() && theirs == 0 && !self.corners_compromised(p, player)
    }

    /// Empty points enclosed by one colour whose diagonals are compromised.
    /// Board corners are never reported.
    pub fn false_eyes(&self) -> PointVec {
        let mut out = PointVec::new();
        for p in self.board.points() {
            if self.board[p] != EMPTY || self.board.corners(p).len() == 1 {
                continue;
            }
            let neighbors = self.board.neighbors(p);
            for color in [Color::Black, Color::White] {
                if self.board.all_equal_to(&neighbors, color.value())
                    && self.corners_compromised(p, color)
                {
                    out.push(p);
                    break;
                }
            }
        }
        out
    }

    /// Fills each of `eyes` with the colour that surrounds it. Returns how
    /// many fills were legal.
    pub fn fill_false_eyes(&mut self, eyes: &[Point]) -> usize {
        let mut scratch = PointVec::new();
        let mut filled = 0;
        for &p in eyes {
            let surrounding = self
                .board
                .neighbors(p)
                .first()
                .and_then(|&n| Color::from_value(self.board[n]));
            if let Some(color) = surrounding {
                if self.place_and_remove(p, color, &mut scratch).is_ok() {
                    filled += 1;
                }
            }
        }
        filled
    }

    // -------------------------------------------------------------------------
    // Territory
    // -------------------------------------------------------------------------

    /// Is the empty region containing `p` bordered by `player` alone?
    /// A region touching no stones at all belongs to nobody.
    pub fn is_territory(&mut self, p: Point, player: Color) -> bool {
        let stamp = self.next_stamp();
        let mut tocheck = PointVec::new();
        let mut bordering = 0;

        self.visited[p] = stamp;
        tocheck.push(p);

        while let Some(cur) = tocheck.pop() {
            let c = self.board[cur];
            if c != EMPTY {
                if c != player.value() {
                    return false;
                }
                bordering += 1;
                continue;
            }
            for n in self.board.neighbors(cur) {
                if self.visited[n] != stamp {
                    self.visited[n] = stamp;
                    tocheck.push(n);
                }
            }
        }
        bordering > 0
    }

    /// Fills the empty region containing `p` with `player`'s stones.
    pub fn fill_territory(&mut self, p: Point, player: Color) {
        let stamp = self.next_stamp();
        let mut tocheck = PointVec::new();

        self.visited[p] = stamp;
        tocheck.push(p);

        while let Some(cur) = tocheck.pop() {
            if self.board[cur] != EMPTY {
                continue;
            }
            self.board[cur] = player.value();
            for n in self.board.neighbors(cur) {
                if self.visited[n] != stamp {
                    self.visited[n] = stamp;
                    tocheck.push(n);
                }
            }
        }
    }

    /// Fills every empty region bordered by a single colour with that colour.
    pub fn fill_all_territory(&mut self) {
        for p in self.board.points() {
            if self.board[p] != EMPTY {
                continue;
            }
            if self.is_territory(p, Color::Black) {
                self.fill_territory(p, Color::Black);
            } else if self.is_territory(p, Color::White) {
                self.fill_territory(p, Color::White);
            }
        }
    }
}

fn check_size(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_WIDTH || height > MAX_HEIGHT {
        return Err(EstimateError::Capacity { width, height });
    }
    Ok(())
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let ch = match Color::from_value(self.board[Point::new(x, y)]) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
