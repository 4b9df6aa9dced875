//! A width x height map of integers over board coordinates.
//!
//! Every layer the estimator works with is a [`Grid`]: the stones themselves
//! (`+1` black, `-1` white, `0` empty), rollout tallies, bias layers, group
//! labels and binary masks. Beside plain cell access it offers the flood
//! fills the rest of the crate is built on, predicates and reducers over
//! point sets, and elementwise arithmetic for combining layers.

use std::fmt;
use std::ops::{AddAssign, Index, IndexMut, Mul, MulAssign};

use arrayvec::ArrayVec;

use crate::constants::BOARD_LETTERS;
use crate::point::Point;
use crate::points::PointVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// A zero-filled grid. Callers are expected to have validated the size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Wraps row-major `cells`; `None` if the length does not match.
    pub fn from_cells(width: usize, height: usize, cells: Vec<i32>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<i32> {
        self.cells
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// Checked read.
    pub fn get(&self, p: Point) -> Option<i32> {
        self.contains(p).then(|| self.cells[self.idx(p)])
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        assert!(
            self.contains(p),
            "{p} is off a {}x{} grid",
            self.width,
            self.height
        );
        p.y * self.width + p.x
    }

    /// Every coordinate in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    /// Sets every cell to `value`.
    pub fn clear(&mut self, value: i32) {
        self.cells.fill(value);
    }

    // -------------------------------------------------------------------------
    // Neighbourhoods
    // -------------------------------------------------------------------------

    /// Orthogonal neighbours that lie on the grid.
    pub fn neighbors(&self, p: Point) -> ArrayVec<Point, 4> {
        let mut out = ArrayVec::new();
        if p.x > 0 {
            out.push(Point::new(p.x - 1, p.y));
        }
        if p.x + 1 < self.width {
            out.push(Point::new(p.x + 1, p.y));
        }
        if p.y > 0 {
            out.push(Point::new(p.x, p.y - 1));
        }
        if p.y + 1 < self.height {
            out.push(Point::new(p.x, p.y + 1));
        }
        out
    }

    /// Diagonal neighbours that lie on the grid.
    pub fn corners(&self, p: Point) -> ArrayVec<Point, 4> {
        let mut out = ArrayVec::new();
        let left = p.x > 0;
        let right = p.x + 1 < self.width;
        let up = p.y > 0;
        let down = p.y + 1 < self.height;
        if left && up {
            out.push(Point::new(p.x - 1, p.y - 1));
        }
        if right && up {
            out.push(Point::new(p.x + 1, p.y - 1));
        }
        if left && down {
            out.push(Point::new(p.x - 1, p.y + 1));
        }
        if right && down {
            out.push(Point::new(p.x + 1, p.y + 1));
        }
        out
    }

    // -------------------------------------------------------------------------
    // Flood fills
    // -------------------------------------------------------------------------

    /// Visits the 4-connected region of cells equal to the value at `start`.
    /// `on_member` sees each region point, `on_border` each distinct
    /// differing point adjacent to the region.
    fn flood(
        &self,
        start: Point,
        mut on_member: impl FnMut(Point),
        mut on_border: impl FnMut(Point),
    ) {
        let matching = self[start];
        let mut visited = vec![false; self.cells.len()];
        let mut tocheck = PointVec::new();

        visited[self.idx(start)] = true;
        tocheck.push(start);

        while let Some(p) = tocheck.pop() {
            if self[p] != matching {
                on_border(p);
                continue;
            }
            on_member(p);
            for n in self.neighbors(p) {
                let i = self.idx(n);
                if !visited[i] {
                    visited[i] = true;
                    tocheck.push(n);
                }
            }
        }
    }

    /// All points connected to `start` that share its value.
    pub fn group(&self, start: Point) -> PointVec {
        let mut group = PointVec::new();
        self.flood(start, |p| group.push(p), |_| {});
        group
    }

    /// The connected group at `start` together with the distinct points
    /// bordering it, gathered in one pass.
    pub fn group_and_neighbors(&self, start: Point) -> (PointVec, PointVec) {
        let mut group = PointVec::new();
        let mut neighbors = PointVec::new();
        self.flood(start, |p| group.push(p), |p| neighbors.push(p));
        (group, neighbors)
    }

    /// Writes `label` into `dest` for every point of the group at `start`.
    pub fn trace_group(&self, start: Point, dest: &mut Grid, label: i32) {
        self.flood(start, |p| dest[p] = label, |_| {});
    }

    // -------------------------------------------------------------------------
    // Point-set queries
    // -------------------------------------------------------------------------

    /// Points of `set` whose value equals `value`.
    pub fn matching(&self, set: &[Point], value: i32) -> PointVec {
        set.iter().copied().filter(|&p| self[p] == value).collect()
    }

    pub fn all_equal_to(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p] == value)
    }

    pub fn all_not_equal_to(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p] != value)
    }

    pub fn any_abs_le(&self, set: &[Point], value: i32) -> bool {
        set.iter().any(|&p| self[p].abs() <= value)
    }

    pub fn any_abs_ge(&self, set: &[Point], value: i32) -> bool {
        set.iter().any(|&p| self[p].abs() >= value)
    }

    pub fn all_abs_le(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p].abs() <= value)
    }

    pub fn all_abs_ge(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p].abs() >= value)
    }

    pub fn any_le(&self, set: &[Point], value: i32) -> bool {
        set.iter().any(|&p| self[p] <= value)
    }

    pub fn any_ge(&self, set: &[Point], value: i32) -> bool {
        set.iter().any(|&p| self[p] >= value)
    }

    pub fn all_le(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p] <= value)
    }

    pub fn all_ge(&self, set: &[Point], value: i32) -> bool {
        set.iter().all(|&p| self[p] >= value)
    }

    pub fn count_equal(&self, set: &[Point], value: i32) -> usize {
        set.iter().filter(|&&p| self[p] == value).count()
    }

    // -------------------------------------------------------------------------
    // Reducers
    // -------------------------------------------------------------------------

    /// Sum over the whole grid.
    pub fn total(&self) -> i32 {
        self.cells.iter().sum()
    }

    pub fn sum(&self, set: &[Point]) -> i32 {
        set.iter().map(|&p| self[p]).sum()
    }

    pub fn min(&self, set: &[Point]) -> Option<i32> {
        set.iter().map(|&p| self[p]).min()
    }

    pub fn max(&self, set: &[Point]) -> Option<i32> {
        set.iter().map(|&p| self[p]).max()
    }

    /// The value of greatest magnitude in `set`; the first one wins ties.
    pub fn dominant(&self, set: &[Point]) -> Option<i32> {
        let mut values = set.iter().map(|&p| self[p]);
        let first = values.next()?;
        Some(values.fold(first, |best, v| if v.abs() > best.abs() { v } else { best }))
    }

    /// Broadcasts `value` to every point of `set`.
    pub fn set(&mut self, set: &[Point], value: i32) {
        for &p in set {
            self[p] = value;
        }
    }

    fn assert_same_shape(&self, other: &Grid) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "grid shapes differ"
        );
    }
}

impl Index<Point> for Grid {
    type Output = i32;

    #[inline]
    fn index(&self, p: Point) -> &i32 {
        &self.cells[self.idx(p)]
    }
}

impl IndexMut<Point> for Grid {
    #[inline]
    fn index_mut(&mut self, p: Point) -> &mut i32 {
        let i = self.idx(p);
        &mut self.cells[i]
    }
}

impl AddAssign<&Grid> for Grid {
    fn add_assign(&mut self, rhs: &Grid) {
        self.assert_same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a += b;
        }
    }
}

impl AddAssign<i32> for Grid {
    fn add_assign(&mut self, rhs: i32) {
        for a in &mut self.cells {
            *a += rhs;
        }
    }
}

impl MulAssign<&Grid> for Grid {
    fn mul_assign(&mut self, rhs: &Grid) {
        self.assert_same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a *= b;
        }
    }
}

impl MulAssign<i32> for Grid {
    fn mul_assign(&mut self, rhs: i32) {
        for a in &mut self.cells {
            *a *= rhs;
        }
    }
}

impl Mul<i32> for &Grid {
    type Output = Grid;

    fn mul(self, rhs: i32) -> Grid {
        let mut out = self.clone();
        out *= rhs;
        out
    }
}

/// Integer dump with column letters on top and row numbers on the left,
/// rows numbered from the bottom as on a Go board.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = self
            .cells
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1)
            .max(2);

        write!(f, "   ")?;
        for x in 0..self.width {
            let letter = BOARD_LETTERS.get(x).map(|&b| b as char).unwrap_or('?');
            write!(f, " {letter:>cell_width$}")?;
        }
        writeln!(f)?;

        for y in 0..self.height {
            write!(f, "{:>2}|", self.height - y)?;
            for x in 0..self.width {
                write!(f, " {:>cell_width$}", self[Point::new(x, y)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[i32]]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let cells = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Grid::from_cells(width, height, cells).unwrap()
    }

    fn sorted(v: PointVec) -> Vec<Point> {
        let mut v = v.into_vec();
        v.sort();
        v
    }

    #[test]
    fn neighbors_are_clipped_at_edges() {
        let g = Grid::new(3, 3);
        assert_eq!(g.neighbors(Point::new(0, 0)).len(), 2);
        assert_eq!(g.neighbors(Point::new(1, 0)).len(), 3);
        assert_eq!(g.neighbors(Point::new(1, 1)).len(), 4);
        assert_eq!(g.corners(Point::new(0, 0)).as_slice(), &[Point::new(1, 1)]);
        assert_eq!(g.corners(Point::new(1, 0)).len(), 2);
        assert_eq!(g.corners(Point::new(1, 1)).len(), 4);
    }

    #[test]
    fn group_and_neighbors_in_one_pass() {
        let g = grid(&[
            &[1, 1, 0],
            &[0, 1, -1],
            &[0, 0, 1],
        ]);
        let (group, neighbors) = g.group_and_neighbors(Point::new(0, 0));
        assert_eq!(
            sorted(group),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]
        );
        assert_eq!(
            sorted(neighbors),
            vec![
                Point::new(2, 0),
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 2)
            ]
        );
        // the lone stone in the corner is not connected
        assert_eq!(g.group(Point::new(2, 2)).len(), 1);
    }

    #[test]
    fn trace_group_labels_destination() {
        let g = grid(&[&[0, 1], &[0, 0]]);
        let mut labels = Grid::new(2, 2);
        g.trace_group(Point::new(0, 0), &mut labels, 7);
        assert_eq!(labels.cells(), &[7, 0, 7, 7]);
    }

    #[test]
    fn predicates_and_reducers() {
        let g = grid(&[&[3, -5, 0], &[1, -1, 2]]);
        let all: Vec<Point> = g.points().collect();
        assert_eq!(g.sum(&all), 0);
        assert_eq!(g.total(), 0);
        assert_eq!(g.min(&all), Some(-5));
        assert_eq!(g.max(&all), Some(3));
        assert_eq!(g.dominant(&all), Some(-5));
        assert_eq!(g.dominant(&[]), None);
        assert_eq!(g.count_equal(&all, 0), 1);
        assert!(g.all_abs_le(&all, 5));
        assert!(g.any_abs_le(&all, 0));
        assert!(g.any_abs_ge(&all, 5));
        assert!(!g.all_abs_ge(&all, 1));
        assert!(g.all_abs_ge(&all[..2], 3));
        assert!(g.any_le(&all, -5));
        assert!(!g.any_le(&all, -6));
        assert!(g.any_ge(&all, 3));
        assert!(!g.any_ge(&all, 4));
        assert!(g.all_le(&all, 3));
        assert!(!g.all_le(&all, 2));
        assert!(g.all_ge(&all, -5));
        assert!(!g.all_ge(&all, 0));
        assert!(g.all_not_equal_to(&all, 4));
        assert!(!g.all_not_equal_to(&all, 2));
        assert!(!g.all_equal_to(&all, 0));
        assert_eq!(&g.matching(&all, 1)[..], &[Point::new(0, 1)]);
    }

    #[test]
    fn dominant_keeps_first_on_ties() {
        let g = grid(&[&[4, -4]]);
        assert_eq!(g.dominant(&[Point::new(0, 0), Point::new(1, 0)]), Some(4));
        assert_eq!(g.dominant(&[Point::new(1, 0), Point::new(0, 0)]), Some(-4));
    }

    #[test]
    fn elementwise_arithmetic() {
        let a = grid(&[&[1, -1], &[0, 2]]);
        let b = grid(&[&[3, 3], &[3, 3]]);
        let mut sum = a.clone();
        sum += &b;
        assert_eq!(sum.cells(), &[4, 2, 3, 5]);
        let mut product = a.clone();
        product *= &b;
        assert_eq!(product.cells(), &[3, -3, 0, 6]);
        assert_eq!((&a * 10).cells(), &[10, -10, 0, 20]);
        let mut shifted = a.clone();
        shifted += -2;
        assert_eq!(shifted.cells(), &[-1, -3, -2, 0]);
    }

    #[test]
    fn set_and_clear() {
        let mut g = Grid::new(3, 1);
        g.set(&[Point::new(0, 0), Point::new(2, 0)], 9);
        assert_eq!(g.cells(), &[9, 0, 9]);
        g.clear(-2);
        assert_eq!(g.cells(), &[-2, -2, -2]);
    }

    #[test]
    fn checked_get_rejects_off_board() {
        let g = Grid::new(2, 2);
        assert_eq!(g.get(Point::new(1, 1)), Some(0));
        assert_eq!(g.get(Point::new(2, 0)), None);
    }

    #[test]
    #[should_panic]
    fn index_does_not_wrap_into_next_row() {
        let g = Grid::new(2, 2);
        let _ = g[Point::new(2, 0)];
    }

    #[test]
    fn display_numbers_rows_from_bottom() {
        let g = grid(&[&[1, 0], &[0, -1]]);
        let text = g.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(lines[1].starts_with(" 2|"));
        assert!(lines[2].trim_end().ends_with("-1"));
    }
}
