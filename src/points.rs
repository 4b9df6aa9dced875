//! Bounded point sequences.
//!
//! [`PointVec`] serves both as the worklist of flood fills and as the
//! candidate-move set of playouts. It never holds more than
//! [`MAX_AREA`] points: every producer in this crate pushes each board
//! point at most once per sequence, and boards are capped at
//! [`MAX_WIDTH`](crate::constants::MAX_WIDTH) x
//! [`MAX_HEIGHT`](crate::constants::MAX_HEIGHT).

use std::ops::Deref;

use crate::constants::MAX_AREA;
use crate::point::Point;

/// Ordered sequence of points with O(1) push and O(1) unordered removal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointVec {
    points: Vec<Point>,
}

impl PointVec {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, p: Point) {
        debug_assert!(self.points.len() < MAX_AREA, "PointVec overflow");
        self.points.push(p);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Removes the point at `idx`, filling the hole with the last point.
    #[inline]
    pub fn swap_remove(&mut self, idx: usize) -> Point {
        self.points.swap_remove(idx)
    }

    /// Moves every point of `other` onto the end of `self`, leaving `other` empty.
    pub fn append(&mut self, other: &mut PointVec) {
        debug_assert!(self.points.len() + other.len() <= MAX_AREA, "PointVec overflow");
        self.points.append(&mut other.points);
    }

    pub fn into_vec(self) -> Vec<Point> {
        self.points
    }
}

impl Deref for PointVec {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.points
    }
}

impl FromIterator<Point> for PointVec {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut out = PointVec::new();
        for p in iter {
            out.push(p);
        }
        out
    }
}

impl<'a> IntoIterator for &'a PointVec {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for PointVec {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut v: PointVec = (0..4).map(|x| Point::new(x, 0)).collect();
        let removed = v.swap_remove(1);
        assert_eq!(removed, Point::new(1, 0));
        assert_eq!(&v[..], &[Point::new(0, 0), Point::new(3, 0), Point::new(2, 0)]);
    }

    #[test]
    fn append_drains_other() {
        let mut a: PointVec = [Point::new(0, 0)].into_iter().collect();
        let mut b: PointVec = [Point::new(1, 1), Point::new(2, 2)].into_iter().collect();
        a.append(&mut b);
        assert_eq!(a.len(), 3);
        assert!(b.is_empty());
        assert!(a.contains(&Point::new(2, 2)));
    }
}
