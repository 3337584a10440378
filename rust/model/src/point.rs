// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact integer coordinates.
//!
//! All model geometry lives on an integer grid. Callers scale world
//! coordinates into `Coord` units before building a model; in exchange,
//! every predicate downstream (event ordering, intersection tests,
//! containment) is exact and deterministic. Floating point never enters
//! a comparison.

use std::fmt;

/// Coordinate type for all model geometry.
pub type Coord = i64;

/// An immutable 2-D point on the integer grid.
///
/// The derived `Ord` is lexicographic by `(x, y)`, which is exactly the
/// sweep order used by the face-construction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    /// Creates a point from integer coordinates.
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order() {
        assert!(Point::new(0, 5) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
        assert_eq!(Point::new(2, 3), Point::new(2, 3));
    }

    #[test]
    fn display() {
        assert_eq!(Point::new(-4, 7).to_string(), "(-4, 7)");
    }
}
