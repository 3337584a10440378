// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact geometric predicates over integer coordinates.
//!
//! Everything here computes in `i128` intermediates over `i64` inputs,
//! so no comparison ever goes through floating point. Intersection
//! points of two integer segments are rational; they are snapped to the
//! grid with deterministic round-half-away-from-zero division, which is
//! the one place a coordinate is not exact (off by at most half a grid
//! unit). Input coordinates are limited to [`MAX_COORD`] so the snap
//! arithmetic cannot overflow.

use poly_lite_model::{Coord, Point};

/// Largest permitted coordinate magnitude.
///
/// Keeps `coord * cross-product` terms within `i128` during
/// intersection snapping.
pub const MAX_COORD: Coord = 1 << 30;

/// Returns `true` if the point is within the permitted coordinate range.
pub fn in_coord_range(p: Point) -> bool {
    p.x.abs() <= MAX_COORD && p.y.abs() <= MAX_COORD
}

/// 2-D cross product of `(b - a)` and `(c - a)`.
pub fn cross(a: Point, b: Point, c: Point) -> i128 {
    let abx = (b.x - a.x) as i128;
    let aby = (b.y - a.y) as i128;
    let acx = (c.x - a.x) as i128;
    let acy = (c.y - a.y) as i128;
    abx * acy - aby * acx
}

/// Sign of the orientation of the triple `(a, b, c)`.
///
/// `+1` for counter-clockwise, `-1` for clockwise, `0` for collinear.
pub fn orient(a: Point, b: Point, c: Point) -> i32 {
    match cross(a, b, c) {
        n if n > 0 => 1,
        n if n < 0 => -1,
        _ => 0,
    }
}

/// Returns `true` if `p` lies on the closed segment `[s0, s1]`.
pub fn point_on_segment(p: Point, s0: Point, s1: Point) -> bool {
    orient(s0, s1, p) == 0
        && p.x >= s0.x.min(s1.x)
        && p.x <= s0.x.max(s1.x)
        && p.y >= s0.y.min(s1.y)
        && p.y <= s0.y.max(s1.y)
}

/// Integer division rounding half away from zero. `d` must be nonzero.
pub fn round_div(n: i128, d: i128) -> i128 {
    debug_assert!(d != 0);
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        -((2 * -n + d) / (2 * d))
    }
}

/// How two closed segments relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRelation {
    /// No shared point.
    Disjoint,
    /// Proper interior crossing at the carried (snapped) point.
    Crossing(Point),
    /// Exactly one shared point, an endpoint of at least one segment.
    Touching(Point),
    /// A positive-length shared collinear portion, lexicographic order.
    CollinearOverlap(Point, Point),
}

/// Classifies the relation between segments `[a0, a1]` and `[b0, b1]`.
pub fn relate_segments(a0: Point, a1: Point, b0: Point, b1: Point) -> SegmentRelation {
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);

    if d1 == 0 && d2 == 0 {
        // Collinear: lexicographic order along the common line is the
        // order along the line.
        let (alo, ahi) = minmax(a0, a1);
        let (blo, bhi) = minmax(b0, b1);
        let lo = alo.max(blo);
        let hi = ahi.min(bhi);
        return match lo.cmp(&hi) {
            std::cmp::Ordering::Greater => SegmentRelation::Disjoint,
            std::cmp::Ordering::Equal => SegmentRelation::Touching(lo),
            std::cmp::Ordering::Less => SegmentRelation::CollinearOverlap(lo, hi),
        };
    }

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return SegmentRelation::Crossing(intersection_point(a0, a1, b0, b1));
    }

    if d1 == 0 && point_on_segment(a0, b0, b1) {
        return SegmentRelation::Touching(a0);
    }
    if d2 == 0 && point_on_segment(a1, b0, b1) {
        return SegmentRelation::Touching(a1);
    }
    if d3 == 0 && point_on_segment(b0, a0, a1) {
        return SegmentRelation::Touching(b0);
    }
    if d4 == 0 && point_on_segment(b1, a0, a1) {
        return SegmentRelation::Touching(b1);
    }

    SegmentRelation::Disjoint
}

/// Exact intersection of two properly crossing segments, snapped to the
/// grid. Callers must have established a proper crossing first.
fn intersection_point(a0: Point, a1: Point, b0: Point, b1: Point) -> Point {
    let rx = (a1.x - a0.x) as i128;
    let ry = (a1.y - a0.y) as i128;
    let sx = (b1.x - b0.x) as i128;
    let sy = (b1.y - b0.y) as i128;
    let den = rx * sy - ry * sx;
    debug_assert!(den != 0);
    let qpx = (b0.x - a0.x) as i128;
    let qpy = (b0.y - a0.y) as i128;
    let t_num = qpx * sy - qpy * sx;
    let x = round_div(a0.x as i128 * den + t_num * rx, den);
    let y = round_div(a0.y as i128 * den + t_num * ry, den);
    Point::new(x as Coord, y as Coord)
}

fn minmax(a: Point, b: Point) -> (Point, Point) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Twice the signed area of a closed polygon (positive for CCW).
///
/// The polygon is given as an open ring; the closing segment back to
/// the first point is implicit.
pub fn signed_area2(ring: &[Point]) -> i128 {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let mut area = 0i128;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        area += p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128;
    }
    area
}

/// Where a point sits relative to a closed polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLoc {
    Inside,
    Outside,
    OnBoundary,
}

/// Even-odd point-in-polygon test, exact.
///
/// The polygon is an open ring (closing segment implicit). Points on
/// the boundary are reported as [`PointLoc::OnBoundary`], never as
/// inside or outside.
pub fn point_in_ring(p: Point, ring: &[Point]) -> PointLoc {
    let n = ring.len();
    if n < 3 {
        return PointLoc::Outside;
    }
    let mut crossings = 0usize;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if a == b {
            continue;
        }
        if point_on_segment(p, a, b) {
            return PointLoc::OnBoundary;
        }
        // Half-open ray rule: count edges whose y-span straddles p.y.
        if (a.y > p.y) != (b.y > p.y) {
            // Sign of (edge x at p.y minus p.x), scaled by (b.y - a.y).
            let c = (b.x - a.x) as i128 * (p.y - a.y) as i128
                - (p.x - a.x) as i128 * (b.y - a.y) as i128;
            let hit = if b.y > a.y { c > 0 } else { c < 0 };
            if hit {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        PointLoc::Inside
    } else {
        PointLoc::Outside
    }
}

/// Axis-aligned bounding box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounding box of a non-empty point set.
    pub fn of_points(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for &p in &points[1..] {
            b.expand(p);
        }
        Some(b)
    }

    /// Grows the box to include `p`.
    pub fn expand(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns `true` if `other` lies entirely within this box.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }
}

/// Ascending counter-clockwise angular order of nonzero directions,
/// starting from the positive x axis.
///
/// Collinear same-direction vectors compare equal; callers needing a
/// total order add their own identity tie-break.
pub fn cmp_angle(a: (Coord, Coord), b: (Coord, Coord)) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let half = |d: (Coord, Coord)| -> u8 {
        // Half 0 covers [0, pi): +x axis inclusive, -x axis exclusive.
        if d.1 > 0 || (d.1 == 0 && d.0 > 0) {
            0
        } else {
            1
        }
    };
    let (ha, hb) = (half(a), half(b));
    if ha != hb {
        return ha.cmp(&hb);
    }
    let c = a.0 as i128 * b.1 as i128 - a.1 as i128 * b.0 as i128;
    match c {
        n if n > 0 => Ordering::Less,
        n if n < 0 => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
