// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sweep-line intersection engine.
//!
//! Walks the segments of every registered edge in lexicographic `(x, y)`
//! order, maintaining the set of segments pierced by the sweep line
//! ordered by their y coordinate at the sweep position. Newly adjacent
//! segments are tested for intersection; proper crossings become
//! scheduled events that split both segments at the (snapped) crossing
//! point. The pass canonicalizes every point it produces and reports
//! which points must be promoted to model vertices: crossing points,
//! endpoints touching another segment's interior, and polyline points
//! shared by two or more edges.
//!
//! Overlapping-collinear segments make the participating edges' senses
//! undecidable; they abort the run with
//! [`AmbiguousOrientation`](crate::Error::AmbiguousOrientation) before
//! the model is touched.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use poly_lite_model::{Coord, EdgeKey, Model, Point};

use crate::error::{Error, Result};
use crate::geom::{self, SegmentRelation};
use crate::registry::EdgeRegistry;

/// Canonical identifier of an arrangement point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub u32);

/// Interning registry mapping coordinates to canonical point ids.
///
/// Inserting the same coordinates twice yields the same id, so later
/// passes detect sharing instead of near-duplicates.
#[derive(Debug, Default)]
pub struct PointRegistry {
    index: FxHashMap<Point, PointId>,
    points: Vec<Point>,
}

impl PointRegistry {
    /// Returns the canonical id for `p`, interning it if new.
    pub fn intern(&mut self, p: Point) -> PointId {
        if let Some(&id) = self.index.get(&p) {
            return id;
        }
        let id = PointId(self.points.len() as u32);
        self.points.push(p);
        self.index.insert(p, id);
        id
    }

    /// Returns the id of `p` if it has been interned.
    pub fn lookup(&self, p: Point) -> Option<PointId> {
        self.index.get(&p).copied()
    }

    /// Returns the coordinates of an interned point.
    pub fn point(&self, id: PointId) -> Point {
        self.points[id.0 as usize]
    }

    /// Number of interned points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One polyline segment of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SegRef {
    edge: EdgeKey,
    seg: u32,
}

/// Kind of sweep event. The declaration order is the processing order
/// for events sharing a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    SegmentStart,
    SegmentEnd,
    SegmentCross,
}

/// A sweep event.
///
/// The derived `Ord` over the field sequence is the event comparator:
/// position (x then y), then kind, then the identity tie-breaks. Two
/// distinct events never compare equal, so a `BTreeSet` keyed by this
/// order is a strict event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SweepEvent {
    point: Point,
    kind: EventKind,
    seg: SegRef,
    other: SegRef,
}

impl SweepEvent {
    fn start(point: Point, seg: SegRef) -> Self {
        Self {
            point,
            kind: EventKind::SegmentStart,
            seg,
            other: SegRef {
                edge: EdgeKey::default(),
                seg: 0,
            },
        }
    }

    fn end(point: Point, seg: SegRef) -> Self {
        Self {
            point,
            kind: EventKind::SegmentEnd,
            seg,
            other: SegRef {
                edge: EdgeKey::default(),
                seg: 0,
            },
        }
    }

    fn cross(point: Point, a: SegRef, b: SegRef) -> Self {
        // Normalized so the same crossing always yields the same event.
        let (seg, other) = if a <= b { (a, b) } else { (b, a) };
        Self {
            point,
            kind: EventKind::SegmentCross,
            seg,
            other,
        }
    }
}

/// A segment currently pierced by the sweep line.
#[derive(Debug, Clone, Copy)]
struct Active {
    seg: SegRef,
    /// Lexicographic minimum endpoint (left, or bottom for verticals).
    lo: Point,
    /// Lexicographic maximum endpoint.
    hi: Point,
}

impl Active {
    /// y coordinate at sweep position `x` as a rational `(num, den)`,
    /// `den > 0`. Verticals report their entry y.
    fn y_at(&self, x: Coord) -> (i128, i128) {
        let dx = (self.hi.x - self.lo.x) as i128;
        if dx == 0 {
            (self.lo.y as i128, 1)
        } else {
            let num = self.lo.y as i128 * dx + (x - self.lo.x) as i128 * (self.hi.y - self.lo.y) as i128;
            (num, dx)
        }
    }

    fn is_vertical(&self) -> bool {
        self.lo.x == self.hi.x
    }
}

/// Active-order comparator at sweep position `x`: y at `x`, then slope
/// (so ties at a shared point order by position just right of it), then
/// identity.
fn cmp_active(a: &Active, b: &Active, x: Coord) -> std::cmp::Ordering {
    let (an, ad) = a.y_at(x);
    let (bn, bd) = b.y_at(x);
    (an * bd)
        .cmp(&(bn * ad))
        .then_with(|| {
            let adx = (a.hi.x - a.lo.x) as i128;
            let ady = (a.hi.y - a.lo.y) as i128;
            let bdx = (b.hi.x - b.lo.x) as i128;
            let bdy = (b.hi.y - b.lo.y) as i128;
            // cross > 0: a has the smaller slope, so a sits below b.
            (adx * bdy - ady * bdx).cmp(&0).reverse()
        })
        .then_with(|| a.seg.cmp(&b.seg))
}

/// One maximal run of an edge between branch points.
///
/// After subdivision these are the walkable units of loop discovery: an
/// edge crossed in its interior contributes one piece per side of each
/// crossing.
#[derive(Debug, Clone)]
pub struct Piece {
    pub edge: EdgeKey,
    pub points: Vec<Point>,
    pub start: PointId,
    pub end: PointId,
}

/// Result of the sweep pass: the refined planar subdivision.
#[derive(Debug, Default)]
pub struct Arrangement {
    pub points: PointRegistry,
    pub pieces: Vec<Piece>,
    /// Contiguous `pieces` index range per edge, in order along the edge.
    pub piece_ranges: FxHashMap<EdgeKey, (usize, usize)>,
    /// Points requiring vertex promotion, sorted.
    pub promoted: Vec<Point>,
    /// Edges cut into more than one piece, with their piece polylines.
    pub split_edges: Vec<(EdgeKey, Vec<Vec<Point>>)>,
}

/// Runs the sweep over every registered edge.
pub fn subdivide(model: &Model, registry: &EdgeRegistry) -> Result<Arrangement> {
    let mut polylines: FxHashMap<EdgeKey, Vec<Point>> = FxHashMap::default();
    let mut queue: BTreeSet<SweepEvent> = BTreeSet::new();
    // Every polyline point, with the edges meeting there.
    let mut occurrences: FxHashMap<Point, Vec<(EdgeKey, usize)>> = FxHashMap::default();

    for &edge in registry.edges() {
        let points = model
            .edge_points(edge)
            .map_err(|e| Error::MalformedEdge {
                edge: Some(edge),
                reason: e.to_string(),
            })?
            .to_vec();
        for (i, &p) in points.iter().enumerate() {
            // The periodic closure repeat is not a separate occurrence.
            if !(i + 1 == points.len() && p == points[0]) {
                occurrences.entry(p).or_default().push((edge, i));
            }
        }
        for (i, w) in points.windows(2).enumerate() {
            let seg = SegRef {
                edge,
                seg: i as u32,
            };
            let (lo, hi) = if w[0] <= w[1] {
                (w[0], w[1])
            } else {
                (w[1], w[0])
            };
            queue.insert(SweepEvent::start(lo, seg));
            queue.insert(SweepEvent::end(hi, seg));
        }
        polylines.insert(edge, points);
    }

    let mut active: Vec<Active> = Vec::new();
    let mut seen_crossings: FxHashSet<(SegRef, SegRef)> = FxHashSet::default();
    let mut splits: FxHashMap<SegRef, Vec<Point>> = FxHashMap::default();
    let mut hot: FxHashSet<Point> = FxHashSet::default();

    while let Some(event) = queue.pop_first() {
        match event.kind {
            EventKind::SegmentStart => {
                let entry = make_active(&polylines, event.seg);
                let x = event.point.x;
                let idx = active
                    .binary_search_by(|probe| cmp_active(probe, &entry, x))
                    .unwrap_or_else(|i| i);
                if entry.is_vertical() {
                    // A vertical segment lives at a single sweep x and can
                    // meet any active segment there, not just neighbors.
                    for other in active.iter() {
                        examine_pair(
                            &entry,
                            other,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                } else {
                    if idx > 0 {
                        let below = active[idx - 1];
                        examine_pair(
                            &entry,
                            &below,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                    if idx < active.len() {
                        let above = active[idx];
                        examine_pair(
                            &entry,
                            &above,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                    // Verticals keep their entry-y position in the
                    // active order, so one spanning this event's y can
                    // sit anywhere in the list; neighbor tests alone
                    // would miss it.
                    for i in 0..active.len() {
                        let other = active[i];
                        if other.is_vertical() && other.lo.x == x {
                            examine_pair(
                                &entry,
                                &other,
                                &mut queue,
                                &mut seen_crossings,
                                &mut splits,
                                &mut hot,
                            )?;
                        }
                    }
                }
                active.insert(idx, entry);
            }
            EventKind::SegmentEnd => {
                if let Some(idx) = active.iter().position(|a| a.seg == event.seg) {
                    active.remove(idx);
                    if idx > 0 && idx < active.len() {
                        let below = active[idx - 1];
                        let above = active[idx];
                        examine_pair(
                            &below,
                            &above,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                }
            }
            EventKind::SegmentCross => {
                let p = event.point;
                hot.insert(p);
                for seg in [event.seg, event.other] {
                    let (s0, s1) = segment_endpoints(&polylines, seg);
                    if p != s0 && p != s1 {
                        splits.entry(seg).or_default().push(p);
                    }
                }
                // Swap the crossing pair so the active order matches the
                // plane right of the crossing.
                let i = active.iter().position(|a| a.seg == event.seg);
                let j = active.iter().position(|a| a.seg == event.other);
                if let (Some(i), Some(j)) = (i, j) {
                    // A vertical holds its entry-y slot; swapping it
                    // would leave the list out of order. Pairs with a
                    // vertical are examined exhaustively at same-x
                    // events instead.
                    if active[i].is_vertical() || active[j].is_vertical() {
                        continue;
                    }
                    active.swap(i, j);
                    let (lo_i, hi_i) = (i.min(j), i.max(j));
                    if lo_i > 0 {
                        let below = active[lo_i - 1];
                        let here = active[lo_i];
                        examine_pair(
                            &below,
                            &here,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                    if hi_i + 1 < active.len() {
                        let here = active[hi_i];
                        let above = active[hi_i + 1];
                        examine_pair(
                            &here,
                            &above,
                            &mut queue,
                            &mut seen_crossings,
                            &mut splits,
                            &mut hot,
                        )?;
                    }
                }
            }
        }
    }

    // Polyline points shared by two or more edges, and self-touching
    // points of one edge, are branch points requiring promotion.
    for (point, occs) in &occurrences {
        // Two polyline occurrences at one point (whether from distinct
        // edges or a self-touching edge) make it a branch point.
        if occs.len() >= 2 {
            hot.insert(*point);
        }
    }

    debug!(
        split_segments = splits.len(),
        hot_points = hot.len(),
        "sweep complete"
    );

    build_arrangement(registry, &polylines, &splits, &hot)
}

fn make_active(polylines: &FxHashMap<EdgeKey, Vec<Point>>, seg: SegRef) -> Active {
    let (a, b) = segment_endpoints(polylines, seg);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Active { seg, lo, hi }
}

fn segment_endpoints(polylines: &FxHashMap<EdgeKey, Vec<Point>>, seg: SegRef) -> (Point, Point) {
    let pts = &polylines[&seg.edge];
    (pts[seg.seg as usize], pts[seg.seg as usize + 1])
}

/// Relates two active segments and reacts to the result: schedules
/// crossing events, records interior touches, or rejects collinear
/// overlaps.
fn examine_pair(
    a: &Active,
    b: &Active,
    queue: &mut BTreeSet<SweepEvent>,
    seen_crossings: &mut FxHashSet<(SegRef, SegRef)>,
    splits: &mut FxHashMap<SegRef, Vec<Point>>,
    hot: &mut FxHashSet<Point>,
) -> Result<()> {
    if a.seg == b.seg {
        return Ok(());
    }
    match geom::relate_segments(a.lo, a.hi, b.lo, b.hi) {
        SegmentRelation::Disjoint => {}
        SegmentRelation::Crossing(p) => {
            let pair = if a.seg <= b.seg {
                (a.seg, b.seg)
            } else {
                (b.seg, a.seg)
            };
            if seen_crossings.insert(pair) {
                debug!(?pair, point = %p, "crossing detected");
                queue.insert(SweepEvent::cross(p, a.seg, b.seg));
            }
        }
        SegmentRelation::Touching(p) => {
            for side in [a, b] {
                if p != side.lo && p != side.hi {
                    splits.entry(side.seg).or_default().push(p);
                    hot.insert(p);
                }
            }
        }
        SegmentRelation::CollinearOverlap(lo, hi) => {
            debug!(a = ?a.seg, b = ?b.seg, %lo, %hi, "collinear overlap");
            let (first, second) = if a.seg.edge <= b.seg.edge {
                (a.seg.edge, b.seg.edge)
            } else {
                (b.seg.edge, a.seg.edge)
            };
            return Err(Error::AmbiguousOrientation { first, second });
        }
    }
    Ok(())
}

/// Applies recorded splits to each edge's polyline and cuts the refined
/// polylines into pieces at endpoints and promoted points.
fn build_arrangement(
    registry: &EdgeRegistry,
    polylines: &FxHashMap<EdgeKey, Vec<Point>>,
    splits: &FxHashMap<SegRef, Vec<Point>>,
    hot: &FxHashSet<Point>,
) -> Result<Arrangement> {
    let mut arr = Arrangement::default();

    for &edge in registry.edges() {
        let points = &polylines[&edge];

        // Refined polyline: original points plus interior split points,
        // kept in order along the edge.
        let mut refined: Vec<Point> = Vec::with_capacity(points.len());
        for (i, w) in points.windows(2).enumerate() {
            refined.push(w[0]);
            if let Some(cuts) = splits.get(&SegRef {
                edge,
                seg: i as u32,
            }) {
                let mut cuts: Vec<Point> = cuts
                    .iter()
                    .copied()
                    .filter(|&p| p != w[0] && p != w[1])
                    .collect();
                // Order along the segment's own direction.
                if w[0] <= w[1] {
                    cuts.sort_unstable();
                } else {
                    cuts.sort_unstable_by(|x, y| y.cmp(x));
                }
                cuts.dedup();
                refined.extend(cuts);
            }
        }
        refined.push(*points.last().expect("polylines are non-empty"));

        // Cut at the first point, the last point, and every promoted
        // interior point.
        let last = refined.len() - 1;
        let mut cut_indices: Vec<usize> = vec![0];
        for (i, p) in refined.iter().enumerate().take(last).skip(1) {
            if hot.contains(p) {
                cut_indices.push(i);
            }
        }
        cut_indices.push(last);

        let begin = arr.pieces.len();
        let mut piece_polys: Vec<Vec<Point>> = Vec::new();
        for w in cut_indices.windows(2) {
            let poly: Vec<Point> = refined[w[0]..=w[1]].to_vec();
            let start = arr.points.intern(poly[0]);
            let end = arr.points.intern(poly[poly.len() - 1]);
            piece_polys.push(poly.clone());
            arr.pieces.push(Piece {
                edge,
                points: poly,
                start,
                end,
            });
        }
        arr.piece_ranges.insert(edge, (begin, arr.pieces.len()));
        if piece_polys.len() > 1 {
            arr.split_edges.push((edge, piece_polys));
        }
    }

    let mut promoted: Vec<Point> = hot.iter().copied().collect();
    promoted.sort_unstable();
    for &p in &promoted {
        arr.points.intern(p);
    }
    arr.promoted = promoted;
    Ok(arr)
}
