// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loop discovery over the refined edge graph.
//!
//! Every edge piece contributes two directed uses, one per sense. At
//! each branch point the outgoing uses are ranked in counter-clockwise
//! angular order; the successor of a use arriving at a node is the
//! clockwise-next outgoing use from the reversed incoming direction.
//! That is the tightest-turn rule: each walk closes the smallest
//! possible loop, so no loop improperly spans multiple faces.
//!
//! Walking every directed use exactly once partitions them into closed
//! cycles. Cycles with positive signed area bound a face region and
//! become [`LoopCandidate`]s; negative cycles trace regions from their
//! unbounded side and are dropped (hole boundaries reappear when
//! nesting resolution parents one positive loop inside another).

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use poly_lite_model::{Coord, Point, Sense};

use crate::geom::{self, Bounds};
use crate::registry::{EdgeOrientationEntry, EdgeRegistry};
use crate::sweep::{Arrangement, PointId};

/// A closed walk over edge pieces, a candidate face boundary.
#[derive(Debug, Clone)]
pub struct LoopCandidate {
    /// Pieces in walk order with the sense each was traversed in.
    pub pieces: Vec<(usize, Sense)>,
    /// The walk's point sequence as an open ring.
    pub ring: Vec<Point>,
    pub bounds: Bounds,
    /// Twice the signed area; positive for every kept candidate.
    pub area2: i128,
    /// Every piece's edge permits the sense it was walked in.
    pub allows_forward: bool,
    /// Every piece's edge permits the opposite sense (hole emission).
    pub allows_reverse: bool,
    /// Direct holes, filled in by nesting resolution.
    pub children: Vec<usize>,
}

/// One directed use of a piece.
type DirectedUse = (usize, Sense);

/// Discovers all positive-area loops in the arrangement.
///
/// Candidates come back in a stable discovery order (piece index, then
/// positive before negative sense), which later stages use for
/// deterministic tie-breaks.
pub fn discover_loops(arr: &Arrangement, registry: &EdgeRegistry) -> Vec<LoopCandidate> {
    // Outgoing directed uses per node, in CCW angular order.
    let mut stars: FxHashMap<PointId, SmallVec<[DirectedUse; 4]>> = FxHashMap::default();
    for (i, piece) in arr.pieces.iter().enumerate() {
        stars.entry(piece.start).or_default().push((i, Sense::Positive));
        stars.entry(piece.end).or_default().push((i, Sense::Negative));
    }
    for (&node, star) in stars.iter_mut() {
        star.sort_by(|&a, &b| {
            geom::cmp_angle(outgoing_dir(arr, a), outgoing_dir(arr, b)).then_with(|| a.cmp(&b))
        });
        debug_assert!(!star.is_empty(), "node {node:?} has no outgoing uses");
    }

    // Per-piece orientation state, constraint inherited from the edge.
    let mut flags: Vec<EdgeOrientationEntry> = arr
        .pieces
        .iter()
        .map(|p| EdgeOrientationEntry::new(registry.constraint(p.edge)))
        .collect();

    let mut candidates = Vec::new();
    for start_piece in 0..arr.pieces.len() {
        for sense in [Sense::Positive, Sense::Negative] {
            if flags[start_piece].visited(sense) {
                continue;
            }
            let cycle = walk_cycle(arr, &stars, &mut flags, (start_piece, sense));
            let ring = cycle_ring(arr, &cycle);
            let area2 = geom::signed_area2(&ring);
            if area2 <= 0 {
                continue;
            }
            let allows_forward = cycle
                .iter()
                .all(|&(p, s)| registry.constraint(arr.pieces[p].edge).allows(s));
            let allows_reverse = cycle
                .iter()
                .all(|&(p, s)| registry.constraint(arr.pieces[p].edge).allows(s.reversed()));
            let bounds = Bounds::of_points(&ring).expect("cycle rings are non-empty");
            debug!(
                pieces = cycle.len(),
                area2, allows_forward, allows_reverse, "loop discovered"
            );
            candidates.push(LoopCandidate {
                pieces: cycle,
                ring,
                bounds,
                area2,
                allows_forward,
                allows_reverse,
                children: Vec::new(),
            });
        }
    }
    candidates
}

/// Walks one closed cycle starting from `start`, consuming each
/// directed use's visited flag as it goes.
fn walk_cycle(
    arr: &Arrangement,
    stars: &FxHashMap<PointId, SmallVec<[DirectedUse; 4]>>,
    flags: &mut [EdgeOrientationEntry],
    start: DirectedUse,
) -> Vec<DirectedUse> {
    let mut cycle = Vec::new();
    let mut current = start;
    loop {
        let fresh = flags[current.0].visit(current.1);
        debug_assert!(fresh, "directed use {current:?} consumed twice");
        cycle.push(current);

        let arrival = arrival_node(arr, current);
        let star = &stars[&arrival];
        let reversed = (current.0, current.1.reversed());
        let idx = star
            .iter()
            .position(|&d| d == reversed)
            .expect("rotation system contains the reversed use");
        // Clockwise-next from the reversed incoming direction: the
        // tightest turn that keeps the region on the left.
        let next = star[(idx + star.len() - 1) % star.len()];
        if next == start {
            break;
        }
        current = next;
    }
    cycle
}

/// End node of a directed use.
fn arrival_node(arr: &Arrangement, (piece, sense): DirectedUse) -> PointId {
    let p = &arr.pieces[piece];
    match sense {
        Sense::Positive => p.end,
        Sense::Negative => p.start,
    }
}

/// Initial direction of a directed use leaving its start node.
fn outgoing_dir(arr: &Arrangement, (piece, sense): DirectedUse) -> (Coord, Coord) {
    let pts = &arr.pieces[piece].points;
    let (a, b) = match sense {
        Sense::Positive => (pts[0], pts[1]),
        Sense::Negative => (pts[pts.len() - 1], pts[pts.len() - 2]),
    };
    (b.x - a.x, b.y - a.y)
}

/// Concatenates a cycle's piece polylines into an open ring.
fn cycle_ring(arr: &Arrangement, cycle: &[DirectedUse]) -> Vec<Point> {
    let mut ring = Vec::new();
    for &(piece, sense) in cycle {
        let pts = &arr.pieces[piece].points;
        match sense {
            Sense::Positive => ring.extend(pts[..pts.len() - 1].iter().copied()),
            Sense::Negative => ring.extend(pts[1..].iter().rev().copied()),
        }
    }
    ring
}
