// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nesting resolution: arranges loop candidates into a containment
//! forest so even-depth loops become faces and odd-depth loops become
//! holes of their parents.
//!
//! Containment only matters between loops from different connected
//! components of the edge graph. Loops that share a piece are adjacent
//! regions of one component; the tightest-turn walk already keeps their
//! interiors disjoint, so they never parent each other. For the rest,
//! a bounding-box sweep narrows the candidates and an exact even-odd
//! point-in-polygon test settles each pair.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geom::{self, PointLoc};
use crate::loops::LoopCandidate;

/// Containment forest over loop candidates, indexed like the slice
/// passed to [`resolve_nesting`].
#[derive(Debug, Clone)]
pub struct NestingForest {
    /// Innermost containing loop of each candidate, if any.
    pub parents: Vec<Option<usize>>,
    /// Nesting depth; 0 for roots.
    pub depths: Vec<usize>,
    /// Candidates with no parent.
    pub roots: Vec<usize>,
}

/// Resolves containment among candidates and records each loop's direct
/// holes in its `children` list.
pub fn resolve_nesting(candidates: &mut [LoopCandidate]) -> Result<NestingForest> {
    let n = candidates.len();
    let piece_sets: Vec<FxHashSet<usize>> = candidates
        .iter()
        .map(|c| c.pieces.iter().map(|&(p, _)| p).collect())
        .collect();

    // Sweep candidates left to right by bounding-box minimum. A
    // container's minimum never sorts after its contents', so every
    // potential parent is active when its child arrives.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| (candidates[i].bounds.min, candidates[i].bounds.max));

    let mut parents: Vec<Option<usize>> = vec![None; n];
    let mut active: Vec<usize> = Vec::new();
    for &i in &order {
        let min_x = candidates[i].bounds.min.x;
        active.retain(|&a| candidates[a].bounds.max.x >= min_x);

        let mut parent: Option<usize> = None;
        for &a in &active {
            if !candidates[a].bounds.contains_bounds(&candidates[i].bounds) {
                continue;
            }
            if !piece_sets[a].is_disjoint(&piece_sets[i]) {
                continue;
            }
            if !contains_loop(&candidates[a], &candidates[i], a, i)? {
                continue;
            }
            // The innermost container is the smallest one.
            match parent {
                Some(p) if candidates[p].area2 <= candidates[a].area2 => {}
                _ => parent = Some(a),
            }
        }
        parents[i] = parent;
        active.push(i);
    }

    let mut depths = vec![0usize; n];
    let mut roots = Vec::new();
    for &i in &order {
        match parents[i] {
            Some(p) => {
                depths[i] = depths[p] + 1;
                candidates[p].children.push(i);
            }
            None => roots.push(i),
        }
    }
    debug!(loops = n, roots = roots.len(), "nesting resolved");
    Ok(NestingForest {
        parents,
        depths,
        roots,
    })
}

/// Tests whether `outer` contains `inner` by classifying `inner`'s
/// vertices against `outer`'s ring. Vertices on the ring itself are
/// inconclusive; interiors are disjoint, so any off-boundary vertex
/// decides for the whole loop.
fn contains_loop(
    outer: &LoopCandidate,
    inner: &LoopCandidate,
    outer_idx: usize,
    inner_idx: usize,
) -> Result<bool> {
    for &p in &inner.ring {
        match geom::point_in_ring(p, &outer.ring) {
            PointLoc::Inside => return Ok(true),
            PointLoc::Outside => return Ok(false),
            PointLoc::OnBoundary => continue,
        }
    }
    // Every vertex shared but no piece shared: the loops overlap in a
    // way the arrangement should have resolved.
    Err(Error::ConflictingLoops {
        first: outer_idx.min(inner_idx),
        second: outer_idx.max(inner_idx),
    })
}
