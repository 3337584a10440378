// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face assembly: turns the nesting forest into model records.
//!
//! Assembly runs in two phases. Planning walks the forest, applies the
//! parity rule (even depth bounds a face, odd depth is a hole of its
//! parent) and checks orientation constraints, producing a list of face
//! plans without touching the model. Application then mutates the model
//! in a fixed order: promoted vertices, edge splits, then loops and
//! faces. A model error mid-application is reported together with how
//! much had already been applied.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use poly_lite_model::{EdgeKey, EdgeUseKey, FaceKey, Model, Sense, VertexKey};

use crate::error::{Error, Result};
use crate::loops::LoopCandidate;
use crate::nesting::NestingForest;
use crate::registry::EdgeRegistry;
use crate::sweep::Arrangement;

/// Everything a run added to the model, plus non-fatal diagnostics.
#[derive(Debug, Default)]
pub struct CreateFacesOutput {
    pub created_faces: Vec<FaceKey>,
    pub created_vertices: Vec<VertexKey>,
    pub created_edges: Vec<EdgeKey>,
    /// Human-readable notes about skipped loops.
    pub diagnostics: Vec<String>,
}

/// One face to materialize: an outer loop plus its direct holes, all
/// given as candidate indices.
#[derive(Debug)]
struct FacePlan {
    outer: usize,
    holes: Vec<usize>,
}

/// Materializes faces for the given nesting forest.
pub fn assemble(
    model: &mut Model,
    arr: &Arrangement,
    candidates: &[LoopCandidate],
    forest: &NestingForest,
    registry: &EdgeRegistry,
) -> Result<CreateFacesOutput> {
    let mut output = CreateFacesOutput::default();
    let plans = plan_faces(candidates, forest, &mut output.diagnostics)?;
    output.created_edges.extend(registry.created_edges.iter().copied());
    apply(model, arr, candidates, &plans, &mut output)?;
    debug!(
        faces = output.created_faces.len(),
        vertices = output.created_vertices.len(),
        edges = output.created_edges.len(),
        "assembly complete"
    );
    Ok(output)
}

fn plan_faces(
    candidates: &[LoopCandidate],
    forest: &NestingForest,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<FacePlan>> {
    let mut plans = Vec::new();
    // Each directed piece use may back at most one emitted loop.
    let mut emitted: FxHashSet<(usize, Sense)> = FxHashSet::default();

    for (i, candidate) in candidates.iter().enumerate() {
        if forest.depths[i] % 2 != 0 {
            continue;
        }
        if !candidate.allows_forward {
            diagnostics.push(format!(
                "loop {i} skipped: an edge forbids the orientation its face requires"
            ));
            warn!(loop_index = i, "skipping face with forbidden orientation");
            continue;
        }
        let mut holes = Vec::new();
        for &child in &candidate.children {
            if candidates[child].allows_reverse {
                holes.push(child);
            } else {
                diagnostics.push(format!(
                    "hole {child} of loop {i} skipped: an edge forbids the reversed orientation"
                ));
                warn!(loop_index = child, face = i, "skipping hole with forbidden orientation");
            }
        }

        for &(p, s) in &candidate.pieces {
            if !emitted.insert((p, s)) {
                return Err(Error::ConflictingLoops { first: i, second: i });
            }
        }
        for &h in &holes {
            for &(p, s) in &candidates[h].pieces {
                if !emitted.insert((p, s.reversed())) {
                    return Err(Error::ConflictingLoops { first: i, second: h });
                }
            }
        }
        plans.push(FacePlan { outer: i, holes });
    }
    Ok(plans)
}

fn apply(
    model: &mut Model,
    arr: &Arrangement,
    candidates: &[LoopCandidate],
    plans: &[FacePlan],
    output: &mut CreateFacesOutput,
) -> Result<()> {
    // Promote intersection and branch points to model vertices.
    for &p in &arr.promoted {
        let (key, created) = model.find_or_create_vertex(p);
        if created {
            output.created_vertices.push(key);
        }
    }

    // Replace each cut edge by its pieces, keyed back to piece indices.
    let mut piece_edge: Vec<EdgeKey> = arr.pieces.iter().map(|p| p.edge).collect();
    for (edge, polylines) in &arr.split_edges {
        let keys = model
            .split_edge(*edge, polylines)
            .map_err(|e| partial(output, e))?;
        let (start, end) = arr.piece_ranges[edge];
        debug_assert_eq!(keys.len(), end - start);
        for (slot, key) in piece_edge[start..end].iter_mut().zip(&keys) {
            *slot = *key;
        }
        output.created_edges.extend(keys);
    }

    for plan in plans {
        let outer = loop_of(model, candidates, &piece_edge, plan.outer, false)
            .map_err(|e| partial(output, e))?;
        let mut inner = Vec::with_capacity(plan.holes.len());
        for &h in &plan.holes {
            inner.push(loop_of(model, candidates, &piece_edge, h, true).map_err(|e| partial(output, e))?);
        }
        let face = model
            .create_face(outer, &inner)
            .map_err(|e| partial(output, e))?;
        output.created_faces.push(face);
    }
    Ok(())
}

/// Builds a model loop for one candidate. Holes are rewound: the walk
/// reversed piece by piece so the ring runs clockwise around the face
/// it punctures.
fn loop_of(
    model: &mut Model,
    candidates: &[LoopCandidate],
    piece_edge: &[EdgeKey],
    index: usize,
    as_hole: bool,
) -> poly_lite_model::Result<poly_lite_model::LoopKey> {
    let pieces = &candidates[index].pieces;
    let mut uses: Vec<EdgeUseKey> = Vec::with_capacity(pieces.len());
    if as_hole {
        for &(p, s) in pieces.iter().rev() {
            uses.push(model.find_or_create_edge_use(piece_edge[p], s.reversed())?);
        }
    } else {
        for &(p, s) in pieces.iter() {
            uses.push(model.find_or_create_edge_use(piece_edge[p], s)?);
        }
    }
    model.create_loop(&uses)
}

fn partial(output: &CreateFacesOutput, source: poly_lite_model::Error) -> Error {
    Error::PartialTopologyFailure {
        applied_vertices: output.created_vertices.len(),
        applied_edges: output.created_edges.len(),
        applied_faces: output.created_faces.len(),
        source,
    }
}
