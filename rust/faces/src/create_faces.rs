// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The face-construction operation, end to end.

use tracing::{debug, warn};

use poly_lite_model::Model;

use crate::assembly::{self, CreateFacesOutput};
use crate::error::{Error, Result};
use crate::loops;
use crate::nesting;
use crate::registry::{ConstructionMethod, EdgeRegistry};
use crate::sweep;

/// Builds faces from a model's edges.
///
/// The operation selects candidate edges according to its
/// [`ConstructionMethod`], intersects them exactly, walks the resulting
/// piece graph into loops, nests the loops, and records faces with
/// holes in the model. See the crate docs for the full pipeline.
#[derive(Debug, Clone)]
pub struct CreateFaces {
    method: ConstructionMethod,
}

impl CreateFaces {
    pub fn new(method: ConstructionMethod) -> Self {
        Self { method }
    }

    /// Runs the operation against `model`.
    ///
    /// On success the model gains the discovered faces plus any
    /// vertices and edges the intersection pass had to introduce; the
    /// returned [`CreateFacesOutput`] lists them all. On error the
    /// model is untouched unless the error is
    /// [`PartialTopologyFailure`](crate::Error::PartialTopologyFailure),
    /// which reports how far application got.
    pub fn run(&self, model: &mut Model) -> Result<CreateFacesOutput> {
        let registry = EdgeRegistry::build(model, &self.method)?;
        if registry.is_empty() {
            debug!("no candidate edges, nothing to do");
            return Ok(CreateFacesOutput::default());
        }
        debug!(edges = registry.len(), "candidate edges selected");

        let result = Self::construct(model, &registry);
        if let Err(err) = &result {
            if !matches!(err, Error::PartialTopologyFailure { .. }) {
                discard_created_edges(model, &registry);
            }
        }
        result
    }

    fn construct(model: &mut Model, registry: &EdgeRegistry) -> Result<CreateFacesOutput> {
        let arrangement = sweep::subdivide(model, registry)?;
        let mut candidates = loops::discover_loops(&arrangement, registry);
        let forest = nesting::resolve_nesting(&mut candidates)?;
        assembly::assemble(model, &arrangement, &candidates, &forest, registry)
    }
}

/// Takes back edges created while resolving `FromPointSequences`, so a
/// run that fails before mutating anything else leaves no trace.
fn discard_created_edges(model: &mut Model, registry: &EdgeRegistry) {
    for &edge in &registry.created_edges {
        if let Err(err) = model.remove_edge(edge) {
            warn!(%err, ?edge, "could not discard edge after failed run");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poly_lite_model::Point;

    #[test]
    fn empty_model_is_a_no_op() {
        let mut model = Model::new();
        let out = CreateFaces::new(ConstructionMethod::AllNonOverlapping)
            .run(&mut model)
            .unwrap();
        assert!(out.created_faces.is_empty());
        assert!(out.diagnostics.is_empty());
        assert_eq!(model.face_count(), 0);
    }

    #[test]
    fn open_edge_produces_no_faces() {
        let mut model = Model::new();
        model
            .add_edge(vec![Point::new(0, 0), Point::new(5, 1)])
            .unwrap();
        let out = CreateFaces::new(ConstructionMethod::AllNonOverlapping)
            .run(&mut model)
            .unwrap();
        assert!(out.created_faces.is_empty());
        assert_eq!(model.edge_count(), 1);
    }
}
