// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for face construction.
//!
//! Geometry-stage errors ([`Error::InvalidConfiguration`],
//! [`Error::MalformedEdge`], [`Error::AmbiguousOrientation`],
//! [`Error::ConflictingLoops`]) abort a run with no lasting model
//! state: edges created while resolving a `FromPointSequences` request
//! are removed again on the way out.
//! [`Error::PartialTopologyFailure`] is different: it is raised while
//! results are being written back, so the model may already hold some of
//! the run's vertices, edges, and faces — the caller must treat the
//! model as partially mutated.

use poly_lite_model::EdgeKey;

/// Result type alias for face-construction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during face construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unrecognized construction method or missing/inconsistent inputs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An input edge that cannot participate in face construction.
    ///
    /// `edge` is `None` when the offending polyline was supplied as a raw
    /// point sequence and no model edge exists for it yet.
    #[error("malformed edge {edge:?}: {reason}")]
    MalformedEdge {
        edge: Option<EdgeKey>,
        reason: String,
    },

    /// Overlapping-collinear geometry makes an edge's sense undecidable.
    ///
    /// `first == second` for a self-overlapping edge.
    #[error("ambiguous orientation: edges {first:?} and {second:?} overlap collinearly")]
    AmbiguousOrientation { first: EdgeKey, second: EdgeKey },

    /// Two loops whose containment cannot be decided.
    ///
    /// The indexes identify the loops in stable discovery order.
    #[error("conflicting loops {first} and {second}: containment is undecidable")]
    ConflictingLoops { first: usize, second: usize },

    /// Face-assembly side effects could not be fully applied.
    ///
    /// Unlike every other variant, the model has already been mutated;
    /// the counts say how far the apply phase got before failing.
    #[error(
        "partial topology failure after applying {applied_vertices} vertices, \
         {applied_edges} edges and {applied_faces} faces: {source}"
    )]
    PartialTopologyFailure {
        applied_vertices: usize,
        applied_edges: usize,
        applied_faces: usize,
        #[source]
        source: poly_lite_model::Error,
    },
}
