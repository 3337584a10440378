// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model operations.

use crate::keys::{EdgeKey, EdgeUseKey, FaceKey, LoopKey, VertexKey};

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Vertex key not found in the arena.
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    /// Edge key not found in the arena.
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    /// Edge-use key not found in the arena.
    #[error("edge use not found: {0:?}")]
    EdgeUseNotFound(EdgeUseKey),

    /// Loop key not found in the arena.
    #[error("loop not found: {0:?}")]
    LoopNotFound(LoopKey),

    /// Face key not found in the arena.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// An edge must have at least two points.
    #[error("edge must have at least two points, got {0}")]
    DegenerateEdge(usize),

    /// Consecutive polyline points must be distinct.
    #[error("edge has a zero-length segment at index {0}")]
    ZeroLengthSegment(usize),

    /// A loop must have at least one edge use.
    #[error("loop must have at least one edge use")]
    EmptyLoop,

    /// Edge uses in a loop are not connected head-to-tail.
    #[error("loop is not closed: edge use {0} does not continue from edge use {1}")]
    DisconnectedLoop(usize, usize),

    /// An edge that still participates in edge uses cannot be replaced.
    #[error("edge {0:?} still has {1} edge uses")]
    EdgeInUse(EdgeKey, usize),

    /// Edge pieces handed to `split_edge` do not chain into the original.
    #[error("split pieces do not cover edge {0:?}: {1}")]
    InvalidSplit(EdgeKey, String),
}
