// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Each entity gets a unique, type-safe key for O(1) lookup in the
//! arena. Keys are created by `slotmap::SlotMap` and remain valid even
//! after other entities are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a vertex (a distinguished point of the model).
    pub struct VertexKey;

    /// Key for an edge (a polyline between two vertices, or periodic).
    pub struct EdgeKey;

    /// Key for an edge use (an edge traversed in one direction).
    pub struct EdgeUseKey;

    /// Key for a loop (a closed chain of edge uses).
    pub struct LoopKey;

    /// Key for a face (a region bounded by one outer loop and holes).
    pub struct FaceKey;
}

/// A key that can reference any model entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKey {
    Vertex(VertexKey),
    Edge(EdgeKey),
    EdgeUse(EdgeUseKey),
    Loop(LoopKey),
    Face(FaceKey),
}

impl From<VertexKey> for ModelKey {
    fn from(k: VertexKey) -> Self {
        ModelKey::Vertex(k)
    }
}

impl From<EdgeKey> for ModelKey {
    fn from(k: EdgeKey) -> Self {
        ModelKey::Edge(k)
    }
}

impl From<EdgeUseKey> for ModelKey {
    fn from(k: EdgeUseKey) -> Self {
        ModelKey::EdgeUse(k)
    }
}

impl From<LoopKey> for ModelKey {
    fn from(k: LoopKey) -> Self {
        ModelKey::Loop(k)
    }
}

impl From<FaceKey> for ModelKey {
    fn from(k: FaceKey) -> Self {
        ModelKey::Face(k)
    }
}
