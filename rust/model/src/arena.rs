// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for planar topology entities.
//!
//! The [`Model`] is the central owner of all topology data. Every entity
//! (vertex, edge, edge use, loop, face) lives inside slot maps with
//! stable, generational keys. Point and edge-use indexes keep lookups
//! canonical: the same coordinates always resolve to the same vertex,
//! and `(edge, sense)` always resolves to the same edge use.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::keys::*;
use crate::point::Point;

/// The direction in which an edge is traversed by an edge use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sense {
    /// First polyline point to last.
    Positive,
    /// Last polyline point to first.
    Negative,
}

impl Sense {
    /// Returns the opposite traversal direction.
    pub fn reversed(self) -> Self {
        match self {
            Sense::Positive => Sense::Negative,
            Sense::Negative => Sense::Positive,
        }
    }

    /// Returns `true` for [`Sense::Positive`].
    pub fn is_positive(self) -> bool {
        matches!(self, Sense::Positive)
    }
}

/// Data stored for a vertex: a distinguished model point.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point,
}

/// Data stored for an edge: a non-empty polyline.
///
/// `endpoints` is `None` for a periodic (closed) edge, in which case the
/// first and last polyline points coincide.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub points: Vec<Point>,
    pub endpoints: Option<(VertexKey, VertexKey)>,
}

impl EdgeData {
    /// Returns `true` if the edge is periodic (closed, no endpoint vertices).
    pub fn is_periodic(&self) -> bool {
        self.endpoints.is_none()
    }

    /// First polyline point.
    pub fn first_point(&self) -> Point {
        self.points[0]
    }

    /// Last polyline point.
    pub fn last_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// Data stored for an edge use: an edge traversed in one direction.
#[derive(Debug, Clone, Copy)]
pub struct EdgeUseData {
    pub edge: EdgeKey,
    pub sense: Sense,
}

/// Data stored for a loop: a closed, ordered chain of edge uses.
#[derive(Debug, Clone)]
pub struct LoopData {
    pub edge_uses: Vec<EdgeUseKey>,
}

/// Data stored for a face: one outer loop plus zero or more hole loops.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub outer_loop: LoopKey,
    pub inner_loops: Vec<LoopKey>,
}

/// The central arena that owns all topology entities and their indexes.
///
/// # Example
///
/// ```
/// use poly_lite_model::{Model, Point};
///
/// let mut model = Model::new();
/// let e = model
///     .add_edge(vec![Point::new(0, 0), Point::new(10, 0)])
///     .unwrap();
/// assert_eq!(model.edge_points(e).unwrap().len(), 2);
/// assert_eq!(model.vertex_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Model {
    // Entity storage
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) edge_uses: SlotMap<EdgeUseKey, EdgeUseData>,
    pub(crate) loops: SlotMap<LoopKey, LoopData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,

    // Canonicalization indexes
    pub(crate) vertex_at: FxHashMap<Point, VertexKey>,
    pub(crate) use_index: FxHashMap<(EdgeKey, Sense), EdgeUseKey>,

    // Upward adjacency: child → parents
    pub(crate) vertex_to_edges: FxHashMap<VertexKey, FxHashSet<EdgeKey>>,
    pub(crate) edge_to_uses: FxHashMap<EdgeKey, FxHashSet<EdgeUseKey>>,
}

impl Model {
    /// Creates a new, empty model.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex queries ---

    /// Returns the vertex data for the given key, or `None` if not found.
    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    /// Returns the vertex at exactly the given point, if any.
    pub fn vertex_at(&self, point: Point) -> Option<VertexKey> {
        self.vertex_at.get(&point).copied()
    }

    /// Returns the number of vertices in the model.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the edges incident to a vertex.
    pub fn edges_at_vertex(&self, key: VertexKey) -> impl Iterator<Item = EdgeKey> + '_ {
        self.vertex_to_edges
            .get(&key)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    // --- Edge queries ---

    /// Returns the edge data for the given key, or `None` if not found.
    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    /// Returns the ordered polyline of an edge.
    pub fn edge_points(&self, key: EdgeKey) -> crate::Result<&[Point]> {
        self.edges
            .get(key)
            .map(|e| e.points.as_slice())
            .ok_or(crate::Error::EdgeNotFound(key))
    }

    /// Returns the number of edges in the model.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all edge keys.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.keys()
    }

    /// Returns the number of edge uses referencing an edge.
    pub fn edge_use_count_for(&self, key: EdgeKey) -> usize {
        self.edge_to_uses.get(&key).map_or(0, |set| set.len())
    }

    // --- Edge-use queries ---

    /// Returns the edge-use data for the given key, or `None` if not found.
    pub fn edge_use(&self, key: EdgeUseKey) -> Option<&EdgeUseData> {
        self.edge_uses.get(key)
    }

    /// Returns the existing edge use for `(edge, sense)`, if any.
    pub fn edge_use_of(&self, edge: EdgeKey, sense: Sense) -> Option<EdgeUseKey> {
        self.use_index.get(&(edge, sense)).copied()
    }

    /// Returns the number of edge uses in the model.
    pub fn edge_use_count(&self) -> usize {
        self.edge_uses.len()
    }

    // --- Loop / face queries ---

    /// Returns the loop data for the given key, or `None` if not found.
    pub fn loop_data(&self, key: LoopKey) -> Option<&LoopData> {
        self.loops.get(key)
    }

    /// Returns the number of loops in the model.
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Returns the face data for the given key, or `None` if not found.
    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    /// Returns the number of faces in the model.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the given key references a valid entity.
    pub fn contains(&self, key: ModelKey) -> bool {
        match key {
            ModelKey::Vertex(k) => self.vertices.contains_key(k),
            ModelKey::Edge(k) => self.edges.contains_key(k),
            ModelKey::EdgeUse(k) => self.edge_uses.contains_key(k),
            ModelKey::Loop(k) => self.loops.contains_key(k),
            ModelKey::Face(k) => self.faces.contains_key(k),
        }
    }

    // --- Adjacency index helpers ---

    /// Register that an edge uses a vertex (upward adjacency).
    pub(crate) fn link_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) {
        self.vertex_to_edges.entry(vertex).or_default().insert(edge);
    }

    /// Register that an edge use references an edge (upward adjacency).
    pub(crate) fn link_edge_use(&mut self, edge: EdgeKey, edge_use: EdgeUseKey) {
        self.edge_to_uses.entry(edge).or_default().insert(edge_use);
    }
}
