// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for topology entities.
//!
//! Each entity is created through the model, which ensures referential
//! integrity (all referenced sub-entities must exist) and maintains the
//! canonicalization and adjacency indexes.

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::point::Point;

impl Model {
    /// Returns the vertex at `point`, creating it if none exists.
    ///
    /// The second tuple element is `true` when a new vertex was created.
    /// Calling this twice with the same coordinates yields the same key.
    pub fn find_or_create_vertex(&mut self, point: Point) -> (VertexKey, bool) {
        if let Some(&existing) = self.vertex_at.get(&point) {
            return (existing, false);
        }
        let key = self.vertices.insert(VertexData { point });
        self.vertex_at.insert(point, key);
        (key, true)
    }

    /// Creates an edge from an ordered polyline.
    ///
    /// The polyline must have at least two points and no zero-length
    /// segment. If the first and last points coincide the edge is
    /// periodic and gets no endpoint vertices; otherwise endpoint
    /// vertices are found or created and linked.
    pub fn add_edge(&mut self, points: Vec<Point>) -> Result<EdgeKey> {
        validate_polyline(&points)?;

        let endpoints = if points[0] == points[points.len() - 1] {
            None
        } else {
            let (start, _) = self.find_or_create_vertex(points[0]);
            let (end, _) = self.find_or_create_vertex(points[points.len() - 1]);
            Some((start, end))
        };

        let key = self.edges.insert(EdgeData { points, endpoints });
        if let Some((start, end)) = endpoints {
            self.link_vertex_edge(start, key);
            self.link_vertex_edge(end, key);
        }
        Ok(key)
    }

    /// Replaces an edge with a chain of pieces, returning the new keys.
    ///
    /// Used when interior points of an edge are promoted to vertices:
    /// the original edge is removed and one new edge is created per
    /// piece. The pieces must chain head-to-tail and cover the original
    /// edge's endpoints. Fails with [`Error::EdgeInUse`] if the edge
    /// already participates in edge uses.
    pub fn split_edge(&mut self, key: EdgeKey, pieces: &[Vec<Point>]) -> Result<Vec<EdgeKey>> {
        let (edge_first, edge_last, edge_endpoints) = {
            let edge = self.edges.get(key).ok_or(Error::EdgeNotFound(key))?;
            (edge.first_point(), edge.last_point(), edge.endpoints)
        };
        let uses = self.edge_use_count_for(key);
        if uses > 0 {
            return Err(Error::EdgeInUse(key, uses));
        }
        if pieces.is_empty() {
            return Err(Error::InvalidSplit(key, "no pieces supplied".into()));
        }
        for piece in pieces {
            validate_polyline(piece)?;
        }
        let first = pieces[0][0];
        let last = *pieces[pieces.len() - 1].last().expect("validated non-empty");
        if first != edge_first || last != edge_last {
            return Err(Error::InvalidSplit(
                key,
                format!("pieces span {first}..{last}, edge spans different endpoints"),
            ));
        }
        for i in 1..pieces.len() {
            let prev_end = *pieces[i - 1].last().expect("validated non-empty");
            if pieces[i][0] != prev_end {
                return Err(Error::InvalidSplit(
                    key,
                    format!("piece {i} does not start where piece {} ends", i - 1),
                ));
            }
        }

        // Unlink the original edge before inserting its pieces.
        if let Some((start, end)) = edge_endpoints {
            for v in [start, end] {
                if let Some(set) = self.vertex_to_edges.get_mut(&v) {
                    set.remove(&key);
                }
            }
        }
        self.edges.remove(key);

        let mut created = Vec::with_capacity(pieces.len());
        for piece in pieces {
            created.push(self.add_edge(piece.clone())?);
        }
        Ok(created)
    }

    /// Removes an unused edge, pruning endpoint vertices left with no
    /// remaining edges.
    pub fn remove_edge(&mut self, key: EdgeKey) -> Result<()> {
        let endpoints = self
            .edges
            .get(key)
            .ok_or(Error::EdgeNotFound(key))?
            .endpoints;
        let uses = self.edge_use_count_for(key);
        if uses > 0 {
            return Err(Error::EdgeInUse(key, uses));
        }
        self.edges.remove(key);
        if let Some((start, end)) = endpoints {
            for v in [start, end] {
                let orphaned = match self.vertex_to_edges.get_mut(&v) {
                    Some(set) => {
                        set.remove(&key);
                        set.is_empty()
                    }
                    None => true,
                };
                if orphaned {
                    self.vertex_to_edges.remove(&v);
                    if let Some(data) = self.vertices.remove(v) {
                        self.vertex_at.remove(&data.point);
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the edge use for `(edge, sense)`, creating it if needed.
    pub fn find_or_create_edge_use(&mut self, edge: EdgeKey, sense: Sense) -> Result<EdgeUseKey> {
        if !self.edges.contains_key(edge) {
            return Err(Error::EdgeNotFound(edge));
        }
        if let Some(&existing) = self.use_index.get(&(edge, sense)) {
            return Ok(existing);
        }
        let key = self.edge_uses.insert(EdgeUseData { edge, sense });
        self.use_index.insert((edge, sense), key);
        self.link_edge_use(edge, key);
        Ok(key)
    }

    /// Creates a loop from an ordered, closed chain of edge uses.
    ///
    /// Each edge use's end point (respecting its sense) must equal the
    /// next edge use's start point, and the last must close back onto
    /// the first.
    pub fn create_loop(&mut self, edge_uses: &[EdgeUseKey]) -> Result<LoopKey> {
        if edge_uses.is_empty() {
            return Err(Error::EmptyLoop);
        }
        let mut span = Vec::with_capacity(edge_uses.len());
        for &uk in edge_uses {
            let eu = self.edge_uses.get(uk).ok_or(Error::EdgeUseNotFound(uk))?;
            let edge = self.edges.get(eu.edge).ok_or(Error::EdgeNotFound(eu.edge))?;
            let (start, end) = match eu.sense {
                Sense::Positive => (edge.first_point(), edge.last_point()),
                Sense::Negative => (edge.last_point(), edge.first_point()),
            };
            span.push((start, end));
        }
        for i in 0..span.len() {
            let j = (i + 1) % span.len();
            if span[i].1 != span[j].0 {
                return Err(Error::DisconnectedLoop(j, i));
            }
        }
        Ok(self.loops.insert(LoopData {
            edge_uses: edge_uses.to_vec(),
        }))
    }

    /// Creates a face from an outer loop and zero or more hole loops.
    pub fn create_face(&mut self, outer_loop: LoopKey, inner_loops: &[LoopKey]) -> Result<FaceKey> {
        if !self.loops.contains_key(outer_loop) {
            return Err(Error::LoopNotFound(outer_loop));
        }
        for &lk in inner_loops {
            if !self.loops.contains_key(lk) {
                return Err(Error::LoopNotFound(lk));
            }
        }
        Ok(self.faces.insert(FaceData {
            outer_loop,
            inner_loops: inner_loops.to_vec(),
        }))
    }
}

fn validate_polyline(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::DegenerateEdge(points.len()));
    }
    for i in 1..points.len() {
        if points[i] == points[i - 1] {
            return Err(Error::ZeroLengthSegment(i - 1));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn vertex_canonicalization_is_idempotent() {
        let mut model = Model::new();
        let (a, created_a) = model.find_or_create_vertex(Point::new(3, 4));
        let (b, created_b) = model.find_or_create_vertex(Point::new(3, 4));
        assert_eq!(a, b);
        assert!(created_a);
        assert!(!created_b);
        assert_eq!(model.vertex_count(), 1);
    }

    #[test]
    fn add_edge_creates_endpoint_vertices() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (5, 0), (5, 5)])).unwrap();
        assert_eq!(model.vertex_count(), 2);
        let edge = model.edge(e).unwrap();
        assert!(!edge.is_periodic());
        let (start, end) = edge.endpoints.unwrap();
        assert_eq!(model.vertex(start).unwrap().point, Point::new(0, 0));
        assert_eq!(model.vertex(end).unwrap().point, Point::new(5, 5));
    }

    #[test]
    fn add_edge_shares_existing_vertices() {
        let mut model = Model::new();
        model.add_edge(pts(&[(0, 0), (5, 0)])).unwrap();
        model.add_edge(pts(&[(5, 0), (5, 5)])).unwrap();
        assert_eq!(model.vertex_count(), 3);
    }

    #[test]
    fn periodic_edge_has_no_endpoints() {
        let mut model = Model::new();
        let e = model
            .add_edge(pts(&[(0, 0), (4, 0), (2, 3), (0, 0)]))
            .unwrap();
        assert!(model.edge(e).unwrap().is_periodic());
        assert_eq!(model.vertex_count(), 0);
    }

    #[test]
    fn degenerate_polylines_rejected() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_edge(pts(&[(1, 1)])),
            Err(Error::DegenerateEdge(1))
        ));
        assert!(matches!(
            model.add_edge(pts(&[(1, 1), (1, 1)])),
            Err(Error::ZeroLengthSegment(0))
        ));
    }

    #[test]
    fn edge_use_canonicalization() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (2, 0)])).unwrap();
        let u1 = model.find_or_create_edge_use(e, Sense::Positive).unwrap();
        let u2 = model.find_or_create_edge_use(e, Sense::Positive).unwrap();
        let u3 = model.find_or_create_edge_use(e, Sense::Negative).unwrap();
        assert_eq!(u1, u2);
        assert_ne!(u1, u3);
        assert_eq!(model.edge_use_count(), 2);
        assert_eq!(model.edge_use_count_for(e), 2);
    }

    #[test]
    fn loop_closure_validated() {
        let mut model = Model::new();
        let e0 = model.add_edge(pts(&[(0, 0), (2, 0)])).unwrap();
        let e1 = model.add_edge(pts(&[(2, 0), (2, 2)])).unwrap();
        let e2 = model.add_edge(pts(&[(2, 2), (0, 0)])).unwrap();
        let uses: Vec<_> = [e0, e1, e2]
            .iter()
            .map(|&e| model.find_or_create_edge_use(e, Sense::Positive).unwrap())
            .collect();
        let lk = model.create_loop(&uses).unwrap();
        assert_eq!(model.loop_data(lk).unwrap().edge_uses.len(), 3);

        // Dropping the last edge use leaves the chain open.
        assert!(matches!(
            model.create_loop(&uses[..2]),
            Err(Error::DisconnectedLoop(0, 1))
        ));
    }

    #[test]
    fn face_requires_existing_loops() {
        let mut model = Model::new();
        let e = model
            .add_edge(pts(&[(0, 0), (3, 0), (3, 3), (0, 0)]))
            .unwrap();
        let u = model.find_or_create_edge_use(e, Sense::Positive).unwrap();
        let lk = model.create_loop(&[u]).unwrap();
        let fk = model.create_face(lk, &[]).unwrap();
        assert_eq!(model.face(fk).unwrap().outer_loop, lk);
        assert!(model.create_face(lk, &[LoopKey::default()]).is_err());
    }

    #[test]
    fn split_edge_replaces_with_pieces() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (4, 4)])).unwrap();
        let created = model
            .split_edge(e, &[pts(&[(0, 0), (2, 2)]), pts(&[(2, 2), (4, 4)])])
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(model.edge(e).is_none());
        assert_eq!(model.edge_count(), 2);
        // The cut point became a vertex via the new edges' endpoints.
        assert!(model.vertex_at(Point::new(2, 2)).is_some());
    }

    #[test]
    fn split_edge_rejects_bad_chains() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (4, 4)])).unwrap();
        let err = model.split_edge(e, &[pts(&[(0, 0), (1, 1)]), pts(&[(2, 2), (4, 4)])]);
        assert!(matches!(err, Err(Error::InvalidSplit(_, _))));
    }

    #[test]
    fn split_edge_rejects_used_edge() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (4, 4)])).unwrap();
        model.find_or_create_edge_use(e, Sense::Positive).unwrap();
        assert!(matches!(
            model.split_edge(e, &[pts(&[(0, 0), (4, 4)])]),
            Err(Error::EdgeInUse(_, 1))
        ));
    }

    #[test]
    fn remove_edge_prunes_orphaned_vertices() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (4, 4)])).unwrap();
        model.remove_edge(e).unwrap();
        assert_eq!(model.edge_count(), 0);
        assert_eq!(model.vertex_count(), 0);
        assert!(model.vertex_at(Point::new(0, 0)).is_none());
    }

    #[test]
    fn remove_edge_keeps_shared_vertices() {
        let mut model = Model::new();
        let a = model.add_edge(pts(&[(0, 0), (4, 0)])).unwrap();
        model.add_edge(pts(&[(4, 0), (4, 4)])).unwrap();
        model.remove_edge(a).unwrap();
        // (4, 0) still anchors the surviving edge; (0, 0) is gone.
        assert!(model.vertex_at(Point::new(4, 0)).is_some());
        assert!(model.vertex_at(Point::new(0, 0)).is_none());
        assert_eq!(model.vertex_count(), 2);
    }

    #[test]
    fn remove_edge_rejects_used_edge() {
        let mut model = Model::new();
        let e = model.add_edge(pts(&[(0, 0), (4, 4)])).unwrap();
        model.find_or_create_edge_use(e, Sense::Positive).unwrap();
        assert!(matches!(model.remove_edge(e), Err(Error::EdgeInUse(_, 1))));
        assert!(model.edge(e).is_some());
    }
}
