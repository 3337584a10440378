// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge registry and orientation map.
//!
//! The registry resolves a [`ConstructionMethod`] into the set of model
//! edges eligible for face construction, each tagged with the
//! orientations in which it may bound a face. Constraining orientations
//! is what lets callers hand in oriented outer/inner contours without
//! the engine filling the holes back in.

use rustc_hash::FxHashMap;

use poly_lite_model::{Coord, EdgeKey, Model, Point, Sense};

use crate::error::{Error, Result};
use crate::geom;

/// Which traversal directions of an edge may bound a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationConstraint {
    /// Either direction.
    #[default]
    Any,
    /// Only first-to-last traversal.
    PositiveOnly,
    /// Only last-to-first traversal.
    NegativeOnly,
}

impl OrientationConstraint {
    /// Returns `true` if `sense` is a permitted traversal direction.
    pub fn allows(self, sense: Sense) -> bool {
        match self {
            OrientationConstraint::Any => true,
            OrientationConstraint::PositiveOnly => sense.is_positive(),
            OrientationConstraint::NegativeOnly => !sense.is_positive(),
        }
    }
}

/// Per-edge orientation state: the allowed directions plus one visited
/// flag per direction.
///
/// A visited flag can be set at most once per run; an orientation
/// consumed into a loop can never be consumed again, which is the
/// mechanism preventing a face from double-covering an edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeOrientationEntry {
    pub constraint: OrientationConstraint,
    visited: [bool; 2],
}

impl EdgeOrientationEntry {
    /// A fresh, unvisited entry.
    pub fn new(constraint: OrientationConstraint) -> Self {
        Self {
            constraint,
            visited: [false; 2],
        }
    }

    /// Returns `true` if `sense` is a permitted traversal direction.
    pub fn allows(&self, sense: Sense) -> bool {
        self.constraint.allows(sense)
    }

    /// Returns `true` if the given orientation has been consumed.
    pub fn visited(&self, sense: Sense) -> bool {
        self.visited[slot(sense)]
    }

    /// Consumes an orientation. Returns `false` if it was already
    /// consumed (the caller must not reuse it).
    pub fn visit(&mut self, sense: Sense) -> bool {
        let slot = &mut self.visited[slot(sense)];
        if *slot {
            return false;
        }
        *slot = true;
        true
    }
}

fn slot(sense: Sense) -> usize {
    match sense {
        Sense::Negative => 0,
        Sense::Positive => 1,
    }
}

/// How the caller specifies the edges to build faces from.
#[derive(Debug, Clone)]
pub enum ConstructionMethod {
    /// Raw point sequences, turned into new model edges first.
    ///
    /// `coordinates` holds interleaved `x, y` pairs; `offsets[i]` is the
    /// pair index at which sequence `i` begins, with sequence `i`
    /// running to `offsets[i + 1]` (or the end of `coordinates`).
    /// Sequences are taken as oriented, so the created edges are
    /// constrained positive-only.
    FromPointSequences {
        coordinates: Vec<Coord>,
        offsets: Vec<usize>,
    },
    /// An explicit set of existing edges with per-edge constraints.
    FromExistingEdges {
        edges: Vec<(EdgeKey, OrientationConstraint)>,
    },
    /// Every edge currently in the model, unconstrained.
    AllNonOverlapping,
}

/// The resolved set of eligible edges for one run.
#[derive(Debug, Default)]
pub struct EdgeRegistry {
    entries: FxHashMap<EdgeKey, EdgeOrientationEntry>,
    /// Deterministic iteration order (hash-map order is not).
    order: Vec<EdgeKey>,
    /// Edges created while consuming `FromPointSequences` input.
    pub created_edges: Vec<EdgeKey>,
}

impl EdgeRegistry {
    /// Resolves a construction method against the model.
    ///
    /// `FromPointSequences` creates its edges through the model before
    /// face construction proceeds; the other methods only read.
    pub fn build(model: &mut Model, method: &ConstructionMethod) -> Result<Self> {
        match method {
            ConstructionMethod::FromPointSequences {
                coordinates,
                offsets,
            } => Self::from_point_sequences(model, coordinates, offsets),
            ConstructionMethod::FromExistingEdges { edges } => {
                Self::from_existing_edges(model, edges)
            }
            ConstructionMethod::AllNonOverlapping => Self::from_all_edges(model),
        }
    }

    fn from_point_sequences(
        model: &mut Model,
        coordinates: &[Coord],
        offsets: &[usize],
    ) -> Result<Self> {
        if coordinates.len() % 2 != 0 {
            return Err(Error::InvalidConfiguration(format!(
                "coordinate array holds {} values, expected x,y pairs",
                coordinates.len()
            )));
        }
        let pair_count = coordinates.len() / 2;
        if pair_count == 0 {
            if offsets.is_empty() {
                return Ok(Self::default());
            }
            return Err(Error::InvalidConfiguration(
                "offsets supplied without coordinates".into(),
            ));
        }
        if offsets.first() != Some(&0) {
            return Err(Error::InvalidConfiguration(
                "offsets must start at pair index 0".into(),
            ));
        }
        for w in offsets.windows(2) {
            if w[1] <= w[0] {
                return Err(Error::InvalidConfiguration(
                    "offsets must be strictly increasing".into(),
                ));
            }
        }
        if *offsets.last().expect("checked non-empty") >= pair_count {
            return Err(Error::InvalidConfiguration(
                "offset beyond end of coordinate array".into(),
            ));
        }

        // Validate every sequence before mutating the model, so a bad
        // sequence aborts the run with nothing created.
        let mut sequences = Vec::with_capacity(offsets.len());
        for (i, &start) in offsets.iter().enumerate() {
            let end = offsets.get(i + 1).copied().unwrap_or(pair_count);
            let points: Vec<Point> = (start..end)
                .map(|pi| Point::new(coordinates[2 * pi], coordinates[2 * pi + 1]))
                .collect();
            if points.len() < 2 {
                return Err(Error::MalformedEdge {
                    edge: None,
                    reason: format!("point sequence {i} has {} points", points.len()),
                });
            }
            for &p in &points {
                check_coord_range(None, p)?;
            }
            for (si, w) in points.windows(2).enumerate() {
                if w[0] == w[1] {
                    return Err(Error::MalformedEdge {
                        edge: None,
                        reason: format!("point sequence {i} repeats a point at index {si}"),
                    });
                }
            }
            sequences.push(points);
        }

        let mut registry = Self::default();
        for points in sequences {
            let key = model.add_edge(points).map_err(|e| Error::MalformedEdge {
                edge: None,
                reason: e.to_string(),
            })?;
            registry.insert(key, OrientationConstraint::PositiveOnly);
            registry.created_edges.push(key);
        }
        Ok(registry)
    }

    fn from_existing_edges(
        model: &Model,
        edges: &[(EdgeKey, OrientationConstraint)],
    ) -> Result<Self> {
        let mut registry = Self::default();
        for &(key, constraint) in edges {
            if registry.entries.contains_key(&key) {
                return Err(Error::InvalidConfiguration(format!(
                    "edge {key:?} listed more than once"
                )));
            }
            let edge = model
                .edge(key)
                .ok_or_else(|| Error::InvalidConfiguration(format!("unknown edge {key:?}")))?;
            validate_edge_geometry(key, edge.points.as_slice())?;
            registry.insert(key, constraint);
        }
        Ok(registry)
    }

    fn from_all_edges(model: &Model) -> Result<Self> {
        let mut keys: Vec<EdgeKey> = model.edge_keys().collect();
        keys.sort_unstable();
        let mut registry = Self::default();
        for key in keys {
            let points = model.edge_points(key).expect("key from iteration");
            validate_edge_geometry(key, points)?;
            registry.insert(key, OrientationConstraint::Any);
        }
        Ok(registry)
    }

    fn insert(&mut self, key: EdgeKey, constraint: OrientationConstraint) {
        self.entries.insert(key, EdgeOrientationEntry::new(constraint));
        self.order.push(key);
    }

    /// Returns `true` if no edges were selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered edges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The registered edges in deterministic order.
    pub fn edges(&self) -> &[EdgeKey] {
        &self.order
    }

    /// The orientation entry for an edge, if registered.
    pub fn entry(&self, key: EdgeKey) -> Option<&EdgeOrientationEntry> {
        self.entries.get(&key)
    }

    /// The orientation constraint for an edge (`Any` if unregistered).
    pub fn constraint(&self, key: EdgeKey) -> OrientationConstraint {
        self.entries
            .get(&key)
            .map(|e| e.constraint)
            .unwrap_or_default()
    }
}

fn validate_edge_geometry(key: EdgeKey, points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::MalformedEdge {
            edge: Some(key),
            reason: format!("edge has {} points", points.len()),
        });
    }
    for &p in points {
        check_coord_range(Some(key), p)?;
    }
    Ok(())
}

fn check_coord_range(edge: Option<EdgeKey>, p: Point) -> Result<()> {
    if !geom::in_coord_range(p) {
        return Err(Error::MalformedEdge {
            edge,
            reason: format!("coordinate {p} outside +/-{}", geom::MAX_COORD),
        });
    }
    Ok(())
}
