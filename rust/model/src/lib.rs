// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar topological model with exact integer coordinates.
//!
//! The [`Model`] arena owns every topological entity of a 2-D model:
//! vertices, edges (polylines), edge uses (an edge traversed in a
//! direction), loops (closed chains of edge uses), and faces (an outer
//! loop plus hole loops). Entities are addressed by stable generational
//! keys; callers hold keys, never references, so there is no lifetime
//! coupling between the model and code operating on it.
//!
//! Coordinates are `i64` ([`Coord`]); every geometric comparison made on
//! top of this model can therefore be exact.

pub mod arena;
pub mod construction;
pub mod error;
pub mod keys;
pub mod point;

pub use arena::{EdgeData, EdgeUseData, FaceData, LoopData, Model, Sense, VertexData};
pub use error::{Error, Result};
pub use keys::{EdgeKey, EdgeUseKey, FaceKey, LoopKey, ModelKey, VertexKey};
pub use point::{Coord, Point};
