// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face construction over a planar edge model.
//!
//! Given a [`Model`](poly_lite_model::Model) holding polyline edges,
//! [`CreateFaces`] discovers every bounded region those edges enclose
//! and records it as a face, with holes where regions nest. All
//! geometry is exact `i64` arithmetic; no tolerance parameters exist.
//!
//! The pipeline:
//!
//! 1. [`registry`] selects candidate edges per the chosen
//!    [`ConstructionMethod`] and fixes each edge's allowed orientations.
//! 2. [`sweep`] runs a plane sweep that finds every crossing, touch,
//!    and branch point, cutting edges into non-intersecting pieces.
//! 3. [`loops`] walks the piece graph with the tightest-turn rule,
//!    keeping counter-clockwise cycles as face boundary candidates.
//! 4. [`nesting`] arranges candidates into a containment forest.
//! 5. [`assembly`] records even-depth loops as faces and odd-depth
//!    loops as holes of their parents, splitting model edges at the
//!    points the sweep promoted.
//!
//! ```
//! use poly_lite_faces::{ConstructionMethod, CreateFaces};
//! use poly_lite_model::{Model, Point};
//!
//! let mut model = Model::new();
//! for quad in [
//!     [(0, 0), (4, 0)],
//!     [(4, 0), (4, 4)],
//!     [(4, 4), (0, 4)],
//!     [(0, 4), (0, 0)],
//! ] {
//!     let pts = quad.map(|(x, y)| Point::new(x, y)).to_vec();
//!     model.add_edge(pts).unwrap();
//! }
//! let out = CreateFaces::new(ConstructionMethod::AllNonOverlapping)
//!     .run(&mut model)
//!     .unwrap();
//! assert_eq!(out.created_faces.len(), 1);
//! ```

pub mod assembly;
pub mod create_faces;
pub mod error;
pub mod geom;
pub mod loops;
pub mod nesting;
pub mod registry;
pub mod sweep;

pub use assembly::CreateFacesOutput;
pub use create_faces::CreateFaces;
pub use error::{Error, Result};
pub use registry::{ConstructionMethod, OrientationConstraint};
