// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end face-construction scenarios against the public API.

use poly_lite_faces::{ConstructionMethod, CreateFaces, Error, OrientationConstraint};
use poly_lite_model::{Coord, EdgeKey, Model, Point, Sense};

fn pts(coords: &[(Coord, Coord)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn add_square(model: &mut Model, lo: Coord, hi: Coord) -> Vec<EdgeKey> {
    [
        [(lo, lo), (hi, lo)],
        [(hi, lo), (hi, hi)],
        [(hi, hi), (lo, hi)],
        [(lo, hi), (lo, lo)],
    ]
    .iter()
    .map(|w| model.add_edge(pts(w)).unwrap())
    .collect()
}

fn run_all(model: &mut Model) -> poly_lite_faces::Result<poly_lite_faces::CreateFacesOutput> {
    CreateFaces::new(ConstructionMethod::AllNonOverlapping).run(model)
}

/// Walks a loop's edge uses and checks the chain closes.
fn assert_loop_closed(model: &Model, loop_key: poly_lite_model::LoopKey) {
    let data = model.loop_data(loop_key).unwrap();
    let spans: Vec<(Point, Point)> = data
        .edge_uses
        .iter()
        .map(|&uk| {
            let eu = model.edge_use(uk).unwrap();
            let points = model.edge_points(eu.edge).unwrap();
            let first = points[0];
            let last = points[points.len() - 1];
            match eu.sense {
                Sense::Positive => (first, last),
                Sense::Negative => (last, first),
            }
        })
        .collect();
    for i in 0..spans.len() {
        let j = (i + 1) % spans.len();
        assert_eq!(spans[i].1, spans[j].0, "loop breaks between uses {i} and {j}");
    }
}

#[test]
fn single_open_edge_creates_no_faces() {
    let mut model = Model::new();
    model.add_edge(pts(&[(0, 0), (3, 1)])).unwrap();
    let out = run_all(&mut model).unwrap();
    assert!(out.created_faces.is_empty());
    assert!(out.created_vertices.is_empty());
    assert!(out.created_edges.is_empty());
    assert_eq!(model.face_count(), 0);
}

#[test]
fn unit_square_creates_one_face() {
    let mut model = Model::new();
    add_square(&mut model, 0, 1);
    let out = run_all(&mut model).unwrap();
    assert_eq!(out.created_faces.len(), 1);

    let face = model.face(out.created_faces[0]).unwrap();
    assert!(face.inner_loops.is_empty());
    let outer = model.loop_data(face.outer_loop).unwrap();
    assert_eq!(outer.edge_uses.len(), 4);
    assert_loop_closed(&model, face.outer_loop);
}

#[test]
fn nested_square_becomes_a_hole() {
    let mut model = Model::new();
    add_square(&mut model, 0, 4);
    add_square(&mut model, 1, 3);
    let out = run_all(&mut model).unwrap();
    assert_eq!(out.created_faces.len(), 1);

    let face = model.face(out.created_faces[0]).unwrap();
    assert_eq!(face.inner_loops.len(), 1);
    let outer = model.loop_data(face.outer_loop).unwrap();
    let hole = model.loop_data(face.inner_loops[0]).unwrap();
    assert_eq!(outer.edge_uses.len(), 4);
    assert_eq!(hole.edge_uses.len(), 4);
    assert_loop_closed(&model, face.outer_loop);
    assert_loop_closed(&model, face.inner_loops[0]);

    // The hole runs clockwise: every use of an inner edge is negative.
    for &uk in &hole.edge_uses {
        assert_eq!(model.edge_use(uk).unwrap().sense, Sense::Negative);
    }
}

#[test]
fn crossing_edges_promote_one_vertex_and_split_both() {
    let mut model = Model::new();
    model.add_edge(pts(&[(0, 0), (2, 2)])).unwrap();
    model.add_edge(pts(&[(0, 2), (2, 0)])).unwrap();
    let out = run_all(&mut model).unwrap();

    assert!(out.created_faces.is_empty());
    assert_eq!(out.created_vertices.len(), 1);
    let crossing = model.vertex(out.created_vertices[0]).unwrap().point;
    assert_eq!(crossing, Point::new(1, 1));

    // Both originals replaced by two pieces each.
    assert_eq!(out.created_edges.len(), 4);
    assert_eq!(model.edge_count(), 4);
    for key in model.edge_keys().collect::<Vec<_>>() {
        assert_eq!(model.edge_points(key).unwrap().len(), 2);
    }
}

#[test]
fn single_point_sequence_is_malformed() {
    let mut model = Model::new();
    let err = CreateFaces::new(ConstructionMethod::FromPointSequences {
        coordinates: vec![0, 0],
        offsets: vec![0],
    })
    .run(&mut model)
    .unwrap_err();
    assert!(matches!(err, Error::MalformedEdge { edge: None, .. }));
    // Rejected before anything was created.
    assert_eq!(model.edge_count(), 0);
    assert_eq!(model.vertex_count(), 0);
}

#[test]
fn point_sequences_build_edges_then_faces() {
    let mut model = Model::new();
    let out = CreateFaces::new(ConstructionMethod::FromPointSequences {
        coordinates: vec![0, 0, 4, 0, 4, 4, 0, 4, 0, 0],
        offsets: vec![0],
    })
    .run(&mut model)
    .unwrap();
    assert_eq!(out.created_edges.len(), 1);
    assert_eq!(out.created_faces.len(), 1);
    let face = model.face(out.created_faces[0]).unwrap();
    // One periodic edge bounds the whole face.
    assert_eq!(model.loop_data(face.outer_loop).unwrap().edge_uses.len(), 1);
}

#[test]
fn failed_point_sequence_run_discards_its_edges() {
    // Two overlapping-collinear sequences: edge creation succeeds, the
    // sweep then rejects the pair, and the run must take its freshly
    // created edges (and their vertices) back out of the model.
    let mut model = Model::new();
    let err = CreateFaces::new(ConstructionMethod::FromPointSequences {
        coordinates: vec![0, 0, 4, 0, 2, 0, 6, 0],
        offsets: vec![0, 2],
    })
    .run(&mut model)
    .unwrap_err();
    assert!(matches!(err, Error::AmbiguousOrientation { .. }));
    assert_eq!(model.edge_count(), 0);
    assert_eq!(model.vertex_count(), 0);
}

#[test]
fn glued_squares_share_an_edge_between_two_faces() {
    let mut model = Model::new();
    let mut shared = None;
    for w in [
        [(0, 0), (2, 0)],
        [(2, 0), (4, 0)],
        [(4, 0), (4, 2)],
        [(4, 2), (2, 2)],
        [(2, 2), (0, 2)],
        [(0, 2), (0, 0)],
    ] {
        model.add_edge(pts(&w)).unwrap();
    }
    shared.replace(model.add_edge(pts(&[(2, 0), (2, 2)])).unwrap());
    let shared = shared.unwrap();

    let out = run_all(&mut model).unwrap();
    assert_eq!(out.created_faces.len(), 2);

    // Orientation exclusivity: the shared edge is consumed once per
    // sense, by the two adjacent faces.
    let mut senses = Vec::new();
    for &fk in &out.created_faces {
        let face = model.face(fk).unwrap();
        for &uk in &model.loop_data(face.outer_loop).unwrap().edge_uses {
            let eu = model.edge_use(uk).unwrap();
            if eu.edge == shared {
                senses.push(eu.sense);
            }
        }
        assert_loop_closed(&model, face.outer_loop);
    }
    senses.sort();
    assert_eq!(senses, vec![Sense::Positive, Sense::Negative]);
}

#[test]
fn dangling_edge_is_used_twice_by_one_face() {
    let mut model = Model::new();
    add_square(&mut model, 0, 4);
    let antenna = model.add_edge(pts(&[(0, 0), (1, 1)])).unwrap();
    let out = run_all(&mut model).unwrap();
    assert_eq!(out.created_faces.len(), 1);

    let face = model.face(out.created_faces[0]).unwrap();
    let outer = model.loop_data(face.outer_loop).unwrap();
    assert_eq!(outer.edge_uses.len(), 6);
    let antenna_uses = outer
        .edge_uses
        .iter()
        .filter(|&&uk| model.edge_use(uk).unwrap().edge == antenna)
        .count();
    assert_eq!(antenna_uses, 2);
    assert_loop_closed(&model, face.outer_loop);
}

#[test]
fn collinear_overlap_is_rejected() {
    let mut model = Model::new();
    let a = model.add_edge(pts(&[(0, 0), (4, 0)])).unwrap();
    let b = model.add_edge(pts(&[(2, 0), (6, 0)])).unwrap();
    let err = run_all(&mut model).unwrap_err();
    match err {
        Error::AmbiguousOrientation { first, second } => {
            assert_eq!([first, second], [a.min(b), a.max(b)]);
        }
        other => panic!("expected AmbiguousOrientation, got {other}"),
    }
    // The model is untouched on geometry-stage errors.
    assert_eq!(model.edge_count(), 2);
    assert_eq!(model.vertex_count(), 4);
}

#[test]
fn forbidden_orientation_skips_the_face_with_a_diagnostic() {
    let mut model = Model::new();
    let keys = add_square(&mut model, 0, 2);
    // The square's loop needs every edge forward; forbid one.
    let edges = keys
        .iter()
        .enumerate()
        .map(|(i, &k)| {
            let c = if i == 0 {
                OrientationConstraint::NegativeOnly
            } else {
                OrientationConstraint::Any
            };
            (k, c)
        })
        .collect();
    let out = CreateFaces::new(ConstructionMethod::FromExistingEdges { edges })
        .run(&mut model)
        .unwrap();
    assert!(out.created_faces.is_empty());
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(model.face_count(), 0);
}

#[test]
fn subset_of_edges_only_considers_those_edges() {
    let mut model = Model::new();
    let square = add_square(&mut model, 0, 2);
    add_square(&mut model, 5, 7);
    let edges = square
        .into_iter()
        .map(|k| (k, OrientationConstraint::Any))
        .collect();
    let out = CreateFaces::new(ConstructionMethod::FromExistingEdges { edges })
        .run(&mut model)
        .unwrap();
    // Only the named square becomes a face.
    assert_eq!(out.created_faces.len(), 1);
    assert_eq!(model.face_count(), 1);
}

#[test]
fn edge_crossing_a_side_promotes_a_branch_vertex() {
    let mut model = Model::new();
    add_square(&mut model, 0, 4);
    // An edge piercing the square's bottom side at (2, 0).
    model.add_edge(pts(&[(2, -2), (2, 1)])).unwrap();
    let out = run_all(&mut model).unwrap();
    assert_eq!(out.created_faces.len(), 1);
    assert_eq!(out.created_vertices.len(), 1);
    assert_eq!(
        model.vertex(out.created_vertices[0]).unwrap().point,
        Point::new(2, 0)
    );
    // Bottom side and piercing edge both split at the crossing.
    assert_eq!(out.created_edges.len(), 4);
    assert_eq!(model.edge_count(), 7);
}

#[test]
fn deep_nesting_alternates_face_and_hole() {
    let mut model = Model::new();
    add_square(&mut model, 0, 12);
    add_square(&mut model, 2, 10);
    add_square(&mut model, 4, 8);
    let out = run_all(&mut model).unwrap();
    // Depth 0 and depth 2 are faces; depth 1 is the outer face's hole.
    assert_eq!(out.created_faces.len(), 2);
    let holes: usize = out
        .created_faces
        .iter()
        .map(|&fk| model.face(fk).unwrap().inner_loops.len())
        .sum();
    assert_eq!(holes, 1);
}

#[test]
fn rerunning_on_settled_geometry_adds_nothing_new() {
    let mut model = Model::new();
    model.add_edge(pts(&[(0, 0), (2, 2)])).unwrap();
    model.add_edge(pts(&[(0, 2), (2, 0)])).unwrap();
    let first = run_all(&mut model).unwrap();
    assert_eq!(first.created_vertices.len(), 1);

    // The arrangement is already refined: a second pass promotes no
    // vertices and splits no edges.
    let second = run_all(&mut model).unwrap();
    assert!(second.created_vertices.is_empty());
    assert!(second.created_edges.is_empty());
}
