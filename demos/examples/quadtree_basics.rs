// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Insert a few boxes, query a corner, move one box, and collect damage.
//!
//! Run:
//! - `cargo run -p canopy_examples --example quadtree_basics`

use canopy_quadtree::{Quadtree, SpatialObject};
use kurbo::Rect;

fn main() {
    // Build a small tree
    let mut tree = Quadtree::with_capacity(Rect::new(0.0, 0.0, 400.0, 400.0), 2, 4);
    let a = tree.insert(SpatialObject::new(Rect::new(20.0, 20.0, 80.0, 80.0), "a"));
    let a2 = tree.insert(SpatialObject::new(Rect::new(40.0, 40.0, 100.0, 100.0), "a2"));
    let b = tree.insert(SpatialObject::new(Rect::new(300.0, 40.0, 360.0, 90.0), "b"));
    let c = tree.insert(SpatialObject::new(Rect::new(220.0, 220.0, 280.0, 280.0), "c"));

    // A corner query returns candidates from the matching leaves, not exact
    // intersections.
    let hits: Vec<_> = tree.retrieve(Rect::new(0.0, 0.0, 100.0, 100.0)).collect();
    println!("top-left candidates: {hits:?}");

    // Every object knows which leaf tiles hold it.
    for id in [a, a2, b, c] {
        let object = tree.object(id).unwrap();
        let tiles: Vec<_> = object.tiles().iter().collect();
        println!("{} occupies {} tile(s): {tiles:?}", object.payload(), tiles.len());
    }

    // Move `a` to the opposite corner: remove, update, reinsert. Removal
    // empties whole leaves, so its neighbors come back through reinsert.
    for other in tree.remove(a) {
        tree.reinsert(other);
    }
    tree.set_region(a, Rect::new(320.0, 320.0, 380.0, 380.0));
    tree.reinsert(a);

    let damage = tree.collect_damage([a, a2]);
    println!("dirty tiles after the move: {:?}", damage.dirty_tiles);

    let hits: Vec<_> = tree.retrieve(Rect::new(310.0, 310.0, 400.0, 400.0)).collect();
    assert!(hits.contains(&a), "moved box should be found at its new corner");
}
