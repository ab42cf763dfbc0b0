// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tile bookkeeping.
//!
//! Subdivide under load, walk the leaf grid, bound a repaint, and collapse
//! the tree again with a delete plus rebalance.
//!
//! Run:
//! - `cargo run -p canopy_examples --example dirty_tiles`

use canopy_quadtree::{Node, Quadtree, SpatialObject};
use kurbo::Rect;

fn print_node(node: &Node) {
    let indent = "  ".repeat(node.level());
    let b = node.bounds();
    if node.is_leaf() {
        println!(
            "{indent}leaf  ({}, {})-({}, {})  holds {}",
            b.x0,
            b.y0,
            b.x1,
            b.y1,
            node.objects().len()
        );
    } else {
        println!("{indent}split ({}, {})-({}, {})", b.x0, b.y0, b.x1, b.y1);
        for child in node.children() {
            print_node(child);
        }
    }
}

fn main() {
    let mut tree = Quadtree::with_capacity(Rect::new(0.0, 0.0, 256.0, 256.0), 1, 3);

    // Cluster boxes in the north-west so that corner subdivides deeper, and
    // put one wide box across the middle to keep several tiles dirty at once.
    let ids = [
        tree.insert(SpatialObject::new(Rect::new(10.0, 10.0, 30.0, 30.0), ())),
        tree.insert(SpatialObject::new(Rect::new(40.0, 40.0, 60.0, 60.0), ())),
        tree.insert(SpatialObject::new(Rect::new(70.0, 10.0, 90.0, 30.0), ())),
        tree.insert(SpatialObject::new(Rect::new(100.0, 100.0, 156.0, 156.0), ())),
    ];

    print_node(tree.root());

    let damage = tree.collect_damage(ids);
    println!("dirty tiles: {}", damage.dirty_tiles.len());
    if let Some(bound) = damage.union_rect() {
        println!(
            "single repaint bound: ({}, {})-({}, {})",
            bound.x0, bound.y0, bound.x1, bound.y1
        );
    }

    // Deleting a box: gather its damage first, since the tiles being vacated
    // are exactly its current tiles.
    let doomed = ids[1];
    let vacated = tree.collect_damage([doomed]);
    for other in tree.release(doomed) {
        tree.reinsert(other);
    }
    println!("tiles to repaint after the delete: {}", vacated.dirty_tiles.len());

    // With the cluster thinned out, rebalance collapses the deep corner.
    tree.rebalance();
    println!("after rebalance: {tree:?}");
    print_node(tree.root());

    let everything: Vec<_> = tree.all_objects().collect();
    assert_eq!(
        everything.len(),
        ids.len() - 1,
        "every surviving box stays reachable"
    );
}
