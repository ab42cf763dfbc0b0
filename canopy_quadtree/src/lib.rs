// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Quadtree: a Kurbo-native region quadtree with per-object dirty-tile tracking.
//!
//! Canopy Quadtree is a reusable building block for canvas renderers, editor viewports, and
//! broad-phase collision over axis-aligned boxes.
//!
//! - Partitions a fixed boundary into quadrants, splitting leaves that exceed a configured
//!   occupancy down to a configured depth.
//! - Keeps an object resident in *every* leaf its footprint reaches, so straddlers are found
//!   from any side.
//! - Records, per object, the exact leaf tiles holding it. Those tiles double as dirty
//!   rectangles for partial repaints.
//!
//! ## Classification and residency
//!
//! A footprint is classified against a node by comparing its edges to the node's center lines:
//! reaching strictly above/below the horizontal line and strictly left/right of the vertical
//! line selects the matching quadrants, up to all four. An edge lying exactly on a center line
//! does not reach past it. Insertion walks the tree with this rule and appends the object to
//! every leaf it selects; a leaf pushed past its occupancy limit splits and redistributes,
//! except at the depth cap, where overflow is tolerated. Footprints outside the boundary
//! funnel into the nearest edge leaves.
//!
//! ## Objects and identity
//!
//! The tree owns its objects. [`Quadtree::insert`] stores a [`SpatialObject`] (footprint plus
//! caller payload) in a slot and returns a generational [`ObjectId`]. Ids go stale when the
//! object is released or the tree is cleared; stale ids are safe to pass anywhere and simply
//! miss.
//!
//! ## Dirty tiles and eviction
//!
//! Every mutation keeps leaf residency and per-object [`TileSet`]s in lockstep, so
//! [`Quadtree::collect_damage`] can turn any set of ids into a deduplicated [`Damage`] report.
//! Removal is leaf-grained: [`Quadtree::remove`] empties every leaf holding the target and
//! hands back the evicted co-residents, which callers [`Quadtree::reinsert`] to keep indexed.
//! This makes the repaint story simple: everything that shared a tile with the removed object
//! is already in hand.
//!
//! ## Broad phase, not narrow phase
//!
//! [`Quadtree::retrieve`] returns every object sharing a leaf with the query region. That set
//! can include objects that do not intersect the query; callers narrow with their own geometry
//! test.
//!
//! # Example
//!
//! ```rust
//! use canopy_quadtree::{Quadtree, SpatialObject};
//! use kurbo::Rect;
//!
//! // Two small boxes in opposite corners force one split.
//! let mut tree = Quadtree::with_capacity(Rect::new(0.0, 0.0, 100.0, 100.0), 1, 4);
//! let a = tree.insert(SpatialObject::new(Rect::new(10.0, 10.0, 20.0, 20.0), "a"));
//! let b = tree.insert(SpatialObject::new(Rect::new(60.0, 60.0, 80.0, 80.0), "b"));
//!
//! // A query near the top-left corner reaches only `a`'s leaf.
//! let hits: Vec<_> = tree.retrieve(Rect::new(0.0, 0.0, 30.0, 30.0)).collect();
//! assert_eq!(hits, [a]);
//!
//! // Each object knows the leaf tiles it occupies.
//! assert!(tree.object(a).unwrap().tiles().contains(Rect::new(0.0, 0.0, 50.0, 50.0)));
//!
//! // Dirty tiles drive partial repaints.
//! let damage = tree.collect_damage([a, b]);
//! assert_eq!(damage.dirty_tiles.len(), 2);
//! ```
//!
//! Moving an object is a remove/reindex pair, since a footprint must not change while indexed:
//!
//! ```rust
//! use canopy_quadtree::{Quadtree, SpatialObject};
//! use kurbo::Rect;
//!
//! let mut tree = Quadtree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let id = tree.insert(SpatialObject::new(Rect::new(5.0, 5.0, 15.0, 15.0), ()));
//!
//! // Take the object out, move it, and index it again.
//! for other in tree.remove(id) {
//!     tree.reinsert(other);
//! }
//! tree.set_region(id, Rect::new(70.0, 70.0, 90.0, 90.0));
//! tree.reinsert(id);
//!
//! assert_eq!(tree.retrieve(Rect::new(60.0, 60.0, 95.0, 95.0)).count(), 1);
//! ```
//!
//! ## API overview
//!
//! - [`Quadtree`]: container owning the objects, their slots, and the node tree.
//! - [`SpatialObject`]: an axis-aligned footprint plus a caller payload.
//! - [`ObjectId`]: generational handle of a stored object.
//! - [`TileSet`]: the leaf tiles an object is resident in.
//! - [`Node`]: read-only tree shape, reached through [`Quadtree::root`].
//! - [`Quadrants`] and [`Classify`]: the center-line classification rules.
//! - [`Damage`]: deduplicated dirty tiles for a set of objects.
//!
//! Key operations:
//! - [`Quadtree::insert`] → [`ObjectId`]; [`Quadtree::reinsert`] indexes a stored object again.
//! - [`Quadtree::retrieve`] and [`Quadtree::tile_bounds`] follow a query region down the tree.
//! - [`Quadtree::remove`] → evicted co-residents; [`Quadtree::release`] also retires the id.
//! - [`Quadtree::rebalance`] rebuilds the shape from the current contents.
//! - [`Quadtree::clear`] empties the tree and invalidates every id.
//! - [`Quadtree::collect_damage`] → [`Damage`].
//!
//! ## Float semantics
//!
//! Coordinates are `f64` and assumed finite (no NaNs). Debug builds may assert on malformed
//! rectangles; release builds do not check.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod node;
mod object;
mod tree;
mod types;
mod util;

pub use damage::Damage;
pub use node::Node;
pub use object::{SpatialObject, TileSet};
pub use tree::{DEFAULT_MAX_LEVELS, DEFAULT_MAX_OBJECTS, Quadtree};
pub use types::{Classify, ObjectId, Quadrants};
