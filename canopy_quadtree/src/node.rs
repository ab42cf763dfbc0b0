// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes: the recursive leaf/split structure over quadrant boundaries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashSet;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::object::SpatialObject;
use crate::types::{Classify, ObjectId, Quadrants};

/// Child slot order of a split node.
pub(crate) const QUADRANT_ORDER: [Quadrants; 4] = [
    Quadrants::NE,
    Quadrants::NW,
    Quadrants::SW,
    Quadrants::SE,
];

/// Subdivision policy, fixed at tree construction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Capacity {
    /// Objects a leaf holds before it splits.
    pub(crate) max_objects: usize,
    /// Deepest level allowed; leaves at this level never split.
    pub(crate) max_levels: usize,
}

/// A node of the tree: a boundary plus either resident objects or four
/// children.
///
/// Children are ordered NE, NW, SW, SE. Objects live only in leaves; an
/// object overlapping several quadrants is resident in each matching leaf.
#[derive(Clone, Debug)]
pub struct Node {
    bounds: Rect,
    level: usize,
    kind: NodeKind,
}

#[derive(Clone, Debug)]
enum NodeKind {
    Leaf { objects: SmallVec<[ObjectId; 8]> },
    Split { children: Box<[Node; 4]> },
}

/// Resolve `id` to its stored object.
///
/// Ids reachable from leaves are always backed by an occupied slot.
pub(crate) fn entry<P>(slots: &[Option<SpatialObject<P>>], id: ObjectId) -> &SpatialObject<P> {
    slots
        .get(id.idx())
        .expect("quadtree invariant violated: leaf references out-of-bounds slot")
        .as_ref()
        .expect("quadtree invariant violated: leaf references vacant slot")
}

pub(crate) fn entry_mut<P>(
    slots: &mut [Option<SpatialObject<P>>],
    id: ObjectId,
) -> &mut SpatialObject<P> {
    slots
        .get_mut(id.idx())
        .expect("quadtree invariant violated: leaf references out-of-bounds slot")
        .as_mut()
        .expect("quadtree invariant violated: leaf references vacant slot")
}

impl Node {
    pub(crate) fn new_leaf(bounds: Rect, level: usize) -> Self {
        Self {
            bounds,
            level,
            kind: NodeKind::Leaf {
                objects: SmallVec::new(),
            },
        }
    }

    /// The boundary this node covers.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Depth of this node; the root is at level 0.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Whether this node holds objects rather than children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The four children of a split node, or an empty slice for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::Split { children } => &children[..],
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// The resident objects of a leaf, or an empty slice for a split node.
    #[must_use]
    pub fn objects(&self) -> &[ObjectId] {
        match &self.kind {
            NodeKind::Leaf { objects } => objects,
            NodeKind::Split { .. } => &[],
        }
    }

    /// Place `id` in every leaf its footprint classifies into, splitting
    /// leaves that overflow `capacity`.
    pub(crate) fn insert<P>(
        &mut self,
        id: ObjectId,
        slots: &mut [Option<SpatialObject<P>>],
        capacity: Capacity,
    ) {
        let overflowed = match &mut self.kind {
            NodeKind::Split { children } => {
                let quadrants = entry(slots, id).classify(self.bounds);
                for (child, quadrant) in children.iter_mut().zip(QUADRANT_ORDER) {
                    if quadrants.contains(quadrant) {
                        child.insert(id, slots, capacity);
                    }
                }
                return;
            }
            NodeKind::Leaf { objects } => {
                objects.push(id);
                objects.len() > capacity.max_objects
            }
        };
        entry_mut(slots, id).tiles_mut().record(self.bounds);
        if overflowed && self.level < capacity.max_levels {
            self.split(slots, capacity);
        }
    }

    /// Turn a leaf into a split node and redistribute its residents.
    ///
    /// Redistribution re-enters the ordinary insert path, so a child pushed
    /// past capacity splits in turn until `capacity.max_levels` stops the
    /// recursion.
    fn split<P>(&mut self, slots: &mut [Option<SpatialObject<P>>], capacity: Capacity) {
        let NodeKind::Leaf { objects } = &mut self.kind else {
            return;
        };
        let residents = core::mem::take(objects);
        let children = quadrant_bounds(self.bounds).map(|b| Self::new_leaf(b, self.level + 1));
        self.kind = NodeKind::Split {
            children: Box::new(children),
        };
        for id in residents {
            entry_mut(slots, id).tiles_mut().erase(self.bounds);
            self.insert(id, slots, capacity);
        }
    }

    /// Collect every object in a leaf the query region classifies into.
    ///
    /// `seen` suppresses duplicates from objects resident in several leaves.
    pub(crate) fn retrieve_into(
        &self,
        region: Rect,
        seen: &mut HashSet<ObjectId>,
        out: &mut Vec<ObjectId>,
    ) {
        match &self.kind {
            NodeKind::Leaf { objects } => {
                for &id in objects {
                    if seen.insert(id) {
                        out.push(id);
                    }
                }
            }
            NodeKind::Split { children } => {
                let quadrants = region.classify(self.bounds);
                for (child, quadrant) in children.iter().zip(QUADRANT_ORDER) {
                    if quadrants.contains(quadrant) {
                        child.retrieve_into(region, seen, out);
                    }
                }
            }
        }
    }

    /// Evict every leaf on `target`'s classification path, erasing the tile
    /// record of each evicted resident.
    pub(crate) fn remove_into<P>(
        &mut self,
        target: Rect,
        slots: &mut [Option<SpatialObject<P>>],
        out: &mut Vec<ObjectId>,
    ) {
        match &mut self.kind {
            NodeKind::Leaf { objects } => {
                let evicted = core::mem::take(objects);
                for &id in &evicted {
                    entry_mut(slots, id).tiles_mut().erase(self.bounds);
                }
                out.extend(evicted);
            }
            NodeKind::Split { children } => {
                let quadrants = target.classify(self.bounds);
                for (child, quadrant) in children.iter_mut().zip(QUADRANT_ORDER) {
                    if quadrants.contains(quadrant) {
                        child.remove_into(target, slots, out);
                    }
                }
            }
        }
    }

    /// Collect every resident id, leaf by leaf, duplicates included.
    pub(crate) fn all_into(&self, out: &mut Vec<ObjectId>) {
        match &self.kind {
            NodeKind::Leaf { objects } => out.extend_from_slice(objects),
            NodeKind::Split { children } => {
                for child in children.iter() {
                    child.all_into(out);
                }
            }
        }
    }

    /// Collect the boundary of every leaf `region` classifies into.
    pub(crate) fn tile_bounds_into(&self, region: Rect, out: &mut Vec<Rect>) {
        match &self.kind {
            NodeKind::Leaf { .. } => out.push(self.bounds),
            NodeKind::Split { children } => {
                let quadrants = region.classify(self.bounds);
                for (child, quadrant) in children.iter().zip(QUADRANT_ORDER) {
                    if quadrants.contains(quadrant) {
                        child.tile_bounds_into(region, out);
                    }
                }
            }
        }
    }
}

/// Child boundaries of `bounds`, in NE, NW, SW, SE order.
///
/// Split at the same center point classification compares against, so a
/// child boundary is bit-identical to the tile classification routes to.
fn quadrant_bounds(bounds: Rect) -> [Rect; 4] {
    let center = bounds.center();
    [
        Rect::new(center.x, bounds.y0, bounds.x1, center.y),
        Rect::new(bounds.x0, bounds.y0, center.x, center.y),
        Rect::new(bounds.x0, center.y, center.x, bounds.y1),
        Rect::new(center.x, center.y, bounds.x1, bounds.y1),
    ]
}
