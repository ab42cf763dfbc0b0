// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree container: slot storage, object identity, and the query
//! surface.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashSet;
use kurbo::Rect;

use crate::damage::Damage;
use crate::node::{self, Capacity, Node};
use crate::object::SpatialObject;
use crate::types::ObjectId;
use crate::util::{rect_is_well_formed, rect_key};

/// Objects a leaf holds before it splits, unless configured otherwise.
pub const DEFAULT_MAX_OBJECTS: usize = 10;

/// Deepest subdivision level, unless configured otherwise.
pub const DEFAULT_MAX_LEVELS: usize = 4;

/// A region quadtree over axis-aligned rectangles.
///
/// The tree covers a fixed boundary and splits leaves that exceed a
/// configured occupancy, down to a maximum depth. Objects are stored in
/// slots owned by the tree and addressed by generational [`ObjectId`]s; an
/// object whose footprint straddles quadrant center lines is resident in
/// every matching leaf at once.
///
/// Each object carries a [`TileSet`](crate::TileSet) recording exactly the
/// leaf boundaries it is resident in, kept in lockstep by every mutation.
/// Those tiles double as dirty rectangles for repaint scheduling; see
/// [`collect_damage`](Self::collect_damage).
pub struct Quadtree<P = ()> {
    /// One slot per object ever stored; `None` once released.
    objects: Vec<Option<SpatialObject<P>>>,
    /// Last generation handed out per slot. Generations persist across
    /// frees and [`clear`](Self::clear) so stale ids keep failing liveness.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: Node,
    capacity: Capacity,
}

impl<P> fmt::Debug for Quadtree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quadtree")
            .field("bounds", &self.root.bounds())
            .field("objects_total", &self.objects.len())
            .field(
                "objects_alive",
                &(self.objects.len() - self.free_list.len()),
            )
            .field("max_objects", &self.capacity.max_objects)
            .field("max_levels", &self.capacity.max_levels)
            .finish_non_exhaustive()
    }
}

impl<P> Quadtree<P> {
    /// Create a tree covering `bounds` with the default subdivision policy
    /// ([`DEFAULT_MAX_OBJECTS`], [`DEFAULT_MAX_LEVELS`]).
    ///
    /// # Panics
    ///
    /// Panics if `bounds` is not finite with positive width and height.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self::with_capacity(bounds, DEFAULT_MAX_OBJECTS, DEFAULT_MAX_LEVELS)
    }

    /// Create a tree covering `bounds`, splitting leaves that exceed
    /// `max_objects` until they reach `max_levels`.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` is not finite with positive width and height.
    #[must_use]
    pub fn with_capacity(bounds: Rect, max_objects: usize, max_levels: usize) -> Self {
        assert!(
            rect_is_well_formed(bounds) && bounds.width() > 0.0 && bounds.height() > 0.0,
            "tree bounds must be finite with positive width and height"
        );
        Self {
            objects: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: Node::new_leaf(bounds, 0),
            capacity: Capacity {
                max_objects,
                max_levels,
            },
        }
    }

    /// Store `object` and index it, returning its id.
    ///
    /// The object lands in every leaf its footprint classifies into,
    /// recording each leaf boundary in its tile set. A leaf pushed past
    /// `max_objects` splits, unless it already sits at `max_levels`.
    /// Footprints outside the tree boundary funnel into the nearest edge
    /// leaves.
    pub fn insert(&mut self, object: SpatialObject<P>) -> ObjectId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.objects[idx] = Some(object);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.objects.push(Some(object));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices."
            )]
            ((self.objects.len() - 1) as u32, generation)
        };
        let id = ObjectId::new(idx, generation);
        self.root.insert(id, &mut self.objects, self.capacity);
        id
    }

    /// Index an already-stored object again, returning whether it was alive.
    ///
    /// This is how co-residents evicted by [`remove`](Self::remove) come
    /// back, and how an object moved with [`set_region`](Self::set_region)
    /// picks up tiles at its new footprint. Reinserting an object that is
    /// still indexed duplicates it in its leaves; queries deduplicate.
    pub fn reinsert(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.root.insert(id, &mut self.objects, self.capacity);
        true
    }

    /// Remove `id` from the index.
    ///
    /// Eviction is leaf-grained: every leaf holding `id` is emptied whole,
    /// so co-resident objects fall out of the index with it. The returned
    /// ids are those co-residents (deduplicated, `id` itself excluded);
    /// [`reinsert`](Self::reinsert) the ones that should stay indexed. The
    /// object itself stays alive and keeps its slot; use
    /// [`release`](Self::release) to retire it entirely.
    ///
    /// Removing a stale id, or one that is not currently indexed, is a
    /// no-op returning no ids.
    pub fn remove(&mut self, id: ObjectId) -> Vec<ObjectId> {
        let Some(object) = self.slot(id) else {
            return Vec::new();
        };
        if object.tiles().is_empty() {
            return Vec::new();
        }
        let target = object.region();
        let mut evicted = Vec::new();
        self.root
            .remove_into(target, &mut self.objects, &mut evicted);
        debug_assert!(
            self.slot(id).is_some_and(|o| o.tiles().is_empty()),
            "removal must erase every tile of the target"
        );
        let mut seen: HashSet<ObjectId> = HashSet::new();
        seen.insert(id);
        evicted.retain(|&other| seen.insert(other));
        evicted
    }

    /// Remove `id` and retire it: its slot is vacated for reuse and the id
    /// goes stale.
    ///
    /// Returns the evicted co-residents, as [`remove`](Self::remove) does.
    /// Releasing a stale id is a no-op.
    pub fn release(&mut self, id: ObjectId) -> Vec<ObjectId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let evicted = self.remove(id);
        self.objects[id.idx()] = None;
        self.free_list.push(id.idx());
        evicted
    }

    /// Iterate over every object in a leaf the query region classifies
    /// into, deduplicated.
    ///
    /// This is a broad phase: results share a leaf with the query but need
    /// not intersect it. Callers narrow with their own geometry test.
    pub fn retrieve(&self, region: Rect) -> impl Iterator<Item = ObjectId> + '_ {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.root.retrieve_into(region, &mut seen, &mut out);
        out.into_iter()
    }

    /// Iterate over every indexed object, deduplicated, in leaf walk order.
    pub fn all_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        let mut out = Vec::new();
        self.root.all_into(&mut out);
        let mut seen = HashSet::new();
        out.retain(|&id| seen.insert(id));
        out.into_iter()
    }

    /// Iterate over the boundaries of every leaf `region` classifies into.
    ///
    /// This is the set of tiles an insertion with footprint `region` would
    /// land in right now.
    pub fn tile_bounds(&self, region: Rect) -> impl Iterator<Item = Rect> + '_ {
        let mut out = Vec::new();
        self.root.tile_bounds_into(region, &mut out);
        out.into_iter()
    }

    /// Rebuild the tree from its current contents.
    ///
    /// Every indexed object is collected, the tree collapses to a single
    /// root leaf, and the objects are reinserted. Tile records are rebuilt
    /// from scratch. The resulting shape depends only on the set of
    /// footprints, so rebalancing an already rebalanced tree changes
    /// nothing.
    pub fn rebalance(&mut self) {
        let mut ids = Vec::new();
        self.root.all_into(&mut ids);
        let mut seen = HashSet::new();
        ids.retain(|&id| seen.insert(id));
        self.root = Node::new_leaf(self.root.bounds(), 0);
        // Old tile records refer to leaves that no longer exist.
        for &id in &ids {
            node::entry_mut(&mut self.objects, id).tiles_mut().clear();
        }
        for id in ids {
            self.root.insert(id, &mut self.objects, self.capacity);
        }
    }

    /// Drop every object and collapse the tree to an empty root leaf.
    ///
    /// All outstanding ids go stale. Slot generations persist, so slots
    /// reused by later insertions mint fresh ids.
    pub fn clear(&mut self) {
        self.root = Node::new_leaf(self.root.bounds(), 0);
        for (idx, slot) in self.objects.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
    }

    /// Gather the dirty tiles of `ids` into a [`Damage`] report.
    ///
    /// Tiles shared by several objects appear once, in first-seen order.
    /// Stale ids contribute nothing. To repaint a removal, gather the
    /// target's damage before calling [`remove`](Self::remove): the tiles
    /// being vacated are exactly its current tiles.
    #[must_use]
    pub fn collect_damage<I>(&self, ids: I) -> Damage
    where
        I: IntoIterator<Item = ObjectId>,
    {
        let mut seen: HashSet<[u64; 4]> = HashSet::new();
        let mut damage = Damage::default();
        for id in ids {
            let Some(object) = self.slot(id) else {
                continue;
            };
            for tile in object.tiles().iter() {
                if seen.insert(rect_key(tile)) {
                    damage.dirty_tiles.push(tile);
                }
            }
        }
        damage
    }

    /// Borrow the object stored under `id`, if it is alive.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SpatialObject<P>> {
        self.slot(id)
    }

    /// Mutably borrow the payload stored under `id`, if it is alive.
    pub fn payload_mut(&mut self, id: ObjectId) -> Option<&mut P> {
        self.slot_mut(id).map(SpatialObject::payload_mut)
    }

    /// Change the footprint of `id`.
    ///
    /// The object must not be indexed when its footprint changes:
    /// [`remove`](Self::remove) it first, then [`reinsert`](Self::reinsert)
    /// it to pick up tiles at the new footprint. Stale ids are ignored.
    pub fn set_region(&mut self, id: ObjectId, region: Rect) {
        if let Some(object) = self.slot_mut(id) {
            debug_assert!(
                object.tiles().is_empty(),
                "footprint changed while indexed; remove the object first"
            );
            object.set_region(region);
        }
    }

    /// Whether `id` refers to a currently stored object.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.objects.get(id.idx()).is_some_and(Option::is_some)
            && self.generations[id.idx()] == id.1
    }

    /// The root node, for walking the tree shape.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The boundary the tree covers.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.root.bounds()
    }

    /// Objects a leaf holds before it splits.
    #[must_use]
    pub fn max_objects(&self) -> usize {
        self.capacity.max_objects
    }

    /// The deepest subdivision level.
    #[must_use]
    pub fn max_levels(&self) -> usize {
        self.capacity.max_levels
    }

    fn slot(&self, id: ObjectId) -> Option<&SpatialObject<P>> {
        if !self.is_alive(id) {
            return None;
        }
        self.objects[id.idx()].as_ref()
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut SpatialObject<P>> {
        if !self.is_alive(id) {
            return None;
        }
        self.objects[id.idx()].as_mut()
    }
}
