// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stored objects and their per-object tile records.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::types::{Classify, Quadrants};
use crate::util::rect_is_well_formed;

/// The set of leaf tiles an object is currently indexed under.
///
/// Each entry is the exact boundary of a leaf node holding the object. The
/// set mirrors the tree: a tile is added when the object lands in a leaf and
/// erased when the object leaves it, so after removal the set is empty.
/// Iteration order is unspecified.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    tiles: SmallVec<[Rect; 4]>,
}

impl TileSet {
    /// The number of leaf tiles currently holding the object.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the object is indexed under no leaf at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `tile` is one of the recorded leaf boundaries.
    #[must_use]
    pub fn contains(&self, tile: Rect) -> bool {
        self.tiles.contains(&tile)
    }

    /// Iterate over the recorded leaf boundaries.
    pub fn iter(&self) -> impl Iterator<Item = Rect> + '_ {
        self.tiles.iter().copied()
    }

    /// Record `tile`. A tile already present is not recorded twice.
    pub(crate) fn record(&mut self, tile: Rect) {
        if !self.tiles.contains(&tile) {
            self.tiles.push(tile);
        }
    }

    /// Erase `tile` if present.
    pub(crate) fn erase(&mut self, tile: Rect) {
        if let Some(at) = self.tiles.iter().position(|t| *t == tile) {
            self.tiles.swap_remove(at);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.tiles.clear();
    }
}

/// An axis-aligned footprint plus a caller payload, ready for insertion.
///
/// The footprint is fixed while the object is indexed; to move an object,
/// remove it from the tree, call [`set_region`](crate::Quadtree::set_region),
/// and reinsert it.
#[derive(Clone, Debug)]
pub struct SpatialObject<P = ()> {
    region: Rect,
    payload: P,
    tiles: TileSet,
}

impl<P> SpatialObject<P> {
    /// Create an object covering `region` and carrying `payload`.
    ///
    /// `region` must be finite with non-negative extent.
    #[must_use]
    pub fn new(region: Rect, payload: P) -> Self {
        debug_assert!(
            rect_is_well_formed(region),
            "object region must be finite with non-negative extent"
        );
        Self {
            region,
            payload,
            tiles: TileSet::default(),
        }
    }

    /// The object's axis-aligned footprint.
    #[must_use]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Borrow the caller payload.
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Borrow the leaf tiles currently holding the object.
    #[must_use]
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub(crate) fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub(crate) fn set_region(&mut self, region: Rect) {
        debug_assert!(
            rect_is_well_formed(region),
            "object region must be finite with non-negative extent"
        );
        self.region = region;
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut TileSet {
        &mut self.tiles
    }
}

impl<P> Classify for SpatialObject<P> {
    fn classify(&self, bounds: Rect) -> Quadrants {
        self.region.classify(bounds)
    }
}
