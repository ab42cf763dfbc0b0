// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage accumulated from dirty tiles.

use alloc::vec::Vec;
use kurbo::Rect;

/// Leaf tiles that need repainting, gathered from a set of objects.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Dirty leaf tiles, deduplicated, in first-seen order.
    pub dirty_tiles: Vec<Rect>,
}

impl Damage {
    /// Whether no tiles were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty_tiles.is_empty()
    }

    /// The union of all dirty tiles, if any.
    #[must_use]
    pub fn union_rect(&self) -> Option<Rect> {
        let mut tiles = self.dirty_tiles.iter().copied();
        let first = tiles.next()?;
        Some(tiles.fold(first, |acc, r| acc.union(r)))
    }
}
