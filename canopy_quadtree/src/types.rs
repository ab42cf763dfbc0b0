// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the quadtree: object identifiers, quadrant sets, and the
//! classification contract.

use kurbo::Rect;

/// Identifier for an object stored in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// The quadrants of a node boundary that a footprint overlaps.
    ///
    /// Bit order matches the child slot order of a split node: NE, NW, SW, SE.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Quadrants: u8 {
        /// North-east: above and right of the center.
        const NE = 0b0001;
        /// North-west: above and left of the center.
        const NW = 0b0010;
        /// South-west: below and left of the center.
        const SW = 0b0100;
        /// South-east: below and right of the center.
        const SE = 0b1000;
    }
}

/// Classification of a footprint against a node boundary.
///
/// Implementors report every quadrant of `bounds` their footprint overlaps,
/// splitting at the boundary's geometric center. The comparisons are strict:
/// a footprint whose edge lies exactly on a center line does not reach past
/// it, so it stays out of the quadrants on the far side. A footprint
/// straddling a center line belongs to every quadrant it reaches into, up to
/// all four.
///
/// A degenerate (zero-size) footprint placed exactly on the center point
/// satisfies none of the strict comparisons and classifies into the empty
/// set; on a split node such a footprint descends into no child.
pub trait Classify {
    /// Return every quadrant of `bounds` the footprint overlaps.
    fn classify(&self, bounds: Rect) -> Quadrants;
}

impl Classify for Rect {
    fn classify(&self, bounds: Rect) -> Quadrants {
        let center = bounds.center();
        let north = self.y0 < center.y;
        let west = self.x0 < center.x;
        let east = self.x1 > center.x;
        let south = self.y1 > center.y;

        let mut quadrants = Quadrants::empty();
        if north && east {
            quadrants |= Quadrants::NE;
        }
        if north && west {
            quadrants |= Quadrants::NW;
        }
        if west && south {
            quadrants |= Quadrants::SW;
        }
        if east && south {
            quadrants |= Quadrants::SE;
        }
        quadrants
    }
}
