// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Bit-exact hashable key for a rectangle.
pub(crate) fn rect_key(r: Rect) -> [u64; 4] {
    [
        r.x0.to_bits(),
        r.y0.to_bits(),
        r.x1.to_bits(),
        r.y1.to_bits(),
    ]
}

/// Whether `r` has finite coordinates and non-negative extent.
pub(crate) fn rect_is_well_formed(r: Rect) -> bool {
    r.x0.is_finite()
        && r.y0.is_finite()
        && r.x1.is_finite()
        && r.y1.is_finite()
        && r.x1 >= r.x0
        && r.y1 >= r.y0
}
