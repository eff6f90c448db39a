// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pixel-space geometry for the overlay and the in-progress draft box.

/// A position on the overlay surface, in pixels from its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in overlay pixels with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// The unsaved box being drawn.
///
/// `width`/`height` are signed deltas from the anchor: a drag towards the
/// upper-left produces negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftRect {
    pub anchor: PixelPoint,
    pub width: f64,
    pub height: f64,
}

impl DraftRect {
    /// Start a zero-sized draft at the pointer-down position.
    pub fn at(anchor: PixelPoint) -> Self {
        Self {
            anchor,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the draft so its far corner is at `pos`.
    pub fn stretch_to(&mut self, pos: PixelPoint) {
        self.width = pos.x - self.anchor.x;
        self.height = pos.y - self.anchor.y;
    }

    /// The draft with its top-left at the minimum corner on each axis.
    pub fn normalized(&self) -> PixelRect {
        PixelRect {
            x: self.anchor.x.min(self.anchor.x + self.width),
            y: self.anchor.y.min(self.anchor.y + self.height),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    /// Scale the draft by independent factors on each axis.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            anchor: PixelPoint::new(self.anchor.x * sx, self.anchor.y * sy),
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}
