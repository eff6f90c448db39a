// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between overlay pixel coordinates and
//! fractional image coordinates.

use crate::models::annotation::NormRect;
use crate::models::draft::{DraftRect, PixelRect};

/// Rendered size of the overlay surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySize {
    pub width: f64,
    pub height: f64,
}

impl OverlaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A surface with no area cannot map pixels to fractions.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Convert a fractional rectangle to overlay pixels.
pub fn denormalize_rect(rect: &NormRect, overlay: OverlaySize) -> PixelRect {
    PixelRect {
        x: rect.x * overlay.width,
        y: rect.y * overlay.height,
        width: rect.width * overlay.width,
        height: rect.height * overlay.height,
    }
}

/// Convert a finished draft into fractional coordinates.
///
/// The top-left corner is the minimum of anchor and far corner on each
/// axis, so drags towards the upper-left yield the same box as the
/// equivalent drag towards the lower-right. Results are clamped to [0, 1].
pub fn normalize_draft(draft: &DraftRect, overlay: OverlaySize) -> Option<NormRect> {
    if overlay.is_empty() {
        return None;
    }
    let px = draft.normalized();
    let x = clamp_unit(px.x / overlay.width);
    let y = clamp_unit(px.y / overlay.height);
    let right = clamp_unit((px.x + px.width) / overlay.width);
    let bottom = clamp_unit((px.y + px.height) / overlay.height);
    Some(NormRect::new(x, y, right - x, bottom - y))
}

/// Round to four decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
