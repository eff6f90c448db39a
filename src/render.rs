// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay rendering.
//!
//! The editor draws through [`RenderSurface`], so the drawing routine runs
//! the same against an egui painter or a test recorder.

use crate::models::annotation::Annotation;
use crate::models::draft::{DraftRect, PixelPoint, PixelRect};
use crate::util::geometry::{denormalize_rect, OverlaySize};
use egui::Color32;

/// Outline and tag colour of saved annotations.
pub const SAVED_COLOR: Color32 = Color32::from_rgb(0x00, 0xa8, 0x84);
/// Outline and tag colour of the draft.
pub const DRAFT_COLOR: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);
pub const TAG_TEXT_COLOR: Color32 = Color32::WHITE;
/// Label shown on the draft until it is saved.
pub const DRAFT_LABEL: &str = "New object";

const STROKE_WIDTH: f64 = 2.0;
const TAG_HEIGHT: f64 = 20.0;
const TAG_PADDING: f64 = 10.0;
const TEXT_INSET: f64 = 5.0;

/// Drawing operations the overlay needs.
pub trait RenderSurface {
    fn clear(&mut self);
    fn stroke_rect(&mut self, rect: PixelRect, color: Color32, width: f64);
    fn fill_rect(&mut self, rect: PixelRect, color: Color32);
    /// Draw `text` with its baseline-left corner at `at`.
    fn fill_text(&mut self, text: &str, at: PixelPoint, color: Color32);
    fn measure_text(&self, text: &str) -> f64;
}

/// Redraw the whole overlay: saved boxes in arrival order, then the draft.
pub fn render(
    surface: &mut dyn RenderSurface,
    annotations: &[Annotation],
    draft: Option<&DraftRect>,
    overlay: OverlaySize,
) {
    surface.clear();
    for ann in annotations {
        let rect = denormalize_rect(&ann.rect, overlay);
        draw_labeled_rect(surface, rect, &ann.label, SAVED_COLOR);
    }
    if let Some(draft) = draft {
        draw_labeled_rect(surface, draft.normalized(), DRAFT_LABEL, DRAFT_COLOR);
    }
}

fn draw_labeled_rect(surface: &mut dyn RenderSurface, rect: PixelRect, label: &str, color: Color32) {
    surface.stroke_rect(rect, color, STROKE_WIDTH);

    let tag = PixelRect::new(
        rect.x,
        rect.y - TAG_HEIGHT,
        surface.measure_text(label) + TAG_PADDING,
        TAG_HEIGHT,
    );
    surface.fill_rect(tag, color);
    surface.fill_text(
        label,
        PixelPoint::new(rect.x + TEXT_INSET, rect.y - TEXT_INSET),
        TAG_TEXT_COLOR,
    );
}

#[cfg(test)]
pub mod recording {
    //! A surface that records what was drawn.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Stroke(PixelRect, Color32),
        Fill(PixelRect, Color32),
        Text(String, PixelPoint),
    }

    /// Holds the ops drawn since the last clear, like a canvas holds pixels.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
        pub clears: usize,
    }

    impl RecordingSurface {
        pub fn strokes(&self) -> Vec<(PixelRect, Color32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Stroke(rect, color) => Some((*rect, *color)),
                    _ => None,
                })
                .collect()
        }

        pub fn texts(&self) -> Vec<String> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(text, _) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn clear(&mut self) {
            self.ops.clear();
            self.clears += 1;
        }

        fn stroke_rect(&mut self, rect: PixelRect, color: Color32, _width: f64) {
            self.ops.push(DrawOp::Stroke(rect, color));
        }

        fn fill_rect(&mut self, rect: PixelRect, color: Color32) {
            self.ops.push(DrawOp::Fill(rect, color));
        }

        fn fill_text(&mut self, text: &str, at: PixelPoint, _color: Color32) {
            self.ops.push(DrawOp::Text(text.to_string(), at));
        }

        fn measure_text(&self, text: &str) -> f64 {
            7.0 * text.chars().count() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{DrawOp, RecordingSurface};
    use super::*;
    use crate::models::annotation::{AnnotationId, NormRect};

    fn ann(id: i64, label: &str, rect: NormRect) -> Annotation {
        Annotation {
            id: AnnotationId(id),
            label: label.to_string(),
            rect,
        }
    }

    #[test]
    fn test_render_scales_and_tags() {
        let mut surface = RecordingSurface::default();
        let annotations = vec![ann(1, "cat", NormRect::new(0.25, 0.5, 0.5, 0.25))];

        render(&mut surface, &annotations, None, OverlaySize::new(400.0, 200.0));

        assert_eq!(
            surface.ops,
            vec![
                DrawOp::Stroke(PixelRect::new(100.0, 100.0, 200.0, 50.0), SAVED_COLOR),
                DrawOp::Fill(PixelRect::new(100.0, 80.0, 31.0, 20.0), SAVED_COLOR),
                DrawOp::Text("cat".to_string(), PixelPoint::new(105.0, 95.0)),
            ]
        );
    }

    #[test]
    fn test_draft_drawn_last_with_placeholder() {
        let mut surface = RecordingSurface::default();
        let annotations = vec![
            ann(1, "a", NormRect::new(0.0, 0.0, 0.1, 0.1)),
            ann(2, "b", NormRect::new(0.5, 0.5, 0.1, 0.1)),
        ];
        let mut draft = DraftRect::at(PixelPoint::new(80.0, 60.0));
        draft.stretch_to(PixelPoint::new(20.0, 10.0));

        render(&mut surface, &annotations, Some(&draft), OverlaySize::new(100.0, 100.0));

        assert_eq!(surface.texts(), vec!["a", "b", DRAFT_LABEL]);
        let strokes = surface.strokes();
        assert_eq!(strokes[2], (PixelRect::new(20.0, 10.0, 60.0, 50.0), DRAFT_COLOR));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut surface = RecordingSurface::default();
        let annotations = vec![ann(1, "x", NormRect::new(0.1, 0.2, 0.3, 0.4))];
        let draft = DraftRect::at(PixelPoint::new(5.0, 5.0));
        let overlay = OverlaySize::new(320.0, 240.0);

        render(&mut surface, &annotations, Some(&draft), overlay);
        let first = surface.ops.clone();
        render(&mut surface, &annotations, Some(&draft), overlay);

        assert_eq!(surface.ops, first);
        assert_eq!(surface.clears, 2);
    }
}
