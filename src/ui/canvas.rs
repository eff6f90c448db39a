// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image display and annotation overlay.
//!
//! This module shows the image scaled to fit the available space, turns
//! mouse drags over it into pointer events for the editor, and paints the
//! editor's overlay with the egui painter.

use crate::editor::gesture::PointerEvent;
use crate::editor::AnnotationEditor;
use crate::models::draft::{PixelPoint, PixelRect};
use crate::render::RenderSurface;
use crate::util::geometry::OverlaySize;

const LABEL_FONT_SIZE: f32 = 12.0;

/// egui painter addressed in overlay pixels.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, x: f64, y: f64) -> egui::Pos2 {
        self.origin + egui::vec2(x as f32, y as f32)
    }

    fn rect(&self, rect: PixelRect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.pos(rect.x, rect.y),
            egui::vec2(rect.width as f32, rect.height as f32),
        )
    }

    fn font() -> egui::FontId {
        egui::FontId::proportional(LABEL_FONT_SIZE)
    }
}

impl RenderSurface for EguiSurface<'_> {
    // egui starts every frame from a blank canvas.
    fn clear(&mut self) {}

    fn stroke_rect(&mut self, rect: PixelRect, color: egui::Color32, width: f64) {
        self.painter
            .rect_stroke(self.rect(rect), 0.0, egui::Stroke::new(width as f32, color));
    }

    fn fill_rect(&mut self, rect: PixelRect, color: egui::Color32) {
        self.painter.rect_filled(self.rect(rect), 0.0, color);
    }

    fn fill_text(&mut self, text: &str, at: PixelPoint, color: egui::Color32) {
        self.painter.text(
            self.pos(at.x, at.y),
            egui::Align2::LEFT_BOTTOM,
            text,
            Self::font(),
            color,
        );
    }

    fn measure_text(&self, text: &str) -> f64 {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), Self::font(), egui::Color32::WHITE);
        galley.size().x as f64
    }
}

/// Display the image and its overlay, and feed mouse drags to the editor.
pub fn show(
    ui: &mut egui::Ui,
    editor: &mut AnnotationEditor,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("Loading image...").color(egui::Color32::WHITE));
            });
            return;
        };

        // Calculate scaling to fit the image in the available space
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            let width = available.x;
            (width, width / img_aspect)
        } else {
            let height = available.y;
            (height * img_aspect, height)
        };

        // Center the image
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // The overlay always matches the displayed image
        let overlay = OverlaySize::new(display_width as f64, display_height as f64);
        if editor.is_initialized() {
            editor.resize_overlay(overlay);
        } else {
            editor.initialize(overlay);
        }

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());
        let to_overlay = |pos: egui::Pos2| {
            let offset = pos.clamp(image_rect.min, image_rect.max) - image_rect.min;
            PixelPoint::new(offset.x as f64, offset.y as f64)
        };

        if response.drag_started() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                editor.handle_pointer(PointerEvent::Down(to_overlay(origin)));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                editor.handle_pointer(PointerEvent::Move(to_overlay(pos)));
            }
        }
        if response.drag_stopped() {
            editor.handle_pointer(PointerEvent::Up);
        }

        let mut surface = EguiSurface::new(ui.painter(), image_rect.min);
        editor.render(&mut surface);

        if editor.drawing_enabled() {
            response.on_hover_cursor(egui::CursorIcon::Crosshair);
        }
    });
}
