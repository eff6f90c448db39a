// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the drawing-mode toggle, the clear button and the live
//! read-out of the draft.

use crate::editor::Readout;

pub enum ToolbarAction {
    None,
    ToggleDrawing,
    Clear,
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    drawing_enabled: bool,
    readout: Readout,
    pending_requests: usize,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let toggle_text = if drawing_enabled {
            "✔ Drawing mode (on)"
        } else {
            "▭ Drawing mode"
        };
        if ui.selectable_label(drawing_enabled, toggle_text).clicked() {
            action = ToolbarAction::ToggleDrawing;
        }

        if ui.button("Clear").clicked() {
            action = ToolbarAction::Clear;
        }

        ui.separator();

        ui.label(format!(
            "x: {}  y: {}  w: {}  h: {}",
            readout.x, readout.y, readout.width, readout.height
        ));

        ui.separator();

        let hint = if drawing_enabled {
            "Drag over the image to draw a box, then name it and save"
        } else {
            "Turn on drawing mode to add a box"
        };
        ui.label(egui::RichText::new(hint).italics().weak());

        if pending_requests > 0 {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spinner();
                ui.label("Syncing");
            });
        }
    });

    action
}
