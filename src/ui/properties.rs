// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel with the annotation form and the list of saved annotations.

use crate::editor::AnnotationEditor;
use crate::models::annotation::AnnotationId;

pub enum PropertiesAction {
    None,
    Submit,
    Delete(AnnotationId),
}

/// Display the side panel.
pub fn show(ui: &mut egui::Ui, editor: &mut AnnotationEditor) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("New annotation");
    ui.add_space(4.0);

    ui.label("Label");
    let label_response = ui.text_edit_singleline(editor.label_mut());
    if label_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        action = PropertiesAction::Submit;
    }

    let has_box = !editor.form().width.is_empty();
    ui.label(
        egui::RichText::new(if has_box { "Box ready" } else { "No box drawn" })
            .small()
            .weak(),
    );

    if ui.button("Save annotation").clicked() {
        action = PropertiesAction::Submit;
    }

    ui.separator();
    ui.heading(format!("Annotations ({})", editor.entries().len()));

    egui::ScrollArea::vertical().show(ui, |ui| {
        if editor.entries().is_empty() {
            ui.label(egui::RichText::new("No annotations yet").weak());
        }
        for entry in editor.entries() {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(" {} ", entry.number))
                        .background_color(egui::Color32::from_rgb(0x28, 0xa7, 0x45))
                        .color(egui::Color32::WHITE),
                );
                ui.label(&entry.label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = PropertiesAction::Delete(entry.id);
                    }
                });
            });
        }
    });

    action
}

/// Ask before deleting. Returns `Some(true)` on confirm, `Some(false)` on
/// cancel and `None` while the prompt is still open.
pub fn confirm_delete(ctx: &egui::Context, id: AnnotationId) -> Option<bool> {
    let mut answer = None;
    egui::Window::new("Delete annotation?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(format!("Delete annotation {}? This cannot be undone.", id));
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });
    answer
}
