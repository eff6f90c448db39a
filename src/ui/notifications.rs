// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toast display for editor notifications.

use crate::editor::notify::{NotificationKind, Notifications};

/// Show current notifications in the top-right corner.
pub fn show(ctx: &egui::Context, notifications: &mut Notifications) {
    if notifications.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 40.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (index, note) in notifications.iter().enumerate() {
                let fill = match note.kind {
                    NotificationKind::Success => egui::Color32::from_rgb(0xd4, 0xed, 0xda),
                    NotificationKind::Error => egui::Color32::from_rgb(0xf8, 0xd7, 0xda),
                };
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&note.message).color(egui::Color32::BLACK));
                        if ui.small_button("×").clicked() {
                            dismissed = Some(index);
                        }
                    });
                });
            }
        });

    if let Some(index) = dismissed {
        notifications.dismiss(index);
    }
}
