// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the annotation editor to the window: it loads the
//! image in the background, forwards toolbar, panel and canvas actions to
//! the editor, and drains finished store calls every frame.

use crate::config::ResolvedConfig;
use crate::editor::AnnotationEditor;
use crate::io::http::HttpStore;
use crate::io::media::LoadedImage;
use crate::io::requests::{Dispatch, RequestQueue};
use crate::ui::{canvas, notifications, properties, toolbar};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main application state.
pub struct BoxmarkApp {
    editor: AnnotationEditor,

    /// Local copy of the image under annotation
    image_path: PathBuf,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl BoxmarkApp {
    /// Create the application and start loading the image.
    pub fn new(config: ResolvedConfig, ctx: &egui::Context) -> Result<Self> {
        let store = HttpStore::new(&config.server_url, config.csrf_token, config.cookies)?;
        let mut queue = RequestQueue::new(Arc::new(store), Dispatch::Background);
        let repaint_ctx = ctx.clone();
        queue.set_waker(move || repaint_ctx.request_repaint());

        log::info!(
            "Annotating image {} of dataset {} on {}",
            config.session.image,
            config.session.dataset,
            config.server_url
        );

        let mut app = Self {
            editor: AnnotationEditor::new(config.session, queue),
            image_path: config.image_path,
            image_texture: None,
            image_size: None,
            image_loader: None,
            loading_message: None,
        };
        app.load_image_file();
        Ok(app)
    }

    /// Load the image file in a background thread.
    fn load_image_file(&mut self) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        let path = self.image_path.clone();
        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path).map_err(|e| format!("{:#}", e));
            if let Ok(ref img) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), img.width, img.height);
            }
            let _ = sender.send(result);
        });
    }

    /// Export the saved annotations; the format follows the extension.
    fn export_annotations(&self, path: PathBuf) {
        let data = self.editor.snapshot(&self.image_path.to_string_lossy());
        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => crate::io::serialization::export_yaml(&data, &path),
            Some("json") => crate::io::serialization::export_json(&data, &path),
            Some("txt") => crate::io::serialization::export_yolo(&data, &path),
            _ => {
                log::error!("Unsupported file extension: {:?}", extension);
                return;
            }
        };

        match result {
            Ok(_) => log::info!("Exported annotations to {}", path.display()),
            Err(e) => log::error!("Failed to export annotations: {}", e),
        }
    }

    fn export_dialog(&self, filter: &str, extensions: &[&str], file_name: &str) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .set_file_name(file_name)
            .save_file()
        {
            self.export_annotations(path);
        }
    }

    fn submit(&mut self) {
        if let Ok(token) = self.editor.submit() {
            log::debug!("Submitted annotation as request {}", token);
        }
    }
}

impl eframe::App for BoxmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => {
                        let size = [loaded.width as usize, loaded.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        let texture = ctx.load_texture(
                            "annotation_image",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );
                        self.image_texture = Some(texture);
                        self.image_size = Some((loaded.width, loaded.height));
                    }
                    Err(e) => {
                        log::error!("Failed to load image: {}", e);
                        self.loading_message = Some(format!("Failed to load image: {}", e));
                    }
                }
            }
        }

        // Apply finished store calls
        self.editor.poll();
        if self.editor.take_redraw() {
            ctx.request_repaint();
        }

        self.editor.notifications_mut().prune(Instant::now());
        if !self.editor.notifications().is_empty() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    ui.menu_button("Export Annotations", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            self.export_dialog("YAML", &["yaml", "yml"], "annotations.yaml");
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            self.export_dialog("JSON", &["json"], "annotations.json");
                            ui.close_menu();
                        }
                        if ui.button("Export as YOLO labels...").clicked() {
                            self.export_dialog("YOLO labels", &["txt"], "labels.txt");
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.editor.drawing_enabled(),
                    self.editor.readout(),
                    self.editor.pending_requests(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::ToggleDrawing => self.editor.toggle_drawing(),
            toolbar::ToolbarAction::Clear => self.editor.clear_draft(),
            toolbar::ToolbarAction::None => {}
        }

        // Form and annotation list (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &mut self.editor))
            .inner;

        match properties_action {
            properties::PropertiesAction::Submit => self.submit(),
            properties::PropertiesAction::Delete(id) => self.editor.request_delete(id),
            properties::PropertiesAction::None => {}
        }

        if let Some(id) = self.editor.pending_confirmation() {
            match properties::confirm_delete(ctx, id) {
                Some(true) => {
                    self.editor.confirm_delete();
                }
                Some(false) => self.editor.cancel_delete(),
                None => {}
            }
        }

        // Escape throws the draft away
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.clear_draft();
        }

        notifications::show(ctx, self.editor.notifications_mut());

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        if self.image_loader.is_some() {
                            ui.spinner();
                        }
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                canvas::show(ui, &mut self.editor, &self.image_texture, self.image_size);
            }
        });
    }
}
