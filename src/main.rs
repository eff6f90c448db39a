// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! boxmark - bounding-box annotation editor
//!
//! A desktop tool for drawing and labeling rectangular regions on an image
//! whose annotations live in a remote annotation store.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::BoxmarkApp;
use clap::Parser;
use config::{Args, SessionConfig};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = SessionConfig::from_args(&args)?.resolve()?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("boxmark - bounding-box annotation"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "boxmark",
        options,
        Box::new(move |cc| {
            let app = BoxmarkApp::new(config, &cc.egui_ctx)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
