// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation export.
//!
//! This module writes an image's annotations as YAML, JSON or a YOLO label
//! file. A YOLO export also writes `dataset.yaml` beside the labels so the
//! class indices can be mapped back to names.

use crate::models::image_set::ImageAnnotations;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Boxes at or below this fractional size are left out of YOLO labels.
const YOLO_MIN_SIZE: f64 = 0.01;

/// Name of the class table written next to a YOLO label file.
pub const YOLO_DATASET_FILE: &str = "dataset.yaml";

/// Class table in the layout YOLO trainers read: index to name.
#[derive(Debug, Serialize)]
struct YoloDataset {
    nc: usize,
    names: BTreeMap<usize, String>,
}

/// Export annotations to YAML format.
pub fn export_yaml(data: &ImageAnnotations, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export annotations to JSON format.
pub fn export_json(data: &ImageAnnotations, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Render YOLO label lines: `class cx cy w h`, centre-based, six decimals.
///
/// Boxes whose centre falls outside the image or whose size is not in
/// (0.01, 1] are skipped.
pub fn yolo_labels(data: &ImageAnnotations) -> String {
    let classes = data.classes();
    let mut out = String::new();
    for ann in &data.annotations {
        let (cx, cy) = ann.rect.center();
        let (w, h) = (ann.rect.width, ann.rect.height);
        let in_bounds = (0.0..=1.0).contains(&cx) && (0.0..=1.0).contains(&cy);
        let sized = w > YOLO_MIN_SIZE && w <= 1.0 && h > YOLO_MIN_SIZE && h <= 1.0;
        if !(in_bounds && sized) {
            log::warn!("Skipping annotation {} in YOLO export: box out of range", ann.id);
            continue;
        }
        let Some(class) = classes.iter().position(|c| *c == ann.label) else {
            continue;
        };
        let _ = writeln!(out, "{} {:.6} {:.6} {:.6} {:.6}", class, cx, cy, w, h);
    }
    out
}

/// Render the class table matching the indices used by [`yolo_labels`].
pub fn yolo_dataset(data: &ImageAnnotations) -> Result<String> {
    let names: BTreeMap<usize, String> = data.classes().into_iter().enumerate().collect();
    let dataset = YoloDataset {
        nc: names.len(),
        names,
    };
    Ok(serde_yaml::to_string(&dataset)?)
}

/// Export annotations as a YOLO label file plus its `dataset.yaml`.
pub fn export_yolo(data: &ImageAnnotations, path: &Path) -> Result<()> {
    std::fs::write(path, yolo_labels(data))?;
    let dataset_path = path.with_file_name(YOLO_DATASET_FILE);
    std::fs::write(&dataset_path, yolo_dataset(data)?)?;
    log::debug!("Wrote YOLO class table to {}", dataset_path.display());
    Ok(())
}
