// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Exportable snapshot of one image's annotations.

use super::annotation::{Annotation, ImageId};
use serde::{Deserialize, Serialize};

/// The annotations of one image, as written to export files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotations {
    pub image_id: ImageId,
    pub image_file: String,
    pub annotations: Vec<Annotation>,
}

impl ImageAnnotations {
    pub fn new(image_id: ImageId, image_file: String, annotations: Vec<Annotation>) -> Self {
        Self {
            image_id,
            image_file,
            annotations,
        }
    }

    /// Distinct labels in sorted order; a label's position is its class index.
    pub fn classes(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.annotations.iter().map(|a| a.label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
