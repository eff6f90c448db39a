// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! Persisted annotations are stored with fractional coordinates (0.0 to 1.0)
//! relative to the image, so they survive any change of display size.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to an annotation by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub i64);

/// Identifier of the image being annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub i64);

/// Identifier of the dataset that owns the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub i64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rectangle in fractional image coordinates.
///
/// `x`/`y` is the top-left corner. The store is authoritative about
/// `x + width <= 1`; nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Centre of the box, in fractional coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A labeled rectangle persisted on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub label: String,
    #[serde(flatten)]
    pub rect: NormRect,
}

impl Annotation {
    /// Build the persisted record from a submitted annotation and the id
    /// the store assigned to it.
    pub fn from_new(id: AnnotationId, new: NewAnnotation) -> Self {
        Self {
            id,
            label: new.label,
            rect: new.rect,
        }
    }
}

/// An annotation that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnnotation {
    pub label: String,
    #[serde(flatten)]
    pub rect: NormRect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_json_is_flat() {
        let ann = Annotation {
            id: AnnotationId(7),
            label: "car".to_string(),
            rect: NormRect::new(0.1, 0.2, 0.3, 0.4),
        };
        let value = serde_json::to_value(&ann).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["label"], "car");
        assert_eq!(value["x"], 0.1);
        assert_eq!(value["height"], 0.4);
    }

    #[test]
    fn test_annotation_from_store_payload() {
        let json = r#"{"id": 3, "label": "dog", "x": 0.5, "y": 0.25, "width": 0.1, "height": 0.2}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(ann.id, AnnotationId(3));
        assert_eq!(ann.rect, NormRect::new(0.5, 0.25, 0.1, 0.2));
    }

    #[test]
    fn test_center() {
        let rect = NormRect::new(0.2, 0.4, 0.2, 0.2);
        let (cx, cy) = rect.center();
        assert!((cx - 0.3).abs() < 1e-12);
        assert!((cy - 0.5).abs() < 1e-12);
    }
}
