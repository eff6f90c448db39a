// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The annotation form and its submission checks.
//!
//! Coordinates are held as text, the way they sit in form fields; the
//! draft fills them in and submission parses them back.

use crate::models::annotation::{NewAnnotation, NormRect};

/// Smallest fractional width or height a box may be submitted with.
pub const MIN_BOX_SIZE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Fill in every field and draw a bounding box")]
    MissingField(&'static str),

    #[error("Field {0} is not a number")]
    NotANumber(&'static str),

    #[error("The bounding box is too small")]
    TooSmall,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationForm {
    pub label: String,
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
}

impl AnnotationForm {
    /// Fill the coordinate fields from a finished draft.
    pub fn set_rect(&mut self, rect: &NormRect) {
        self.x = rect.x.to_string();
        self.y = rect.y.to_string();
        self.width = rect.width.to_string();
        self.height = rect.height.to_string();
    }

    pub fn clear_rect(&mut self) {
        self.x.clear();
        self.y.clear();
        self.width.clear();
        self.height.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the form and build the annotation to send.
    pub fn validate(&self) -> Result<NewAnnotation, ValidationError> {
        let label = self.label.trim();
        let fields = [
            ("label", label),
            ("x", self.x.trim()),
            ("y", self.y.trim()),
            ("width", self.width.trim()),
            ("height", self.height.trim()),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(ValidationError::MissingField(*name));
        }

        let x = parse("x", &self.x)?;
        let y = parse("y", &self.y)?;
        let width = parse("width", &self.width)?;
        let height = parse("height", &self.height)?;
        if width < MIN_BOX_SIZE || height < MIN_BOX_SIZE {
            return Err(ValidationError::TooSmall);
        }

        Ok(NewAnnotation {
            label: label.to_string(),
            rect: NormRect::new(x, y, width, height),
        })
    }
}

fn parse(name: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::NotANumber(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> AnnotationForm {
        let mut form = AnnotationForm {
            label: "truck".to_string(),
            ..AnnotationForm::default()
        };
        form.set_rect(&NormRect::new(0.125, 0.2, 0.25, 0.3));
        form
    }

    #[test]
    fn test_valid_form() {
        let new = filled().validate().unwrap();
        assert_eq!(new.label, "truck");
        assert_eq!(new.rect, NormRect::new(0.125, 0.2, 0.25, 0.3));
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let clears: [fn(&mut AnnotationForm); 5] = [
            |f| f.label.clear(),
            |f| f.x.clear(),
            |f| f.y.clear(),
            |f| f.width.clear(),
            |f| f.height.clear(),
        ];
        for clear in clears {
            let mut form = filled();
            clear(&mut form);
            assert!(matches!(form.validate(), Err(ValidationError::MissingField(_))));
        }
    }

    #[test]
    fn test_blank_label_is_missing() {
        let mut form = filled();
        form.label = "   ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingField("label")));
    }

    #[test]
    fn test_zero_origin_is_present() {
        let mut form = filled();
        form.x = "0".to_string();
        form.y = "0".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_too_small() {
        let mut form = filled();
        form.width = "0.009".to_string();
        assert_eq!(form.validate(), Err(ValidationError::TooSmall));

        let mut form = filled();
        form.height = "0".to_string();
        assert_eq!(form.validate(), Err(ValidationError::TooSmall));

        let mut form = filled();
        form.width = "0.01".to_string();
        form.height = "0.01".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_garbage_number() {
        let mut form = filled();
        form.y = "abc".to_string();
        assert_eq!(form.validate(), Err(ValidationError::NotANumber("y")));

        let mut form = filled();
        form.width = "NaN".to_string();
        assert_eq!(form.validate(), Err(ValidationError::NotANumber("width")));
    }
}
