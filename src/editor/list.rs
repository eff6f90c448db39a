// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sidebar list of saved annotations.

use crate::models::annotation::{Annotation, AnnotationId};

/// One row of the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// 1-based position shown in the badge.
    pub number: usize,
    pub id: AnnotationId,
    pub label: String,
}

/// Build the list from scratch. The list is always a full replacement.
pub fn build_entries(annotations: &[Annotation]) -> Vec<ListEntry> {
    annotations
        .iter()
        .enumerate()
        .map(|(i, ann)| ListEntry {
            number: i + 1,
            id: ann.id,
            label: ann.label.clone(),
        })
        .collect()
}
