// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Contract with the remote annotation store.
//!
//! The editor never talks HTTP directly; it goes through [`RemoteStore`] so
//! that tests can substitute an in-memory store.

use crate::models::annotation::{Annotation, AnnotationId, DatasetId, ImageId, NewAnnotation};
use serde::{Deserialize, Serialize};

/// Transport-level failures: the call did not produce a usable answer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never completed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded.
    #[error("malformed store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A mutating call was attempted without a CSRF token.
    #[error("no CSRF token available")]
    MissingCsrfToken,
}

/// Envelope returned by the fetch-annotations call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationList {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Answer to a create call. `success: false` is a structured refusal,
/// not a transport failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<AnnotationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Annotation progress of a dataset. Every field is optional because the
/// editor only logs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(default)]
    pub total_images: Option<u64>,
    #[serde(default)]
    pub annotated_images: Option<u64>,
    #[serde(default)]
    pub progress: Option<u8>,
}

/// The four calls the editor makes against the store.
///
/// Implementations block; callers run them off the UI thread through
/// [`crate::io::requests::RequestQueue`].
pub trait RemoteStore: Send + Sync {
    fn fetch_annotations(&self, image: ImageId) -> Result<Vec<Annotation>, StoreError>;

    fn create_annotation(
        &self,
        image: ImageId,
        annotation: &NewAnnotation,
    ) -> Result<CreateResponse, StoreError>;

    fn delete_annotation(&self, id: AnnotationId) -> Result<DeleteResponse, StoreError>;

    fn fetch_progress(&self, dataset: DatasetId) -> Result<ProgressReport, StoreError>;
}

#[cfg(test)]
pub mod fake {
    //! In-memory store used by editor tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inner {
        annotations: Vec<Annotation>,
        next_id: i64,
        reject_creates: bool,
        fail_transport: bool,
        calls: Vec<&'static str>,
    }

    /// A store that keeps records in memory and records every call.
    #[derive(Default)]
    pub struct FakeStore {
        inner: Mutex<Inner>,
    }

    impl FakeStore {
        pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
            let next_id = annotations.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
            Self {
                inner: Mutex::new(Inner {
                    annotations,
                    next_id,
                    ..Inner::default()
                }),
            }
        }

        /// Make the next ids handed out start at `id`.
        pub fn set_next_id(&self, id: i64) {
            self.inner.lock().unwrap().next_id = id;
        }

        /// Answer creates with `success: false`.
        pub fn reject_creates(&self) {
            self.inner.lock().unwrap().reject_creates = true;
        }

        /// Fail every call at the transport level.
        pub fn fail_transport(&self) {
            self.inner.lock().unwrap().fail_transport = true;
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.inner.lock().unwrap().calls.clone()
        }

        pub fn stored(&self) -> Vec<Annotation> {
            self.inner.lock().unwrap().annotations.clone()
        }

        fn enter(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(call);
            if inner.fail_transport {
                return Err(StoreError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(inner)
        }
    }

    impl RemoteStore for FakeStore {
        fn fetch_annotations(&self, _image: ImageId) -> Result<Vec<Annotation>, StoreError> {
            let inner = self.enter("fetch")?;
            Ok(inner.annotations.clone())
        }

        fn create_annotation(
            &self,
            _image: ImageId,
            annotation: &NewAnnotation,
        ) -> Result<CreateResponse, StoreError> {
            let mut inner = self.enter("create")?;
            if inner.reject_creates {
                return Ok(CreateResponse {
                    success: false,
                    errors: Some(serde_json::json!("label: too long")),
                    ..CreateResponse::default()
                });
            }
            let id = AnnotationId(inner.next_id);
            inner.next_id += 1;
            inner.annotations.push(Annotation::from_new(id, annotation.clone()));
            Ok(CreateResponse {
                success: true,
                annotation_id: Some(id),
                label: Some(annotation.label.clone()),
                errors: None,
            })
        }

        fn delete_annotation(&self, id: AnnotationId) -> Result<DeleteResponse, StoreError> {
            let mut inner = self.enter("delete")?;
            let before = inner.annotations.len();
            inner.annotations.retain(|a| a.id != id);
            Ok(DeleteResponse {
                success: inner.annotations.len() != before,
            })
        }

        fn fetch_progress(&self, _dataset: DatasetId) -> Result<ProgressReport, StoreError> {
            let _inner = self.enter("progress")?;
            Ok(ProgressReport {
                total_images: Some(10),
                annotated_images: Some(1),
                progress: Some(10),
            })
        }
    }
}
