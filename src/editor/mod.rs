// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The annotation editor.
//!
//! [`AnnotationEditor`] owns everything about the image being annotated:
//! the saved boxes, the draft, the form, the sidebar list and the
//! notifications. It turns pointer events into a draft box, sends create
//! and delete calls to the store, and applies their results when they come
//! back. It never blocks and never touches a window; the UI feeds it events
//! and asks it to render.
//!
//! The collection only changes after the store confirms a change, so a
//! failed call never needs rolling back.

pub mod form;
pub mod gesture;
pub mod list;
pub mod notify;

use crate::io::remote::{CreateResponse, DeleteResponse, ProgressReport, StoreError};
use crate::io::requests::{Completion, Outcome, Request, RequestQueue, RequestToken};
use crate::models::annotation::{Annotation, AnnotationId, DatasetId, ImageId, NewAnnotation};
use crate::models::draft::DraftRect;
use crate::models::image_set::ImageAnnotations;
use crate::render::{self, RenderSurface};
use crate::util::geometry::{normalize_draft, OverlaySize};
use form::{AnnotationForm, ValidationError};
use gesture::{Gesture, GestureOutcome, GestureState, PointerEvent};
use list::{build_entries, ListEntry};
use notify::{NotificationKind, Notifications};
use std::collections::HashSet;

/// Which image and dataset the editor works on. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub image: ImageId,
    pub dataset: DatasetId,
}

/// Live position/size read-out of the draft, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readout {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Readout {
    fn of(draft: &DraftRect) -> Self {
        let rect = draft.normalized();
        Self {
            x: rect.x.round() as i64,
            y: rect.y.round() as i64,
            width: rect.width.round() as i64,
            height: rect.height.round() as i64,
        }
    }
}

/// Ids deleted while the initial fetch was still in flight; the fetch
/// result must not bring them back.
#[derive(Debug, Default)]
struct FetchGuard {
    deleted: HashSet<AnnotationId>,
}

pub struct AnnotationEditor {
    session: Session,
    queue: RequestQueue,
    annotations: Vec<Annotation>,
    gesture: Gesture,
    drawing_enabled: bool,
    overlay: OverlaySize,
    initialized: bool,
    form: AnnotationForm,
    readout: Readout,
    entries: Vec<ListEntry>,
    notifications: Notifications,
    pending: HashSet<RequestToken>,
    fetch_guard: Option<FetchGuard>,
    confirm_delete: Option<AnnotationId>,
    last_progress: Option<ProgressReport>,
    needs_redraw: bool,
}

impl AnnotationEditor {
    pub fn new(session: Session, queue: RequestQueue) -> Self {
        Self {
            session,
            queue,
            annotations: Vec::new(),
            gesture: Gesture::default(),
            drawing_enabled: false,
            overlay: OverlaySize::new(0.0, 0.0),
            initialized: false,
            form: AnnotationForm::default(),
            readout: Readout::default(),
            entries: Vec::new(),
            notifications: Notifications::default(),
            pending: HashSet::new(),
            fetch_guard: None,
            confirm_delete: None,
            last_progress: None,
            needs_redraw: true,
        }
    }

    // ---- accessors ----

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn draft(&self) -> Option<&DraftRect> {
        self.gesture.draft()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    pub fn overlay(&self) -> OverlaySize {
        self.overlay
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn form(&self) -> &AnnotationForm {
        &self.form
    }

    /// The label field is the only one the user types into.
    pub fn label_mut(&mut self) -> &mut String {
        &mut self.form.label
    }

    pub fn readout(&self) -> Readout {
        self.readout
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// The annotation awaiting delete confirmation, if any.
    pub fn pending_confirmation(&self) -> Option<AnnotationId> {
        self.confirm_delete
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    pub fn last_progress(&self) -> Option<&ProgressReport> {
        self.last_progress.as_ref()
    }

    /// Whether state changed since the last call. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Snapshot of the saved annotations for export.
    pub fn snapshot(&self, image_file: &str) -> ImageAnnotations {
        ImageAnnotations::new(self.session.image, image_file.to_string(), self.annotations.clone())
    }

    // ---- lifecycle ----

    /// Size the overlay to the displayed image and load its annotations.
    /// Only the first call has any effect.
    pub fn initialize(&mut self, overlay: OverlaySize) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.resize_overlay(overlay);
        self.fetch_guard = Some(FetchGuard::default());
        self.issue(Request::FetchAnnotations(self.session.image));
        log::info!("Editor initialized for image {}", self.session.image);
    }

    /// Match the overlay to the image's new rendered size.
    ///
    /// Saved boxes are fractional and need nothing; the draft is in pixels
    /// and is scaled so it stays over the same part of the image. An empty
    /// size (collapsed panel) is ignored so the last drawable size remains
    /// the reference for the next rescale.
    pub fn resize_overlay(&mut self, overlay: OverlaySize) {
        if overlay == self.overlay {
            return;
        }
        if overlay.is_empty() {
            log::debug!("Ignoring empty overlay {}x{}", overlay.width, overlay.height);
            return;
        }
        if !self.overlay.is_empty() {
            self.gesture.rescale(
                overlay.width / self.overlay.width,
                overlay.height / self.overlay.height,
            );
        }
        log::debug!("Overlay resized to {}x{}", overlay.width, overlay.height);
        self.overlay = overlay;
        self.needs_redraw = true;
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        render::render(surface, &self.annotations, self.gesture.draft(), self.overlay);
    }

    // ---- drawing ----

    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        if !enabled && self.gesture.state() == GestureState::Dragging {
            self.gesture.abandon_drag();
        }
        self.drawing_enabled = enabled;
        log::info!("Drawing mode {}", if enabled { "on" } else { "off" });
    }

    pub fn toggle_drawing(&mut self) {
        self.set_drawing_enabled(!self.drawing_enabled);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match self.gesture.handle(event, self.drawing_enabled) {
            GestureOutcome::Ignored => {}
            GestureOutcome::Started | GestureOutcome::Resized => {
                if let Some(draft) = self.gesture.draft() {
                    self.readout = Readout::of(draft);
                }
                self.needs_redraw = true;
            }
            GestureOutcome::Finished(draft) => {
                match normalize_draft(&draft, self.overlay) {
                    Some(rect) => {
                        self.form.set_rect(&rect);
                        log::debug!(
                            "Draft finished at ({:.4}, {:.4}) size {:.4}x{:.4}",
                            rect.x,
                            rect.y,
                            rect.width,
                            rect.height
                        );
                    }
                    None => log::warn!("Draft finished on an empty overlay; ignoring"),
                }
                self.needs_redraw = true;
            }
        }
    }

    /// Throw away the draft and its coordinates. The label is kept.
    pub fn clear_draft(&mut self) {
        self.gesture.clear();
        self.form.clear_rect();
        self.readout = Readout::default();
        self.needs_redraw = true;
    }

    // ---- create ----

    /// Validate the form and send it to the store.
    ///
    /// A validation failure shows a notification and sends nothing.
    pub fn submit(&mut self) -> Result<RequestToken, ValidationError> {
        let annotation = match self.form.validate() {
            Ok(annotation) => annotation,
            Err(err) => {
                log::info!("Submission rejected: {}", err);
                self.notifications.push(NotificationKind::Error, err.to_string());
                return Err(err);
            }
        };
        Ok(self.issue(Request::Create(self.session.image, annotation)))
    }

    // ---- delete ----

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: AnnotationId) {
        self.confirm_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Delete the annotation awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<RequestToken> {
        let id = self.confirm_delete.take()?;
        Some(self.issue(Request::Delete(id)))
    }

    // ---- completions ----

    /// Apply every finished call. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.queue.try_next() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    fn issue(&mut self, request: Request) -> RequestToken {
        let token = self.queue.issue(request);
        self.pending.insert(token);
        token
    }

    fn apply(&mut self, completion: Completion) {
        let Completion { token, outcome } = completion;
        if !self.pending.remove(&token) {
            log::warn!("Dropping completion for unknown request {}", token);
            return;
        }
        match outcome {
            Outcome::Fetched(result) => self.on_fetched(result),
            Outcome::Created(annotation, result) => self.on_created(annotation, result),
            Outcome::Deleted(id, result) => self.on_deleted(id, result),
            Outcome::Progress(result) => self.on_progress(result),
        }
    }

    fn on_fetched(&mut self, result: Result<Vec<Annotation>, StoreError>) {
        let guard = self.fetch_guard.take().unwrap_or_default();
        match result {
            Ok(fetched) => {
                let mut merged: Vec<Annotation> = fetched
                    .into_iter()
                    .filter(|a| !guard.deleted.contains(&a.id))
                    .collect();
                for local in self.annotations.drain(..) {
                    if !merged.iter().any(|a| a.id == local.id) {
                        merged.push(local);
                    }
                }
                self.annotations = merged;
                log::info!("Loaded {} annotations", self.annotations.len());
            }
            Err(err) => {
                log::error!("Error loading annotations: {}", err);
            }
        }
        self.collection_changed();
    }

    fn on_created(&mut self, annotation: NewAnnotation, result: Result<CreateResponse, StoreError>) {
        match result {
            Ok(CreateResponse {
                success: true,
                annotation_id: Some(id),
                ..
            }) => {
                self.annotations.push(Annotation::from_new(id, annotation));
                self.gesture.clear();
                self.form.reset();
                self.readout = Readout::default();
                self.collection_changed();
                self.refresh_progress();
                self.notifications
                    .push(NotificationKind::Success, "Annotation saved");
                log::info!("Saved annotation {}, total: {}", id, self.annotations.len());
            }
            Ok(CreateResponse { success: true, .. }) => {
                log::error!("Store accepted the annotation but returned no id");
            }
            Ok(CreateResponse { errors, .. }) => {
                self.notifications
                    .push(NotificationKind::Error, "Failed to save annotation");
                log::error!("Save error: {:?}", errors);
            }
            Err(err) => {
                log::error!("Error saving annotation: {}", err);
            }
        }
    }

    fn on_deleted(&mut self, id: AnnotationId, result: Result<DeleteResponse, StoreError>) {
        match result {
            Ok(DeleteResponse { success: true }) => {
                if let Some(guard) = self.fetch_guard.as_mut() {
                    guard.deleted.insert(id);
                }
                self.annotations.retain(|a| a.id != id);
                self.collection_changed();
                self.refresh_progress();
                log::info!("Deleted annotation {}, total: {}", id, self.annotations.len());
            }
            Ok(DeleteResponse { success: false }) => {
                log::error!("Store refused to delete annotation {}", id);
            }
            Err(err) => {
                log::error!("Error deleting annotation {}: {}", id, err);
            }
        }
    }

    fn on_progress(&mut self, result: Result<ProgressReport, StoreError>) {
        match result {
            Ok(report) => {
                log::info!("Progress updated: {:?}", report);
                self.last_progress = Some(report);
            }
            Err(err) => log::warn!("Error fetching progress: {}", err),
        }
    }

    fn refresh_progress(&mut self) {
        self.issue(Request::FetchProgress(self.session.dataset));
    }

    fn collection_changed(&mut self) {
        self.entries = build_entries(&self.annotations);
        self.needs_redraw = true;
    }
}
