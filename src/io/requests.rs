// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remote calls as explicit, tokened tasks.
//!
//! Every call gets a monotonic [`RequestToken`]. Calls run on a background
//! thread and their results come back over a channel that the UI loop
//! drains each frame. Completions may arrive in any order; nothing is
//! cancelled or retried.

use crate::io::remote::{CreateResponse, DeleteResponse, ProgressReport, RemoteStore, StoreError};
use crate::models::annotation::{Annotation, AnnotationId, DatasetId, ImageId, NewAnnotation};
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Identifies one issued call. Later calls have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A call to make against the store.
#[derive(Debug, Clone)]
pub enum Request {
    FetchAnnotations(ImageId),
    Create(ImageId, NewAnnotation),
    Delete(AnnotationId),
    FetchProgress(DatasetId),
}

/// What a call produced. Requests that the editor needs to finish the job
/// (the submitted annotation, the deleted id) travel with the result.
#[derive(Debug)]
pub enum Outcome {
    Fetched(Result<Vec<Annotation>, StoreError>),
    Created(NewAnnotation, Result<CreateResponse, StoreError>),
    Deleted(AnnotationId, Result<DeleteResponse, StoreError>),
    Progress(Result<ProgressReport, StoreError>),
}

#[derive(Debug)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: Outcome,
}

/// Where calls execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One background thread per call.
    Background,
    /// On the calling thread; the completion is queued before `issue` returns.
    Inline,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Issues calls and collects their completions.
pub struct RequestQueue {
    store: Arc<dyn RemoteStore>,
    dispatch: Dispatch,
    next_token: u64,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    waker: Option<Waker>,
}

impl RequestQueue {
    pub fn new(store: Arc<dyn RemoteStore>, dispatch: Dispatch) -> Self {
        let (sender, receiver) = channel();
        Self {
            store,
            dispatch,
            next_token: 0,
            sender,
            receiver,
            waker: None,
        }
    }

    /// Called after each background completion is queued, so an idle UI
    /// loop knows to poll.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Start a call and return its token.
    pub fn issue(&mut self, request: Request) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        log::debug!("Issuing request {}: {:?}", token, request);

        match self.dispatch {
            Dispatch::Inline => {
                let outcome = execute(self.store.as_ref(), request);
                let _ = self.sender.send(Completion { token, outcome });
            }
            Dispatch::Background => {
                let store = Arc::clone(&self.store);
                let sender = self.sender.clone();
                let waker = self.waker.clone();
                std::thread::spawn(move || {
                    let outcome = execute(store.as_ref(), request);
                    let _ = sender.send(Completion { token, outcome });
                    if let Some(wake) = waker {
                        wake();
                    }
                });
            }
        }

        token
    }

    /// Next finished call, if any. Never blocks.
    pub fn try_next(&self) -> Option<Completion> {
        self.receiver.try_recv().ok()
    }
}

fn execute(store: &dyn RemoteStore, request: Request) -> Outcome {
    match request {
        Request::FetchAnnotations(image) => Outcome::Fetched(store.fetch_annotations(image)),
        Request::Create(image, annotation) => {
            let result = store.create_annotation(image, &annotation);
            Outcome::Created(annotation, result)
        }
        Request::Delete(id) => Outcome::Deleted(id, store.delete_annotation(id)),
        Request::FetchProgress(dataset) => Outcome::Progress(store.fetch_progress(dataset)),
    }
}
