// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gestures that draw the draft box.

use crate::models::draft::{DraftRect, PixelPoint};

/// Pointer input on the overlay, in overlay pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PixelPoint),
    Move(PixelPoint),
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
}

/// What a pointer event did to the draft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Ignored,
    Started,
    Resized,
    Finished(DraftRect),
}

/// The idle/dragging state machine plus the draft it edits.
#[derive(Debug, Default)]
pub struct Gesture {
    state: GestureState,
    draft: Option<DraftRect>,
}

impl Gesture {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn draft(&self) -> Option<&DraftRect> {
        self.draft.as_ref()
    }

    /// Feed one event. `drawing_enabled` gates every transition.
    pub fn handle(&mut self, event: PointerEvent, drawing_enabled: bool) -> GestureOutcome {
        if !drawing_enabled {
            return GestureOutcome::Ignored;
        }
        match (self.state, event) {
            (GestureState::Idle, PointerEvent::Down(pos)) => {
                self.state = GestureState::Dragging;
                self.draft = Some(DraftRect::at(pos));
                GestureOutcome::Started
            }
            (GestureState::Dragging, PointerEvent::Move(pos)) => match self.draft.as_mut() {
                Some(draft) => {
                    draft.stretch_to(pos);
                    GestureOutcome::Resized
                }
                None => GestureOutcome::Ignored,
            },
            (GestureState::Dragging, PointerEvent::Up) => {
                self.state = GestureState::Idle;
                match self.draft {
                    Some(draft) => GestureOutcome::Finished(draft),
                    None => GestureOutcome::Ignored,
                }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Leave any drag without finishing it. The draft stays as drawn.
    pub fn abandon_drag(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn clear(&mut self) {
        self.state = GestureState::Idle;
        self.draft = None;
    }

    /// Rescale the draft after the overlay changed size.
    pub fn rescale(&mut self, sx: f64, sy: f64) {
        if let Some(draft) = self.draft.as_mut() {
            *draft = draft.scaled(sx, sy);
        }
    }
}
