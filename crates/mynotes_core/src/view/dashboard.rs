//! Dashboard controller: the signed-in user's note list.
//!
//! # Invariants
//! - One activation issues exactly one `list` call.
//! - Nothing is listed while a load is pending.
//! - A note leaves the held list only after the remote delete succeeded.

use crate::format::{content_preview, format_relative_time};
use crate::model::note::{Note, NoteId, UserId};
use crate::service::notes_service::NotesService;
use crate::session::Session;
use crate::store::{NoteStore, StoreError, StoreResult};
use crate::view::{Notice, MSG_DELETE_FAILED, MSG_LOAD_NOTES_FAILED, MSG_NOTE_DELETED};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A load is already pending.
    LoadInFlight,
    /// The id is not in the held list.
    NoteNotListed(NoteId),
    /// `confirm_delete` without a prior `request_delete`.
    NoDeletePending,
    Store(StoreError),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadInFlight => write!(f, "notes are already loading"),
            Self::NoteNotListed(id) => write!(f, "note {id} is not on the dashboard"),
            Self::NoDeletePending => write!(f, "no delete is awaiting confirmation"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Pending list request produced by [`DashboardView::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    user_id: UserId,
}

impl LoadRequest {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn execute<S: NoteStore>(&self, service: &NotesService<S>) -> StoreResult<Vec<Note>> {
        service.list(&self.user_id)
    }
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub preview: Option<String>,
    pub updated_label: String,
}

impl NoteSummary {
    pub fn from_note(note: &Note, now_ms: i64) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            preview: content_preview(&note.content),
            updated_label: format_relative_time(note.updated_at, now_ms),
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardView {
    notes: Vec<Note>,
    loading: bool,
    pending_delete: Option<NoteId>,
    notices: Vec<Notice>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the session user's notes: begin, execute, finish.
    pub fn activate<S: NoteStore>(
        &mut self,
        session: &Session,
        service: &NotesService<S>,
    ) -> Result<(), DashboardError> {
        let request = self.begin_load(session)?;
        let result = request.execute(service);
        self.finish_load(result)
    }

    /// Marks the view as loading and returns the request to run.
    pub fn begin_load(&mut self, session: &Session) -> Result<LoadRequest, DashboardError> {
        if self.loading {
            return Err(DashboardError::LoadInFlight);
        }
        self.loading = true;
        Ok(LoadRequest {
            user_id: session.user_id().clone(),
        })
    }

    /// Applies a finished list call.
    ///
    /// Failure queues a notice and keeps whatever was held before.
    pub fn finish_load(&mut self, result: StoreResult<Vec<Note>>) -> Result<(), DashboardError> {
        self.loading = false;
        match result {
            Ok(notes) => {
                debug!(
                    "event=dashboard_load module=view status=ok count={}",
                    notes.len()
                );
                if let Some(pending) = self.pending_delete {
                    if !notes.iter().any(|note| note.id == pending) {
                        self.pending_delete = None;
                    }
                }
                self.notes = notes;
                Ok(())
            }
            Err(err) => {
                warn!("event=dashboard_load module=view status=error error={err}");
                self.notices.push(Notice::error(MSG_LOAD_NOTES_FAILED));
                Err(DashboardError::Store(err))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Held notes; empty while a load is pending.
    pub fn notes(&self) -> &[Note] {
        if self.loading {
            &[]
        } else {
            self.notes.as_slice()
        }
    }

    /// Rows for rendering, labelled relative to `now_ms`.
    pub fn items(&self, now_ms: i64) -> Vec<NoteSummary> {
        self.notes()
            .iter()
            .map(|note| NoteSummary::from_note(note, now_ms))
            .collect()
    }

    /// True when loaded and there is nothing to show.
    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.notes.is_empty()
    }

    /// Opens the delete confirmation for a listed note.
    pub fn request_delete(&mut self, note_id: NoteId) -> Result<(), DashboardError> {
        if !self.notes.iter().any(|note| note.id == note_id) {
            return Err(DashboardError::NoteNotListed(note_id));
        }
        self.pending_delete = Some(note_id);
        Ok(())
    }

    /// Note awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&Note> {
        let pending = self.pending_delete?;
        self.notes.iter().find(|note| note.id == pending)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the note awaiting confirmation.
    ///
    /// On failure the list and the open confirmation stay as they were.
    pub fn confirm_delete<S: NoteStore>(
        &mut self,
        service: &NotesService<S>,
    ) -> Result<(), DashboardError> {
        let note_id = self.pending_delete.ok_or(DashboardError::NoDeletePending)?;
        match service.delete(note_id) {
            Ok(()) => {
                self.notes.retain(|note| note.id != note_id);
                self.pending_delete = None;
                self.notices.push(Notice::success(MSG_NOTE_DELETED));
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=dashboard_delete module=view status=error note_id={note_id} error={err}"
                );
                self.notices.push(Notice::error(MSG_DELETE_FAILED));
                Err(DashboardError::Store(err))
            }
        }
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
