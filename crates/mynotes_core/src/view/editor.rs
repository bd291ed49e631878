//! Editor controller: create a new note or edit an existing one.
//!
//! # Invariants
//! - Edit mode issues exactly one `get_by_id` per mount and accepts no
//!   field edits until it has finished.
//! - At most one save is in flight; a second submit is refused.
//! - Blank title or content never reaches the data service.

use crate::model::note::{Note, NoteId, UserId};
use crate::service::notes_service::NotesService;
use crate::session::Session;
use crate::store::{NoteStore, StoreError, StoreResult};
use crate::view::{
    Notice, MSG_FIELDS_REQUIRED, MSG_LOAD_NOTE_FAILED, MSG_NOTE_SAVED, MSG_NOTE_UPDATED,
    MSG_SAVE_FAILED,
};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Initial body of a fresh note.
pub const CONTENT_PLACEHOLDER: &str = "<p>Start typing...</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit(NoteId),
}

/// Where the host should go after an editor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Stay,
    NavigateToDashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Title or content is blank after trimming.
    Validation,
    SaveInFlight,
    /// The note is still being fetched.
    Loading,
    /// `begin_load` on an editor for a new note.
    NothingToLoad,
    /// The note was already fetched for this editor.
    AlreadyLoaded,
    Store(StoreError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => f.write_str(MSG_FIELDS_REQUIRED),
            Self::SaveInFlight => write!(f, "a save is already in progress"),
            Self::Loading => write!(f, "note is still loading"),
            Self::NothingToLoad => write!(f, "a new note has nothing to load"),
            Self::AlreadyLoaded => write!(f, "note was already loaded"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Validated write produced by [`EditorView::begin_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create {
        user_id: UserId,
        title: String,
        content: String,
    },
    Update {
        note_id: NoteId,
        title: String,
        content: String,
    },
}

impl SaveRequest {
    pub fn execute<S: NoteStore>(&self, service: &NotesService<S>) -> StoreResult<Note> {
        match self {
            Self::Create {
                user_id,
                title,
                content,
            } => service.create(user_id, title.as_str(), content.as_str()),
            Self::Update {
                note_id,
                title,
                content,
            } => service.update(*note_id, title.as_str(), content.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    NotStarted,
    InFlight,
    Finished,
}

#[derive(Debug)]
pub struct EditorView {
    mode: EditorMode,
    title: String,
    content: String,
    load: LoadState,
    saving: bool,
    notices: Vec<Notice>,
}

impl EditorView {
    /// Blank editor seeded with the placeholder body.
    pub fn new_note() -> Self {
        Self {
            mode: EditorMode::New,
            title: String::new(),
            content: CONTENT_PLACEHOLDER.to_string(),
            load: LoadState::Finished,
            saving: false,
            notices: Vec::new(),
        }
    }

    /// Editor for an existing note; loading until [`EditorView::finish_load`].
    pub fn edit(note_id: NoteId) -> Self {
        Self {
            mode: EditorMode::Edit(note_id),
            title: String::new(),
            content: String::new(),
            load: LoadState::NotStarted,
            saving: false,
            notices: Vec::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// True until the note under edit has been fetched once.
    pub fn is_loading(&self) -> bool {
        self.load != LoadState::Finished
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Fetches the note under edit: begin, execute, finish.
    pub fn load<S: NoteStore>(
        &mut self,
        service: &NotesService<S>,
    ) -> Result<EditorOutcome, EditorError> {
        let note_id = self.begin_load()?;
        let result = service.get_by_id(note_id);
        Ok(self.finish_load(result))
    }

    /// Returns the id to fetch. Only edit mode loads, and only once.
    pub fn begin_load(&mut self) -> Result<NoteId, EditorError> {
        let EditorMode::Edit(note_id) = self.mode else {
            return Err(EditorError::NothingToLoad);
        };
        if self.saving {
            return Err(EditorError::SaveInFlight);
        }
        match self.load {
            LoadState::NotStarted => {
                self.load = LoadState::InFlight;
                Ok(note_id)
            }
            LoadState::InFlight => Err(EditorError::Loading),
            LoadState::Finished => Err(EditorError::AlreadyLoaded),
        }
    }

    /// Applies a finished fetch.
    ///
    /// A missing note leaves the fields blank; a failed fetch queues a notice
    /// and sends the host back to the dashboard.
    pub fn finish_load(&mut self, result: StoreResult<Option<Note>>) -> EditorOutcome {
        self.load = LoadState::Finished;
        match result {
            Ok(Some(note)) => {
                debug!(
                    "event=editor_load module=view status=ok note_id={}",
                    note.id
                );
                self.title = note.title;
                self.content = note.content;
                EditorOutcome::Stay
            }
            Ok(None) => {
                debug!("event=editor_load module=view status=ok found=false");
                EditorOutcome::Stay
            }
            Err(err) => {
                warn!("event=editor_load module=view status=error error={err}");
                self.notices.push(Notice::error(MSG_LOAD_NOTE_FAILED));
                EditorOutcome::NavigateToDashboard
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), EditorError> {
        if self.is_loading() {
            return Err(EditorError::Loading);
        }
        self.title = title.into();
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), EditorError> {
        if self.is_loading() {
            return Err(EditorError::Loading);
        }
        self.content = content.into();
        Ok(())
    }

    /// Validates the fields and marks a save as in flight.
    ///
    /// Fields are sent untrimmed; trimming only decides emptiness.
    pub fn begin_save(&mut self, session: &Session) -> Result<SaveRequest, EditorError> {
        if self.is_loading() {
            return Err(EditorError::Loading);
        }
        if self.saving {
            return Err(EditorError::SaveInFlight);
        }
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            self.notices.push(Notice::error(MSG_FIELDS_REQUIRED));
            return Err(EditorError::Validation);
        }
        self.saving = true;
        let title = self.title.clone();
        let content = self.content.clone();
        Ok(match self.mode {
            EditorMode::New => SaveRequest::Create {
                user_id: session.user_id().clone(),
                title,
                content,
            },
            EditorMode::Edit(note_id) => SaveRequest::Update {
                note_id,
                title,
                content,
            },
        })
    }

    /// Applies a finished write. On success the host navigates to the
    /// dashboard; on failure the fields stay as typed.
    pub fn finish_save(&mut self, result: StoreResult<Note>) -> Result<Note, EditorError> {
        self.saving = false;
        match result {
            Ok(note) => {
                let message = match self.mode {
                    EditorMode::New => MSG_NOTE_SAVED,
                    EditorMode::Edit(_) => MSG_NOTE_UPDATED,
                };
                info!(
                    "event=editor_save module=view status=ok note_id={}",
                    note.id
                );
                self.notices.push(Notice::success(message));
                Ok(note)
            }
            Err(err) => {
                warn!("event=editor_save module=view status=error error={err}");
                self.notices.push(Notice::error(MSG_SAVE_FAILED));
                Err(EditorError::Store(err))
            }
        }
    }

    /// Saves the current fields: begin, execute, finish.
    pub fn save<S: NoteStore>(
        &mut self,
        session: &Session,
        service: &NotesService<S>,
    ) -> Result<Note, EditorError> {
        let request = self.begin_save(session)?;
        let result = request.execute(service);
        self.finish_save(result)
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorError, EditorMode, EditorView, CONTENT_PLACEHOLDER};
    use crate::model::note::UserId;
    use crate::session::{Principal, Session};
    use crate::store::StoreError;
    use uuid::Uuid;

    fn session() -> Session {
        Session::new(Principal {
            user_id: UserId::parse("user-1").unwrap(),
            email: "a@example.com".to_string(),
        })
    }

    #[test]
    fn new_note_starts_with_placeholder() {
        let view = EditorView::new_note();
        assert_eq!(view.mode(), EditorMode::New);
        assert_eq!(view.content(), CONTENT_PLACEHOLDER);
        assert!(!view.is_loading());
    }

    #[test]
    fn edit_refuses_field_changes_until_loaded() {
        let mut view = EditorView::edit(Uuid::new_v4());
        assert_eq!(view.set_title("x"), Err(EditorError::Loading));
        view.finish_load(Ok(None));
        assert!(view.set_title("x").is_ok());
    }

    #[test]
    fn second_submit_is_refused_while_saving() {
        let mut view = EditorView::new_note();
        view.set_title("t").unwrap();
        let _request = view.begin_save(&session()).unwrap();
        assert_eq!(view.begin_save(&session()), Err(EditorError::SaveInFlight));
        let _ = view.finish_save(Err(StoreError::new("boom")));
        assert!(!view.is_saving());
    }
}
