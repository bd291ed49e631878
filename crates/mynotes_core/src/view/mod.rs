//! View controllers for the dashboard and editor screens.
//!
//! # Responsibility
//! - Sequence data-service calls for user actions and hold each screen's
//!   transient copy of fetched notes.
//! - Report outcomes as one-line [`Notice`] values for the host to show.
//!
//! # Invariants
//! - Controllers never retry; every failure is caught at the action that
//!   triggered it and leaves prior state untouched.
//! - Long-running actions are split into `begin_*` / `finish_*` so the
//!   pending window is observable and duplicate submissions are refused.

pub mod dashboard;
pub mod editor;

pub const MSG_LOAD_NOTES_FAILED: &str = "Failed to load notes";
pub const MSG_LOAD_NOTE_FAILED: &str = "Failed to load note";
pub const MSG_SAVE_FAILED: &str = "Failed to save note";
pub const MSG_DELETE_FAILED: &str = "Failed to delete note";
pub const MSG_FIELDS_REQUIRED: &str = "Title and content are required";
pub const MSG_NOTE_SAVED: &str = "Note saved!";
pub const MSG_NOTE_UPDATED: &str = "Note updated!";
pub const MSG_NOTE_DELETED: &str = "Note deleted!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient one-line message produced by a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
