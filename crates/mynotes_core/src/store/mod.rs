//! Remote store client contract for the `notes` table.
//!
//! # Responsibility
//! - Define the four primitive request shapes the data service may issue:
//!   filtered select, insert, filtered update, filtered delete.
//! - Carry store failures as one error type with the message untouched.
//!
//! # Invariants
//! - No raw query text crosses this boundary; callers only build
//!   [`NoteFilter`], [`NoteOrder`] and [`NotePatch`] values.
//! - Insert and update return the rows as persisted by the store.

use crate::model::note::{NewNote, Note, NoteId, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteNoteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by the store, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
    code: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Message exactly as the store reported it.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Optional machine-readable code (`sqlite` extended code name, or a
    /// row-count code raised by the data service).
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(code) => Self::with_code(format!("{code:?}"), value.to_string()),
            None => Self::new(value.to_string()),
        }
    }
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteFilter {
    Id(NoteId),
    UserId(UserId),
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteColumn {
    UpdatedAt,
    Title,
}

impl NoteColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

/// Result ordering for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteOrder {
    pub column: NoteColumn,
    pub ascending: bool,
}

impl NoteOrder {
    pub fn descending(column: NoteColumn) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Mutable columns for an update.
///
/// `updated_at = None` leaves the stored value to the store's own clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePatch {
    pub title: String,
    pub content: String,
    pub updated_at: Option<i64>,
}

/// Table-scoped client for the `notes` table.
pub trait NoteStore {
    /// Returns every row matching `filter`, in `order` when given.
    fn select(&self, filter: &NoteFilter, order: Option<NoteOrder>) -> StoreResult<Vec<Note>>;
    /// Inserts one row and returns what was stored.
    fn insert(&self, note: &NewNote) -> StoreResult<Vec<Note>>;
    /// Applies `patch` to every row matching `filter` and returns them.
    fn update(&self, filter: &NoteFilter, patch: &NotePatch) -> StoreResult<Vec<Note>>;
    /// Removes every row matching `filter`. Matching nothing is not an error.
    fn delete(&self, filter: &NoteFilter) -> StoreResult<()>;
}

impl<T: NoteStore + ?Sized> NoteStore for &T {
    fn select(&self, filter: &NoteFilter, order: Option<NoteOrder>) -> StoreResult<Vec<Note>> {
        (**self).select(filter, order)
    }

    fn insert(&self, note: &NewNote) -> StoreResult<Vec<Note>> {
        (**self).insert(note)
    }

    fn update(&self, filter: &NoteFilter, patch: &NotePatch) -> StoreResult<Vec<Note>> {
        (**self).update(filter, patch)
    }

    fn delete(&self, filter: &NoteFilter) -> StoreResult<()> {
        (**self).delete(filter)
    }
}
