//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its identifiers.
//! - Validate owner identifiers at the type boundary.
//!
//! # Invariants
//! - `id`, `user_id` and `created_at` never change after insert.
//! - `content` is an opaque serialized markup string; core never parses it
//!   beyond preview extraction.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Store-assigned note identifier.
pub type NoteId = Uuid;

/// Opaque identifier of an authenticated principal.
///
/// Always non-blank. The value is kept exactly as issued; `" u1"` and
/// `"u1"` are different principals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ModelError::BlankUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Model-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    BlankUserId,
    InvalidNoteId(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUserId => write!(f, "user id must not be blank"),
            Self::InvalidNoteId(value) => write!(f, "invalid note id `{value}`"),
        }
    }
}

impl Error for ModelError {}

/// Parses a note id received from a UI host or route.
pub fn parse_note_id(value: &str) -> Result<NoteId, ModelError> {
    Uuid::parse_str(value.trim()).map_err(|_| ModelError::InvalidNoteId(value.to_string()))
}

/// One persisted note row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    /// Serialized rich-text markup, owned by the editor widget.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; refreshed on every update.
    pub updated_at: i64,
}

/// Insert payload; the store fills in id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

/// Current wall clock in epoch milliseconds.
///
/// Clocks set before 1970 read as `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
