//! SQLite bootstrap for the notes store.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections ready for the store layer.
//! - Own schema versioning through [`migrations`].
//!
//! # Invariants
//! - No store call runs against a connection whose migrations failed.
//! - Schema version lives in `PRAGMA user_version`.
//! - Every failure names the bootstrap stage it came from.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

/// Where a notes database failed to come up.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the file (or allocate the in-memory database).
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// A connection pragma was refused.
    Configure {
        setting: &'static str,
        source: rusqlite::Error,
    },
    ReadSchemaVersion(rusqlite::Error),
    /// Migration step `version` failed; the transaction was rolled back.
    Migrate {
        version: u32,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code written to `error_code=` in `db_open` events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Configure { .. } => "db_configure_failed",
            Self::ReadSchemaVersion(_) => "db_schema_read_failed",
            Self::Migrate { .. } => "db_migrate_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "cannot open {mode} notes database: {source}")
            }
            Self::Configure { setting, source } => {
                write!(f, "cannot set `{setting}` on notes database: {source}")
            }
            Self::ReadSchemaVersion(source) => {
                write!(f, "cannot read notes schema version: {source}")
            }
            Self::Migrate { version, source } => {
                write!(f, "notes schema step {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes database is at schema {db_version}, this build only knows up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Configure { source, .. }
            | Self::ReadSchemaVersion(source)
            | Self::Migrate { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}
