//! Core of the mynotes application: note storage, the notes data service,
//! screen controllers and the session shell.

pub mod config;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod theme;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use format::{content_preview, format_relative_time};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, parse_level,
    LogSettings, LoggingError,
};
pub use model::note::{now_epoch_ms, parse_note_id, ModelError, NewNote, Note, NoteId, UserId};
pub use service::notes_service::NotesService;
pub use session::{
    AppShell, AuthError, AuthProvider, Gate, HeaderModel, Principal, Route, Session, SessionState,
};
pub use store::{NoteStore, SqliteNoteStore, StoreError, StoreResult};
pub use theme::{Theme, ThemeError, ThemePreference};
pub use view::dashboard::{DashboardError, DashboardView, NoteSummary};
pub use view::editor::{EditorError, EditorMode, EditorOutcome, EditorView, SaveRequest};
pub use view::{Notice, NoticeLevel};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
