//! FFI use-case API for UI-host calls.
//!
//! # Responsibility
//! - Expose the notes use-cases to the host via FRB as plain envelopes.
//! - Route saves through the editor controller so host and core share one
//!   validation path.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection from [`AppConfig`]; no state is
//!   kept between calls.

use log::warn;
use mynotes_core::db::open_db;
use mynotes_core::view::MSG_NOTE_DELETED;
use mynotes_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, now_epoch_ms, parse_level, parse_note_id, ping as ping_inner,
    AppConfig, EditorOutcome, EditorView, Note, NoteSummary, NotesService, Principal, Session,
    SqliteNoteStore, ThemePreference, UserId,
};
use std::path::Path;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let result = parse_level(&level)
        .and_then(|level| init_logging_inner(level, Path::new(log_dir.trim())));
    match result {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Initializes logging from the `MYNOTES_LOG_LEVEL` / `MYNOTES_LOG_DIR`
/// environment, the same settings every other call reads its paths from.
///
/// # FFI contract
/// - Same return convention as [`init_logging`].
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging_from_env() -> String {
    let result = load_config()
        .and_then(|config| init_logging_from_config(&config).map_err(|err| err.to_string()));
    match result {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub note_id: String,
    pub title: String,
    /// Plain-text excerpt of the content, if any text is left.
    pub preview: Option<String>,
    /// Relative label such as `5 minutes ago`.
    pub updated_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    /// Most recently updated first.
    pub items: Vec<NoteListItem>,
    pub message: String,
}

/// Full note for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetail {
    pub note_id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetailResponse {
    pub ok: bool,
    /// `None` with `ok == true` means no such note.
    pub note: Option<NoteDetail>,
    pub message: String,
}

/// Result of a save or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note_id: Option<String>,
    /// One-line message suitable for a toast.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub ok: bool,
    /// `light` or `dark`.
    pub theme: String,
    pub message: String,
}

/// Lists the user's notes as dashboard rows.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(user_id: String) -> NotesListResponse {
    let result = parse_user_id(&user_id).and_then(|user_id| {
        with_notes_service(|service| service.list(&user_id).map_err(|err| err.to_string()))
    });
    match result {
        Ok(notes) => {
            let now_ms = now_epoch_ms();
            let items = notes
                .iter()
                .map(|note| to_list_item(NoteSummary::from_note(note, now_ms)))
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes yet.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Fetches one note for the editor.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - An unknown id is `ok` with `note == None`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_get(note_id: String) -> NoteDetailResponse {
    let result = parse_id(&note_id).and_then(|note_id| {
        with_notes_service(|service| service.get_by_id(note_id).map_err(|err| err.to_string()))
    });
    match result {
        Ok(Some(note)) => NoteDetailResponse {
            ok: true,
            note: Some(to_detail(note)),
            message: String::new(),
        },
        Ok(None) => NoteDetailResponse {
            ok: true,
            note: None,
            message: "Note not found.".to_string(),
        },
        Err(err) => NoteDetailResponse {
            ok: false,
            note: None,
            message: format!("note_get failed: {err}"),
        },
    }
}

/// Creates (`note_id == None`) or updates a note through the editor flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Blank title or content is rejected without touching the store.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(
    user_id: String,
    note_id: Option<String>,
    title: String,
    content: String,
) -> NoteActionResponse {
    let result = parse_user_id(&user_id).and_then(|user_id| {
        let note_id = note_id.as_deref().map(parse_id).transpose()?;
        let session = Session::new(Principal {
            user_id,
            email: String::new(),
        });
        with_notes_service(|service| {
            let mut editor = match note_id {
                Some(note_id) => {
                    let mut editor = EditorView::edit(note_id);
                    let outcome = editor.load(service).map_err(|err| err.to_string())?;
                    if outcome == EditorOutcome::NavigateToDashboard {
                        return Ok(NoteActionResponse::failure(last_notice(&mut editor)));
                    }
                    editor
                }
                None => EditorView::new_note(),
            };
            editor.set_title(title).map_err(|err| err.to_string())?;
            editor.set_content(content).map_err(|err| err.to_string())?;
            let response = match editor.save(&session, service) {
                Ok(note) => {
                    NoteActionResponse::success(last_notice(&mut editor), note.id.to_string())
                }
                Err(err) => {
                    warn!("event=ffi_note_save module=ffi status=error error={err}");
                    NoteActionResponse::failure(last_notice(&mut editor))
                }
            };
            Ok(response)
        })
    });
    result.unwrap_or_else(|err| NoteActionResponse::failure(format!("note_save failed: {err}")))
}

/// Hard-deletes a note. Unknown ids succeed.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let result = parse_id(&note_id).and_then(|id| {
        with_notes_service(|service| service.delete(id).map_err(|err| err.to_string()))?;
        Ok(id)
    });
    match result {
        Ok(id) => NoteActionResponse::success(MSG_NOTE_DELETED, id.to_string()),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Returns the stored theme preference.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_current() -> ThemeResponse {
    to_theme_response(load_theme().map(|pref| pref.theme()))
}

/// Flips light/dark and persists the choice.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> ThemeResponse {
    let result = load_theme().and_then(|mut pref| pref.toggle().map_err(|err| err.to_string()));
    to_theme_response(result)
}

fn load_config() -> Result<AppConfig, String> {
    AppConfig::from_env().map_err(|err| err.to_string())
}

fn load_theme() -> Result<ThemePreference, String> {
    let config = load_config()?;
    ThemePreference::load(config.prefs_path).map_err(|err| err.to_string())
}

fn with_notes_service<T>(
    f: impl FnOnce(&NotesService<SqliteNoteStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = load_config()?;
    let conn =
        open_db(&config.db_path).map_err(|err| format!("notes DB open failed: {err}"))?;
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    f(&service)
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    UserId::parse(raw).map_err(|err| err.to_string())
}

fn parse_id(raw: &str) -> Result<mynotes_core::NoteId, String> {
    parse_note_id(raw).map_err(|err| err.to_string())
}

fn last_notice(editor: &mut EditorView) -> String {
    editor
        .take_notices()
        .pop()
        .map(|notice| notice.message)
        .unwrap_or_default()
}

fn to_list_item(summary: NoteSummary) -> NoteListItem {
    NoteListItem {
        note_id: summary.id.to_string(),
        title: summary.title,
        preview: summary.preview,
        updated_label: summary.updated_label,
    }
}

fn to_detail(note: Note) -> NoteDetail {
    NoteDetail {
        note_id: note.id.to_string(),
        user_id: note.user_id.to_string(),
        title: note.title,
        content: note.content,
        created_at_ms: note.created_at,
        updated_at_ms: note.updated_at,
    }
}

fn to_theme_response(result: Result<mynotes_core::Theme, String>) -> ThemeResponse {
    match result {
        Ok(theme) => ThemeResponse {
            ok: true,
            theme: theme.to_string(),
            message: String::new(),
        },
        Err(err) => ThemeResponse {
            ok: false,
            theme: mynotes_core::Theme::default().to_string(),
            message: format!("theme failed: {err}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, note_delete, note_get, note_save, notes_list, ping,
        theme_current,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_list_update_delete_round() {
        let user = unique_token("ffi-user");
        let created = note_save(
            user.clone(),
            None,
            "Groceries".to_string(),
            "<p>milk</p>".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.message, "Note saved!");
        let note_id = created.note_id.expect("created note should return note_id");

        let listed = notes_list(user.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].note_id, note_id);
        assert_eq!(listed.items[0].preview.as_deref(), Some("milk"));
        assert_eq!(listed.items[0].updated_label, "Just now");

        let updated = note_save(
            user.clone(),
            Some(note_id.clone()),
            "Groceries".to_string(),
            "<p>milk, eggs</p>".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.message, "Note updated!");

        let fetched = note_get(note_id.clone());
        assert_eq!(
            fetched.note.expect("note should exist").content,
            "<p>milk, eggs</p>"
        );

        let deleted = note_delete(note_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(notes_list(user).items.is_empty());
        let missing = note_get(note_id);
        assert!(missing.ok);
        assert!(missing.note.is_none());
    }

    #[test]
    fn blank_title_is_rejected_before_store() {
        let user = unique_token("ffi-blank");
        let response = note_save(user.clone(), None, "   ".to_string(), "<p>x</p>".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "Title and content are required");
        assert!(notes_list(user).items.is_empty());
    }

    #[test]
    fn malformed_ids_fail_without_panicking() {
        assert!(!note_get("nope".to_string()).ok);
        assert!(!note_delete("nope".to_string()).ok);
        assert!(!notes_list("   ".to_string()).ok);
    }

    #[test]
    fn theme_current_reports_known_value() {
        let response = theme_current();
        assert!(response.theme == "light" || response.theme == "dark");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}-{}", std::process::id())
    }
}
