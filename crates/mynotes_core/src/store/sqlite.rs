//! SQLite implementation of [`NoteStore`].
//!
//! # Responsibility
//! - Translate the four primitive request shapes into SQL over `notes`.
//! - Assign ids and timestamps on insert, as a hosted store would.
//!
//! # Invariants
//! - Selects always end with `id ASC` after the requested order so equal
//!   timestamps still list deterministically.
//! - Persisted rows with an unparsable id or blank owner are reported as
//!   errors, never skipped.

use crate::model::note::{now_epoch_ms, NewNote, Note, UserId};
use crate::store::{NoteFilter, NoteOrder, NotePatch, NoteStore, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// Store backed by a migrated SQLite connection.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Runs one select over `notes` and parses every row; `bind` fills `?1`.
    fn query_notes(
        &self,
        clause: &str,
        bind: &str,
        order: Option<NoteOrder>,
    ) -> StoreResult<Vec<Note>> {
        let order_by = match order {
            Some(order) => format!(
                "{} {}, id ASC",
                order.column.as_str(),
                if order.ascending { "ASC" } else { "DESC" }
            ),
            None => "id ASC".to_string(),
        };
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE {clause} ORDER BY {order_by};"))?;
        let mut rows = stmt.query([bind])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn select(&self, filter: &NoteFilter, order: Option<NoteOrder>) -> StoreResult<Vec<Note>> {
        let (clause, bind) = filter_clause(filter);
        self.query_notes(clause, &bind, order)
    }

    fn insert(&self, note: &NewNote) -> StoreResult<Vec<Note>> {
        let id = Uuid::new_v4();
        let stamped_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO notes (id, user_id, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                id.to_string(),
                note.user_id.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                stamped_at,
            ],
        )?;

        self.query_notes("id = ?1", &id.to_string(), None)
    }

    fn update(&self, filter: &NoteFilter, patch: &NotePatch) -> StoreResult<Vec<Note>> {
        let (clause, bind) = filter_clause(filter);
        let updated_at = patch.updated_at.unwrap_or_else(now_epoch_ms);
        // Filter placeholder is ?1 so the same clause text works for the read-back.
        self.conn.execute(
            &format!(
                "UPDATE notes
                 SET title = ?2, content = ?3, updated_at = ?4
                 WHERE {clause};"
            ),
            params![bind, patch.title.as_str(), patch.content.as_str(), updated_at],
        )?;

        self.query_notes(clause, &bind, None)
    }

    fn delete(&self, filter: &NoteFilter) -> StoreResult<()> {
        let (clause, bind) = filter_clause(filter);
        self.conn
            .execute(&format!("DELETE FROM notes WHERE {clause};"), [bind])?;
        Ok(())
    }
}

fn filter_clause(filter: &NoteFilter) -> (&'static str, String) {
    match filter {
        NoteFilter::Id(id) => ("id = ?1", id.to_string()),
        NoteFilter::UserId(user_id) => ("user_id = ?1", user_id.as_str().to_string()),
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::with_code(
            "invalid_data",
            format!("invalid uuid value `{id_text}` in notes.id"),
        )
    })?;
    let user_text: String = row.get("user_id")?;
    let user_id = UserId::parse(user_text).map_err(|err| {
        StoreError::with_code("invalid_data", format!("{err} in notes.user_id ({id})"))
    })?;

    Ok(Note {
        id,
        user_id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
