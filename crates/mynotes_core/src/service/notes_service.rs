//! Notes data service.
//!
//! # Responsibility
//! - Map the five note use-cases onto the store's primitive requests.
//! - Normalize row-count outcomes into `Option` or [`StoreError`].
//!
//! # Invariants
//! - `list` is ordered by `updated_at DESC` and never fails for zero rows.
//! - `get_by_id` reports zero rows as `Ok(None)`, never as an error.
//! - `create`/`update` must see exactly one row back; anything else is a
//!   [`StoreError`] with code [`ROW_COUNT_MISMATCH`].
//! - Store errors are returned unchanged; there is no retry.

use crate::model::note::{now_epoch_ms, NewNote, Note, NoteId, UserId};
use crate::store::{
    NoteColumn, NoteFilter, NoteOrder, NotePatch, NoteStore, StoreError, StoreResult,
};
use log::{error, info};
use std::time::Instant;

/// Error code for a create/update that did not return exactly one row.
pub const ROW_COUNT_MISMATCH: &str = "row_count_mismatch";
/// Error code for a single-row read that matched several rows.
pub const MULTIPLE_ROWS: &str = "multiple_rows";

/// Use-case facade over a [`NoteStore`].
pub struct NotesService<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NotesService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists a user's notes, most recently updated first.
    pub fn list(&self, user_id: &UserId) -> StoreResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = self.store.select(
            &NoteFilter::UserId(user_id.clone()),
            Some(NoteOrder::descending(NoteColumn::UpdatedAt)),
        );
        match &result {
            Ok(notes) => info!(
                "event=notes_list module=service status=ok count={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("notes_list", err),
        }
        result
    }

    /// Fetches one note; `Ok(None)` when no row has this id.
    pub fn get_by_id(&self, note_id: NoteId) -> StoreResult<Option<Note>> {
        let mut rows = self
            .store
            .select(&NoteFilter::Id(note_id), None)
            .inspect_err(|err| log_failure("notes_get", err))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => {
                let err = StoreError::with_code(
                    MULTIPLE_ROWS,
                    format!("expected at most one note for id {note_id}, store returned {count}"),
                );
                log_failure("notes_get", &err);
                Err(err)
            }
        }
    }

    /// Inserts a note owned by `user_id` and returns the stored row.
    pub fn create(
        &self,
        user_id: &UserId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let new_note = NewNote {
            user_id: user_id.clone(),
            title: title.into(),
            content: content.into(),
        };
        let rows = self
            .store
            .insert(&new_note)
            .inspect_err(|err| log_failure("notes_create", err))?;
        let note = exactly_one(rows, "notes_create")?;
        info!(
            "event=notes_create module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Replaces title and content and stamps `updated_at` with the call time.
    ///
    /// A missing id surfaces as a row-count [`StoreError`], same as any other
    /// rejected write.
    pub fn update(
        &self,
        note_id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let patch = NotePatch {
            title: title.into(),
            content: content.into(),
            updated_at: Some(now_epoch_ms()),
        };
        let rows = self
            .store
            .update(&NoteFilter::Id(note_id), &patch)
            .inspect_err(|err| log_failure("notes_update", err))?;
        let note = exactly_one(rows, "notes_update")?;
        info!(
            "event=notes_update module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    /// Hard-deletes a note. Unknown ids are accepted silently.
    pub fn delete(&self, note_id: NoteId) -> StoreResult<()> {
        self.store
            .delete(&NoteFilter::Id(note_id))
            .inspect_err(|err| log_failure("notes_delete", err))?;
        info!("event=notes_delete module=service status=ok note_id={note_id}");
        Ok(())
    }
}

fn exactly_one(mut rows: Vec<Note>, event: &'static str) -> StoreResult<Note> {
    if rows.len() == 1 {
        if let Some(note) = rows.pop() {
            return Ok(note);
        }
    }
    let err = StoreError::with_code(
        ROW_COUNT_MISMATCH,
        format!("expected exactly one note row, store returned {}", rows.len()),
    );
    log_failure(event, &err);
    Err(err)
}

fn log_failure(event: &'static str, err: &StoreError) {
    error!(
        "event={event} module=service status=error error_code={} error={}",
        err.code().unwrap_or("store"),
        err
    );
}
