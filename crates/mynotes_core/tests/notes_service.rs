use mynotes_core::db::open_db_in_memory;
use mynotes_core::service::notes_service::{MULTIPLE_ROWS, ROW_COUNT_MISMATCH};
use mynotes_core::store::{NoteFilter, NoteOrder, NotePatch};
use mynotes_core::{
    NewNote, Note, NoteStore, NotesService, SqliteNoteStore, StoreError, StoreResult, UserId,
};
use rusqlite::Connection;
use std::cell::RefCell;
use uuid::Uuid;

fn user(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

fn set_updated_at(conn: &Connection, note: &Note, updated_at: i64) {
    conn.execute(
        "UPDATE notes SET updated_at = ?1 WHERE id = ?2;",
        rusqlite::params![updated_at, note.id.to_string()],
    )
    .unwrap();
}

#[test]
fn create_list_delete_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    let u1 = user("u1");

    let created = service.create(&u1, "Groceries", "<p>milk</p>").unwrap();
    assert_eq!(created.user_id, u1);
    assert_eq!(created.title, "Groceries");
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);

    let listed = service.list(&u1).unwrap();
    assert!(listed.iter().any(|note| note.id == created.id));

    service.delete(created.id).unwrap();
    let listed = service.list(&u1).unwrap();
    assert!(listed.iter().all(|note| note.id != created.id));
    assert_eq!(service.get_by_id(created.id).unwrap(), None);
}

#[test]
fn list_is_most_recent_first_and_scoped_to_user() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    let u1 = user("u1");

    let oldest = service.create(&u1, "a", "x").unwrap();
    let newest = service.create(&u1, "b", "x").unwrap();
    let middle = service.create(&u1, "c", "x").unwrap();
    service.create(&user("u2"), "other", "x").unwrap();
    set_updated_at(&conn, &oldest, 1_000);
    set_updated_at(&conn, &middle, 2_000);
    set_updated_at(&conn, &newest, 3_000);

    let ids: Vec<Uuid> = service.list(&u1).unwrap().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
}

#[test]
fn list_for_user_without_notes_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    assert!(service.list(&user("nobody")).unwrap().is_empty());
}

#[test]
fn get_by_id_round_trips_and_reports_missing_as_none() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    let created = service.create(&user("u1"), "t", "<p>c</p>").unwrap();

    let loaded = service.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(service.get_by_id(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn update_refreshes_updated_at_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    let created = service.create(&user("u1"), "t", "c").unwrap();
    set_updated_at(&conn, &created, created.created_at - 10_000);

    let updated = service.update(created.id, "t2", "c2").unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "t2");
    assert_eq!(updated.content, "c2");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(service.get_by_id(created.id).unwrap(), Some(updated));
}

#[test]
fn update_of_missing_note_is_a_row_count_error() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));

    let err = service.update(Uuid::new_v4(), "t", "c").unwrap_err();
    assert_eq!(err.code(), Some(ROW_COUNT_MISMATCH));
}

#[test]
fn delete_of_missing_note_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    service.delete(Uuid::new_v4()).unwrap();
}

/// Store that fails every call with a fixed message and records calls.
struct FailingStore {
    calls: RefCell<Vec<&'static str>>,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }

    fn fail<T>(&self, op: &'static str) -> StoreResult<T> {
        self.calls.borrow_mut().push(op);
        Err(StoreError::with_code("42501", format!("permission denied for {op}")))
    }
}

impl NoteStore for FailingStore {
    fn select(&self, _: &NoteFilter, _: Option<NoteOrder>) -> StoreResult<Vec<Note>> {
        self.fail("select")
    }

    fn insert(&self, _: &NewNote) -> StoreResult<Vec<Note>> {
        self.fail("insert")
    }

    fn update(&self, _: &NoteFilter, _: &NotePatch) -> StoreResult<Vec<Note>> {
        self.fail("update")
    }

    fn delete(&self, _: &NoteFilter) -> StoreResult<()> {
        self.fail("delete")
    }
}

#[test]
fn store_errors_propagate_verbatim_without_retry() {
    let store = FailingStore::new();
    let service = NotesService::new(&store);
    let u1 = user("u1");
    let id = Uuid::new_v4();

    assert_eq!(
        service.list(&u1).unwrap_err().message(),
        "permission denied for select"
    );
    assert_eq!(
        service.get_by_id(id).unwrap_err().message(),
        "permission denied for select"
    );
    assert_eq!(
        service.create(&u1, "t", "c").unwrap_err().message(),
        "permission denied for insert"
    );
    let err = service.update(id, "t", "c").unwrap_err();
    assert_eq!(err.message(), "permission denied for update");
    assert_eq!(err.code(), Some("42501"));
    assert_eq!(
        service.delete(id).unwrap_err().message(),
        "permission denied for delete"
    );

    assert_eq!(
        *store.calls.borrow(),
        vec!["select", "select", "insert", "update", "delete"]
    );
}

/// Store that answers every read and write with a fixed row set.
struct FixedRowsStore {
    rows: Vec<Note>,
}

impl NoteStore for FixedRowsStore {
    fn select(&self, _: &NoteFilter, _: Option<NoteOrder>) -> StoreResult<Vec<Note>> {
        Ok(self.rows.clone())
    }

    fn insert(&self, _: &NewNote) -> StoreResult<Vec<Note>> {
        Ok(self.rows.clone())
    }

    fn update(&self, _: &NoteFilter, _: &NotePatch) -> StoreResult<Vec<Note>> {
        Ok(self.rows.clone())
    }

    fn delete(&self, _: &NoteFilter) -> StoreResult<()> {
        Ok(())
    }
}

fn sample_note() -> Note {
    Note {
        id: Uuid::new_v4(),
        user_id: user("u1"),
        title: "t".to_string(),
        content: "c".to_string(),
        created_at: 1,
        updated_at: 1,
    }
}

#[test]
fn single_row_reads_and_writes_reject_other_row_counts() {
    let two_rows = NotesService::new(FixedRowsStore {
        rows: vec![sample_note(), sample_note()],
    });
    let err = two_rows.get_by_id(Uuid::new_v4()).unwrap_err();
    assert_eq!(err.code(), Some(MULTIPLE_ROWS));
    let err = two_rows.update(Uuid::new_v4(), "t", "c").unwrap_err();
    assert_eq!(err.code(), Some(ROW_COUNT_MISMATCH));

    let no_rows = NotesService::new(FixedRowsStore { rows: Vec::new() });
    let err = no_rows.create(&user("u1"), "t", "c").unwrap_err();
    assert_eq!(err.code(), Some(ROW_COUNT_MISMATCH));
}

#[test]
fn owner_ids_are_matched_exactly() {
    let conn = open_db_in_memory().unwrap();
    let service = NotesService::new(SqliteNoteStore::new(&conn));
    let padded = user(" u1");

    let created = service.create(&padded, "t", "<p>c</p>").unwrap();
    assert_eq!(created.user_id.as_str(), " u1");
    assert!(service.list(&user("u1")).unwrap().is_empty());
    assert_eq!(service.list(&padded).unwrap().len(), 1);
}
