//! Schema migrations for the notes store.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps for the `notes` table.
//! - Run every pending step inside one transaction.
//!
//! # Invariants
//! - Step versions only ever grow.
//! - `PRAGMA user_version` always equals the last applied step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_notes.sql"),
}];

/// Returns the newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connected database up to [`latest_version`].
///
/// Databases written by a newer build are refused rather than downgraded.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let target = latest_version();

    if from_version > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: target,
        });
    }
    if from_version == target {
        return Ok(());
    }

    let tx = conn.transaction().map_err(|source| DbError::Migrate {
        version: from_version + 1,
        source,
    })?;
    for step in MIGRATIONS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migrate {
                version: step.version,
                source,
            })?;
    }
    tx.commit().map_err(|source| DbError::Migrate {
        version: target,
        source,
    })?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, target
    );
    Ok(())
}

/// Reads the schema version recorded in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(DbError::ReadSchemaVersion)
}
