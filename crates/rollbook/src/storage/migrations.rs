//! Schema versioning for the slot database.
//!
//! The record blob inside a slot is unversioned; only the table layout that
//! holds the slots is tracked here.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The schema version this build writes.
pub const CURRENT_VERSION: u32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Create the tables if needed and stamp the schema version.
///
/// # Errors
///
/// Returns an error if table creation fails, the stored version is
/// unreadable, or the database was written by a newer schema.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match schema_version(conn)? {
        None => stamp_version(conn, CURRENT_VERSION),
        Some(v) if v == CURRENT_VERSION => Ok(()),
        Some(v) if v > CURRENT_VERSION => Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {v} is newer than supported version {CURRENT_VERSION}"
            ),
        }),
        Some(v) => Err(Error::DatabaseMigration {
            message: format!("no upgrade path from schema version {v}"),
        }),
    }
}

/// The stored schema version, or `None` for a fresh database.
fn schema_version(conn: &Connection) -> Result<Option<u32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("invalid schema version: {v}"),
            })
        })
        .transpose()
}

fn stamp_version(conn: &Connection, version: u32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
