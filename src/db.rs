// ==========================================
// PipeTrak Progress Engine - SQLite connection setup
// ==========================================
// Goals:
// - One place for Connection::open PRAGMA behavior, so foreign keys are
//   never enabled in some modules and silently off in others
// - One busy_timeout for every connection, reducing sporadic busy errors
//   under concurrent writes
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version this build expects
///
/// The schema is managed outside the application (no auto-migration here);
/// the version is used to warn loudly instead of silently running against an
/// older database.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the unified PRAGMA set to a connection
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// applied to every connection we open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read schema_version (None if the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
