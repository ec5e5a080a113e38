use rusqlite::Connection;

use crate::error::Result;

/// Create the key/value table that holds each serialized collection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS blobs (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT DEFAULT (datetime('now'))
        );
    ",
    )?;
    Ok(())
}
