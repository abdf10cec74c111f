//! SQLite verification: every table is counted, the total must be non-zero

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use super::{contain, VerificationOutcome};

/// Count tables and rows in a SQLite database.
///
/// The file is opened read-only and never created. The connection lives in
/// this call's scope and is closed on every return path, including errors.
pub fn verify_sqlite(path: &Path) -> VerificationOutcome {
    contain("Failed to access SQLite file", || -> rusqlite::Result<VerificationOutcome> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let tables = table_names(&conn)?;
        if tables.is_empty() {
            return Ok(VerificationOutcome::failed("SQLite file has no tables"));
        }

        let mut total_rows: i64 = 0;
        for table in &tables {
            total_rows += count_rows(&conn, table)?;
        }

        let table_count = tables.len();
        Ok(VerificationOutcome::from_count(
            u64::try_from(total_rows).unwrap_or(0),
            |n| format!("SQLite file has {table_count} tables with {n} total rows"),
            || format!("SQLite file has {table_count} tables but 0 rows"),
        ))
    })
}

fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

// Names come from sqlite_master, so they are quoted but not escaped.
fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM `{table}`"), [], |row| row.get(0))
}
