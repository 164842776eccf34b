use std::fs;
use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::history::{History, HistoryEntry};
use crate::http::HttpMethod;

/// Rows kept in the history table after each append.
pub const MAX_STORED_ENTRIES: usize = 1000;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS request_history (
         id INTEGER PRIMARY KEY AUTOINCREMENT,
         timestamp INTEGER NOT NULL,
         method TEXT NOT NULL,
         url TEXT NOT NULL,
         status INTEGER,
         duration_ms INTEGER,
         outcome TEXT NOT NULL
       );",
    )?;

    Ok(conn)
}

/// Persist the buffered entries oldest first, so row ids follow request order.
pub fn append_history(conn: &mut Connection, history: &History) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO request_history (timestamp, method, url, status, duration_ms, outcome)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        )?;
        for entry in history.entries().iter().rev() {
            stmt.execute(params![
                entry.timestamp as i64,
                entry.method.to_string(),
                entry.url,
                entry.status,
                entry.duration_ms.map(|ms| ms as i64),
                entry.outcome,
            ])?;
        }
    }
    tx.execute(
        "DELETE FROM request_history
       WHERE id NOT IN (SELECT id FROM request_history ORDER BY id DESC LIMIT ?1);",
        params![MAX_STORED_ENTRIES as i64],
    )?;
    tx.commit()?;

    Ok(history.len())
}

/// Most recent entries first.
pub fn load_history(conn: &Connection, limit: usize) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT timestamp, method, url, status, duration_ms, outcome
       FROM request_history ORDER BY id DESC LIMIT ?1;",
    )?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        let method: String = row.get(1)?;
        let duration: Option<i64> = row.get(4)?;
        Ok(HistoryEntry {
            timestamp: row.get::<_, i64>(0)?.max(0) as u64,
            method: HttpMethod::parse(&method).unwrap_or(HttpMethod::Get),
            url: row.get(2)?,
            status: row.get(3)?,
            duration_ms: duration.map(|ms| ms.max(0) as u64),
            outcome: row.get(5)?,
        })
    })?;

    let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

pub fn clear_history(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM request_history;", [])?)
}
