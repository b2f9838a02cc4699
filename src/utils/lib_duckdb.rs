use std::time::Duration;

use duckdb::{params, AccessMode, Config, Connection};
use log::warn;

use crate::db::warehouse::{quote_ident, TableRef};

/// Use this function to open a DuckDB connection.  Another process may hold
/// the file lock for a moment, so back off and try again.
/// Suggested `max_attempts = 8`, `initial_wait = Duration::from_millis(25)`.
pub fn open_with_retry(
    duckdb_path: &str,
    max_attempts: u32,
    initial_wait: Duration,
    access_mode: AccessMode,
) -> Result<Connection, duckdb::Error> {
    let mut attempts = 0;
    let mut wait_duration = initial_wait;

    loop {
        let config = Config::default().access_mode(access_mode.clone())?;
        match Connection::open_with_flags(duckdb_path, config) {
            Ok(conn) => return Ok(conn),
            Err(e) => {
                attempts += 1;
                if attempts >= max_attempts {
                    return Err(e);
                }
                warn!(
                    "Retrying to open {} after error: {} (attempt {}/{})",
                    duckdb_path, e, attempts, max_attempts
                );
                std::thread::sleep(wait_duration);
                wait_duration *= 2;
            }
        }
    }
}

pub fn ensure_schema(conn: &Connection, schema: &str) -> Result<(), duckdb::Error> {
    conn.execute_batch(&format!(
        "CREATE SCHEMA IF NOT EXISTS {};",
        quote_ident(schema)
    ))
}

pub fn table_exists(conn: &Connection, table: &TableRef) -> Result<bool, duckdb::Error> {
    let n: i64 = conn.query_row(
        r#"
SELECT count(*)
FROM information_schema.tables
WHERE table_schema = ? AND table_name = ?;
        "#,
        params![table.dataset, table.table],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

pub fn row_count(conn: &Connection, table: &TableRef) -> Result<usize, duckdb::Error> {
    let n: i64 = conn.query_row(&format!("SELECT count(*) FROM {};", table.sql()), [], |row| {
        row.get(0)
    })?;
    Ok(n as usize)
}

/// Column names and their DuckDB types, in table order.
pub fn column_types(
    conn: &Connection,
    table: &TableRef,
) -> Result<Vec<(String, String)>, duckdb::Error> {
    let mut stmt = conn.prepare(
        r#"
SELECT column_name, data_type
FROM information_schema.columns
WHERE table_schema = ? AND table_name = ?
ORDER BY ordinal_position;
        "#,
    )?;
    let res_iter = stmt.query_map(params![table.dataset, table.table], |row| {
        Ok((row.get::<usize, String>(0)?, row.get::<usize, String>(1)?))
    })?;
    res_iter.collect()
}
