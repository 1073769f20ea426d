//! CLI probe for a planner database.
//!
//! # Responsibility
//! - Open (or create) a database file and apply pending migrations.
//! - Print schema version and per-table row counts for quick sanity checks.
//!
//! Usage: `planbook_cli [DB_PATH]`. Set `PLANBOOK_LOG_DIR` to an absolute
//! directory to also write rolling logs there.

use planbook_core::db::migrations::current_user_version;
use planbook_core::db::open_db;
use planbook_core::{core_version, default_log_level, init_logging, ping};
use rusqlite::Connection;
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "planbook.sqlite3";
const TABLES: &[&str] = &["category", "project", "task", "goal", "user", "audit_log"];

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("planbook_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("PLANBOOK_LOG_DIR") {
        init_logging(default_log_level(), &log_dir)?;
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    println!("planbook_core ping={}", ping());
    println!("planbook_core version={}", core_version());

    let conn = open_db(&db_path)?;
    println!("db path={db_path} schema_version={}", current_user_version(&conn)?);
    for table in TABLES {
        println!("table {table} rows={}", count_rows(&conn, table)?);
    }
    Ok(())
}

fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\";"), [], |row| {
        row.get(0)
    })
}
