//! Audit log repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append audit entries and read them back for inspection.
//!
//! # Invariants
//! - The contract is append-only: no update or delete operation exists, and
//!   a storage trigger rejects changes to `audit_log.ts`.
//! - `ts` is persisted with millisecond precision; entries with finer
//!   timestamps are rejected so every entry reads back identical.

use crate::model::audit_log::{AuditLog, AuditLogId};
use crate::repo::error::{classify_write_error, RepoResult};
use crate::repo::support::{
    ensure_connection_ready, ensure_unassigned, push_paging, timestamp_text,
};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TABLE: &str = "audit_log";
const COLUMNS: &[&str] = &["id", "ts", "entity", "action"];

const AUDIT_LOG_SELECT_SQL: &str = "SELECT id, ts, entity, action FROM audit_log";

/// Query options for listing audit entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogQuery {
    pub entity: Option<String>,
    /// Inclusive lower bound on `ts`.
    pub since: Option<NaiveDateTime>,
    /// Inclusive upper bound on `ts`.
    pub until: Option<NaiveDateTime>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for the append-only audit log.
pub trait AuditLogRepository {
    fn append_entry(&self, entry: &AuditLog) -> RepoResult<AuditLogId>;
    fn get_entry(&self, id: AuditLogId) -> RepoResult<Option<AuditLog>>;
    fn list_entries(&self, query: &AuditLogQuery) -> RepoResult<Vec<AuditLog>>;
}

/// SQLite-backed audit log repository.
pub struct SqliteAuditLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuditLogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuditLogRepository for SqliteAuditLogRepository<'_> {
    fn append_entry(&self, entry: &AuditLog) -> RepoResult<AuditLogId> {
        ensure_unassigned(TABLE, entry.id)?;
        entry.validate()?;

        self.conn
            .execute(
                "INSERT INTO audit_log (ts, entity, action) VALUES (?1, ?2, ?3);",
                params![
                    timestamp_text(entry.ts),
                    entry.entity.as_str(),
                    entry.action.as_str(),
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_entry(&self, id: AuditLogId) -> RepoResult<Option<AuditLog>> {
        let entry = self
            .conn
            .query_row(
                &format!("{AUDIT_LOG_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_audit_log_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn list_entries(&self, query: &AuditLogQuery) -> RepoResult<Vec<AuditLog>> {
        let mut sql = format!("{AUDIT_LOG_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(entity) = query.entity.as_ref() {
            sql.push_str(" AND entity = ?");
            bind_values.push(Value::Text(entity.clone()));
        }
        if let Some(since) = query.since {
            sql.push_str(" AND ts >= ?");
            bind_values.push(Value::Text(timestamp_text(since)));
        }
        if let Some(until) = query.until {
            sql.push_str(" AND ts <= ?");
            bind_values.push(Value::Text(timestamp_text(until)));
        }

        sql.push_str(" ORDER BY ts DESC, id DESC");
        push_paging(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(bind_values), parse_audit_log_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn parse_audit_log_row(row: &Row<'_>) -> rusqlite::Result<AuditLog> {
    Ok(AuditLog {
        id: Some(row.get("id")?),
        ts: row.get("ts")?,
        entity: row.get("entity")?,
        action: row.get("action")?,
    })
}
