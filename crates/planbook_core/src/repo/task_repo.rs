//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `task` table.
//! - Serve filtered queries over the indexed `due_date` and `status` columns
//!   and over the category/project foreign keys.
//!
//! # Invariants
//! - Date-range filters are inclusive at both ends.
//! - Rows whose persisted status is not a known `TaskStatus` are reported as
//!   `RepoError::InvalidData`, never mapped to a default.

use crate::model::category::CategoryId;
use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::repo::error::{classify_write_error, RepoError, RepoResult};
use crate::repo::support::{
    date_value, ensure_connection_ready, ensure_unassigned, push_paging, require_id,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TABLE: &str = "task";
const COLUMNS: &[&str] = &[
    "id",
    "title",
    "due_date",
    "category_id",
    "status",
    "recurrence",
    "priority",
    "project_id",
];

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    due_date,
    category_id,
    status,
    recurrence,
    priority,
    project_id
FROM task";

/// Query options for listing tasks.
///
/// Results are ordered by `due_date` (undated last), then `priority`
/// descending, then `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Inclusive lower bound on `due_date`. Undated tasks never match.
    pub due_from: Option<NaiveDate>,
    /// Inclusive upper bound on `due_date`. Undated tasks never match.
    pub due_to: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub category_id: Option<CategoryId>,
    pub project_id: Option<ProjectId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD and indexed queries.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;

    fn tasks_for_category(&self, category_id: CategoryId) -> RepoResult<Vec<Task>> {
        self.list_tasks(&TaskListQuery {
            category_id: Some(category_id),
            ..TaskListQuery::default()
        })
    }

    fn tasks_for_project(&self, project_id: ProjectId) -> RepoResult<Vec<Task>> {
        self.list_tasks(&TaskListQuery {
            project_id: Some(project_id),
            ..TaskListQuery::default()
        })
    }

    /// Tasks with `from <= due_date <= to`.
    fn tasks_due_between(&self, from: NaiveDate, to: NaiveDate) -> RepoResult<Vec<Task>> {
        self.list_tasks(&TaskListQuery {
            due_from: Some(from),
            due_to: Some(to),
            ..TaskListQuery::default()
        })
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        ensure_unassigned(TABLE, task.id)?;
        task.validate()?;

        self.conn
            .execute(
                "INSERT INTO task (
                    title,
                    due_date,
                    category_id,
                    status,
                    recurrence,
                    priority,
                    project_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    task.title.as_str(),
                    task.due_date,
                    task.category_id,
                    task.status.as_str(),
                    task.recurrence.as_deref(),
                    task.priority,
                    task.project_id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let id = require_id(TABLE, task.id)?;
        task.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE task
                 SET
                    title = ?1,
                    due_date = ?2,
                    category_id = ?3,
                    status = ?4,
                    recurrence = ?5,
                    priority = ?6,
                    project_id = ?7
                 WHERE id = ?8;",
                params![
                    task.title.as_str(),
                    task.due_date,
                    task.category_id,
                    task.status.as_str(),
                    task.recurrence.as_deref(),
                    task.priority,
                    task.project_id,
                    id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(from) = query.due_from {
            sql.push_str(" AND due_date >= ?");
            bind_values.push(date_value(from));
        }
        if let Some(to) = query.due_to {
            sql.push_str(" AND due_date <= ?");
            bind_values.push(date_value(to));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }
        if let Some(project_id) = query.project_id {
            sql.push_str(" AND project_id = ?");
            bind_values.push(Value::Integer(project_id));
        }

        sql.push_str(" ORDER BY due_date IS NULL, due_date ASC, priority DESC, id ASC");
        push_paging(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM task WHERE id = ?1;", [id])
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in task.status"))
    })?;

    Ok(Task {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        due_date: row.get("due_date")?,
        category_id: row.get("category_id")?,
        status,
        recurrence: row.get("recurrence")?,
        priority: row.get("priority")?,
        project_id: row.get("project_id")?,
    })
}
