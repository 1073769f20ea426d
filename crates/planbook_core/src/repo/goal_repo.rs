//! Goal repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Goal::validate()` before SQL mutations; the `CHECK`
//!   constraint on `goal.progress` backs it up at storage level.
//! - Read paths reject persisted rows that fail validation.
//! - Date filters are inclusive at both ends.

use crate::model::category::CategoryId;
use crate::model::goal::{Goal, GoalId};
use crate::repo::error::{classify_write_error, RepoError, RepoResult};
use crate::repo::support::{
    date_value, ensure_connection_ready, ensure_unassigned, push_paging, require_id,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TABLE: &str = "goal";
const COLUMNS: &[&str] = &[
    "id",
    "title",
    "start_date",
    "end_date",
    "progress",
    "category_id",
];

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    start_date,
    end_date,
    progress,
    category_id
FROM goal";

/// Query options for listing goals, ordered by `start_date`, then `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalListQuery {
    pub starts_from: Option<NaiveDate>,
    pub starts_to: Option<NaiveDate>,
    pub ends_from: Option<NaiveDate>,
    pub ends_to: Option<NaiveDate>,
    /// Keeps goals with `start_date <= day <= end_date`.
    pub active_on: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for goal CRUD and indexed date queries.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    fn update_goal(&self, goal: &Goal) -> RepoResult<()>;
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>>;
    fn delete_goal(&self, id: GoalId) -> RepoResult<()>;

    fn goals_for_category(&self, category_id: CategoryId) -> RepoResult<Vec<Goal>> {
        self.list_goals(&GoalListQuery {
            category_id: Some(category_id),
            ..GoalListQuery::default()
        })
    }

    fn goals_active_on(&self, day: NaiveDate) -> RepoResult<Vec<Goal>> {
        self.list_goals(&GoalListQuery {
            active_on: Some(day),
            ..GoalListQuery::default()
        })
    }
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        ensure_unassigned(TABLE, goal.id)?;
        goal.validate()?;

        self.conn
            .execute(
                "INSERT INTO goal (
                    title,
                    start_date,
                    end_date,
                    progress,
                    category_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    goal.title.as_str(),
                    goal.start_date,
                    goal.end_date,
                    goal.progress,
                    goal.category_id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        let id = require_id(TABLE, goal.id)?;
        goal.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE goal
                 SET
                    title = ?1,
                    start_date = ?2,
                    end_date = ?3,
                    progress = ?4,
                    category_id = ?5
                 WHERE id = ?6;",
                params![
                    goal.title.as_str(),
                    goal.start_date,
                    goal.end_date,
                    goal.progress,
                    goal.category_id,
                    id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }

    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }
        Ok(None)
    }

    fn list_goals(&self, query: &GoalListQuery) -> RepoResult<Vec<Goal>> {
        let mut sql = format!("{GOAL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        let date_filters = [
            ("start_date >= ?", query.starts_from),
            ("start_date <= ?", query.starts_to),
            ("end_date >= ?", query.ends_from),
            ("end_date <= ?", query.ends_to),
        ];
        for (clause, bound) in date_filters {
            if let Some(day) = bound {
                sql.push_str(" AND ");
                sql.push_str(clause);
                bind_values.push(date_value(day));
            }
        }
        if let Some(day) = query.active_on {
            sql.push_str(" AND start_date <= ? AND end_date >= ?");
            bind_values.push(date_value(day));
            bind_values.push(date_value(day));
        }
        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        sql.push_str(" ORDER BY start_date ASC, id ASC");
        push_paging(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM goal WHERE id = ?1;", [id])
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let goal = Goal {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        progress: row.get("progress")?,
        category_id: row.get("category_id")?,
    };
    if let Err(err) = goal.validate() {
        return Err(RepoError::InvalidData(format!(
            "invalid goal row {}: {err}",
            goal.id.unwrap_or_default()
        )));
    }
    Ok(goal)
}
