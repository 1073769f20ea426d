//! Project repository contract and SQLite implementation.
//!
//! # Invariants
//! - `category_id`, when set, must reference an existing category.
//! - A project that still owns tasks cannot be deleted (`ON DELETE RESTRICT`);
//!   the attempt surfaces as `RepoError::ForeignKeyViolation`.

use crate::model::category::CategoryId;
use crate::model::project::{Project, ProjectId};
use crate::repo::error::{classify_write_error, RepoError, RepoResult};
use crate::repo::support::{ensure_connection_ready, ensure_unassigned, push_paging, require_id};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TABLE: &str = "project";
const COLUMNS: &[&str] = &["id", "title", "description", "category_id"];

const PROJECT_SELECT_SQL: &str = "SELECT id, title, description, category_id FROM project";

/// Query options for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListQuery {
    pub category_id: Option<CategoryId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for project CRUD.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects ordered by id.
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;

    /// Projects filed under `category_id`.
    fn projects_for_category(&self, category_id: CategoryId) -> RepoResult<Vec<Project>> {
        self.list_projects(&ProjectListQuery {
            category_id: Some(category_id),
            ..ProjectListQuery::default()
        })
    }
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        ensure_unassigned(TABLE, project.id)?;

        self.conn
            .execute(
                "INSERT INTO project (title, description, category_id) VALUES (?1, ?2, ?3);",
                params![
                    project.title.as_str(),
                    project.description.as_deref(),
                    project.category_id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        let id = require_id(TABLE, project.id)?;

        let changed = self
            .conn
            .execute(
                "UPDATE project
                 SET
                    title = ?1,
                    description = ?2,
                    category_id = ?3
                 WHERE id = ?4;",
                params![
                    project.title.as_str(),
                    project.description.as_deref(),
                    project.category_id,
                    id,
                ],
            )
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let project = self
            .conn
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_project_row,
            )
            .optional()?;
        Ok(project)
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        sql.push_str(" ORDER BY id ASC");
        push_paging(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let projects = stmt
            .query_map(params_from_iter(bind_values), parse_project_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM project WHERE id = ?1;", [id])
            .map_err(|err| classify_write_error(err, TABLE, &[]))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        category_id: row.get("category_id")?,
    })
}
