//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - Duplicate names surface as `RepoError::UniqueViolation`.
//! - Deleting a category clears `category_id` on its projects, tasks and
//!   goals (`ON DELETE SET NULL`).

use crate::model::category::{Category, CategoryId};
use crate::repo::error::{classify_write_error, RepoError, RepoResult};
use crate::repo::support::{ensure_connection_ready, ensure_unassigned, require_id};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TABLE: &str = "category";
const COLUMNS: &[&str] = &["id", "name", "color"];
const UNIQUE_COLUMNS: &[&str] = &["name"];

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, color FROM category";

/// Repository interface for category CRUD.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn get_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// All categories ordered by name.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        ensure_unassigned(TABLE, category.id)?;

        self.conn
            .execute(
                "INSERT INTO category (name, color) VALUES (?1, ?2);",
                params![category.name.as_str(), category.color.as_deref()],
            )
            .map_err(|err| classify_write_error(err, TABLE, UNIQUE_COLUMNS))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        let id = require_id(TABLE, category.id)?;

        let changed = self
            .conn
            .execute(
                "UPDATE category SET name = ?1, color = ?2 WHERE id = ?3;",
                params![category.name.as_str(), category.color.as_deref(), id],
            )
            .map_err(|err| classify_write_error(err, TABLE, UNIQUE_COLUMNS))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn get_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM category WHERE id = ?1;", [id])
            .map_err(|err| classify_write_error(err, TABLE, UNIQUE_COLUMNS))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        color: row.get("color")?,
    })
}
