//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Duplicate emails surface as `RepoError::UniqueViolation`.

use crate::model::user::{User, UserId};
use crate::repo::error::{classify_write_error, RepoError, RepoResult};
use crate::repo::support::{ensure_connection_ready, ensure_unassigned, require_id};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TABLE: &str = "user";
const COLUMNS: &[&str] = &["id", "name", "email"];
const UNIQUE_COLUMNS: &[&str] = &["email"];

const USER_SELECT_SQL: &str = "SELECT id, name, email FROM \"user\"";

/// Repository interface for user CRUD.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// All users ordered by id.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TABLE, COLUMNS)?;
        Ok(Self { conn })
    }

    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        ensure_unassigned(TABLE, user.id)?;

        self.conn
            .execute(
                "INSERT INTO \"user\" (name, email) VALUES (?1, ?2);",
                params![user.name.as_str(), user.email.as_str()],
            )
            .map_err(|err| classify_write_error(err, TABLE, UNIQUE_COLUMNS))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let id = require_id(TABLE, user.id)?;

        let changed = self
            .conn
            .execute(
                "UPDATE \"user\" SET name = ?1, email = ?2 WHERE id = ?3;",
                params![user.name.as_str(), user.email.as_str(), id],
            )
            .map_err(|err| classify_write_error(err, TABLE, UNIQUE_COLUMNS))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                [email],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM \"user\" WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: TABLE, id });
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
