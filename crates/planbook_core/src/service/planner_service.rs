//! Audited write service.
//!
//! # Responsibility
//! - Provide create/update/delete entry points for every non-audit entity.
//! - Record one `audit_log` row per successful write.
//!
//! # Invariants
//! - The entity write and its audit row share one savepoint; a failure in
//!   either leaves neither behind.
//! - Writes nest inside a transaction the caller already holds and become
//!   durable only when that transaction commits.
//! - Audit timestamps come from the injected `Clock` only.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::audit_log::AuditLog;
use crate::model::category::{Category, CategoryId};
use crate::model::goal::{Goal, GoalId};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::model::user::{User, UserId};
use crate::repo::audit_log_repo::{AuditLogRepository, SqliteAuditLogRepository};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::goal_repo::{GoalRepository, SqliteGoalRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::clock::Clock;
use log::{error, info, warn};
use rusqlite::Connection;
use std::time::Instant;

const AUDITED_SAVEPOINT: &str = "planbook_audited_write";

/// Kind of write recorded in `audit_log.action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Text stored in `audit_log.action`, e.g. `update id=7`.
    pub fn describe(self, id: i64) -> String {
        format!("{} id={id}", self.as_str())
    }
}

/// Write facade pairing every entity mutation with an audit entry.
pub struct PlannerService<'conn, C: Clock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn, C: Clock> PlannerService<'conn, C> {
    /// Creates a service over a migrated connection.
    ///
    /// # Errors
    /// - Connection readiness errors when any planner table is missing.
    pub fn try_new(conn: &'conn Connection, clock: C) -> RepoResult<Self> {
        SqliteCategoryRepository::try_new(conn)?;
        SqliteProjectRepository::try_new(conn)?;
        SqliteTaskRepository::try_new(conn)?;
        SqliteGoalRepository::try_new(conn)?;
        SqliteUserRepository::try_new(conn)?;
        SqliteAuditLogRepository::try_new(conn)?;
        Ok(Self { conn, clock })
    }

    pub fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.audited("category", AuditAction::Create, |conn| {
            let id = SqliteCategoryRepository::new(conn).create_category(category)?;
            Ok((id, id))
        })
    }

    pub fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.audited("category", AuditAction::Update, |conn| {
            SqliteCategoryRepository::new(conn).update_category(category)?;
            Ok(((), category.id.unwrap_or_default()))
        })
    }

    /// Deletes a category; its projects, tasks and goals become uncategorized.
    pub fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.audited("category", AuditAction::Delete, |conn| {
            SqliteCategoryRepository::new(conn).delete_category(id)?;
            Ok(((), id))
        })
    }

    pub fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.audited("project", AuditAction::Create, |conn| {
            let id = SqliteProjectRepository::new(conn).create_project(project)?;
            Ok((id, id))
        })
    }

    pub fn update_project(&self, project: &Project) -> RepoResult<()> {
        self.audited("project", AuditAction::Update, |conn| {
            SqliteProjectRepository::new(conn).update_project(project)?;
            Ok(((), project.id.unwrap_or_default()))
        })
    }

    /// Deletes a project; rejected while any task still references it.
    pub fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        self.audited("project", AuditAction::Delete, |conn| {
            SqliteProjectRepository::new(conn).delete_project(id)?;
            Ok(((), id))
        })
    }

    pub fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.audited("task", AuditAction::Create, |conn| {
            let id = SqliteTaskRepository::new(conn).create_task(task)?;
            Ok((id, id))
        })
    }

    pub fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.audited("task", AuditAction::Update, |conn| {
            SqliteTaskRepository::new(conn).update_task(task)?;
            Ok(((), task.id.unwrap_or_default()))
        })
    }

    /// Replaces the status of one task. Any status may follow any other.
    pub fn set_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()> {
        self.audited("task", AuditAction::Update, |conn| {
            let repo = SqliteTaskRepository::new(conn);
            let mut task = repo
                .get_task(id)?
                .ok_or(RepoError::NotFound { entity: "task", id })?;
            task.status = status;
            repo.update_task(&task)?;
            Ok(((), id))
        })
    }

    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.audited("task", AuditAction::Delete, |conn| {
            SqliteTaskRepository::new(conn).delete_task(id)?;
            Ok(((), id))
        })
    }

    pub fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        self.audited("goal", AuditAction::Create, |conn| {
            let id = SqliteGoalRepository::new(conn).create_goal(goal)?;
            Ok((id, id))
        })
    }

    pub fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        self.audited("goal", AuditAction::Update, |conn| {
            SqliteGoalRepository::new(conn).update_goal(goal)?;
            Ok(((), goal.id.unwrap_or_default()))
        })
    }

    /// Replaces the progress of one goal.
    ///
    /// # Errors
    /// - `RepoError::Domain` when `progress` is outside `0..=100`.
    pub fn set_goal_progress(&self, id: GoalId, progress: i64) -> RepoResult<()> {
        self.audited("goal", AuditAction::Update, |conn| {
            let repo = SqliteGoalRepository::new(conn);
            let mut goal = repo
                .get_goal(id)?
                .ok_or(RepoError::NotFound { entity: "goal", id })?;
            goal.set_progress(progress)?;
            repo.update_goal(&goal)?;
            Ok(((), id))
        })
    }

    pub fn delete_goal(&self, id: GoalId) -> RepoResult<()> {
        self.audited("goal", AuditAction::Delete, |conn| {
            SqliteGoalRepository::new(conn).delete_goal(id)?;
            Ok(((), id))
        })
    }

    pub fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.audited("user", AuditAction::Create, |conn| {
            let id = SqliteUserRepository::new(conn).create_user(user)?;
            Ok((id, id))
        })
    }

    pub fn update_user(&self, user: &User) -> RepoResult<()> {
        self.audited("user", AuditAction::Update, |conn| {
            SqliteUserRepository::new(conn).update_user(user)?;
            Ok(((), user.id.unwrap_or_default()))
        })
    }

    pub fn delete_user(&self, id: UserId) -> RepoResult<()> {
        self.audited("user", AuditAction::Delete, |conn| {
            SqliteUserRepository::new(conn).delete_user(id)?;
            Ok(((), id))
        })
    }

    /// Runs `write` and the matching audit append under one savepoint.
    ///
    /// `write` returns the caller-facing value and the affected row id. The
    /// savepoint commits on its own in autocommit mode and nests inside a
    /// transaction the caller already holds.
    fn audited<T>(
        &self,
        entity: &'static str,
        action: AuditAction,
        write: impl FnOnce(&Connection) -> RepoResult<(T, i64)>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        self.conn.execute_batch(&format!("SAVEPOINT {AUDITED_SAVEPOINT};"))?;

        let result = write(self.conn)
            .and_then(|(value, id)| {
                let entry = AuditLog::new(entity, action.describe(id), self.clock.now());
                SqliteAuditLogRepository::new(self.conn).append_entry(&entry)?;
                Ok((value, id))
            })
            .and_then(|(value, id)| {
                self.conn
                    .execute_batch(&format!("RELEASE {AUDITED_SAVEPOINT};"))?;
                Ok((value, id))
            });

        match result {
            Ok((value, id)) => {
                info!(
                    "event=audited_write module=service status=ok entity={entity} action={} id={id} duration_ms={}",
                    action.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.conn.execute_batch(&format!(
                    "ROLLBACK TO {AUDITED_SAVEPOINT}; RELEASE {AUDITED_SAVEPOINT};"
                )) {
                    error!(
                        "event=audited_write module=service status=rollback_failed entity={entity} error={rollback_err}"
                    );
                }
                warn!(
                    "event=audited_write module=service status=error entity={entity} action={} error_kind={:?} duration_ms={}",
                    action.as_str(),
                    err.kind(),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}
