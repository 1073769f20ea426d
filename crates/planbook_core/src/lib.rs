//! Persistence core for the planner: categories, projects, tasks, goals,
//! users and an append-only audit log on SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::audit_log::{AuditLog, AuditLogId};
pub use model::category::{Category, CategoryId};
pub use model::goal::{Goal, GoalId};
pub use model::project::{Project, ProjectId};
pub use model::task::{Task, TaskId, TaskStatus};
pub use model::user::{User, UserId};
pub use model::DomainError;
pub use repo::audit_log_repo::{AuditLogQuery, AuditLogRepository, SqliteAuditLogRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::error::{ErrorKind, RepoError, RepoResult};
pub use repo::goal_repo::{GoalListQuery, GoalRepository, SqliteGoalRepository};
pub use repo::project_repo::{ProjectListQuery, ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::planner_service::{AuditAction, PlannerService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
