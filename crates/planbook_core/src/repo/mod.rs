//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data-access contract per entity.
//! - Isolate SQLite query details from service orchestration.
//! - Expose relationships as explicit query functions
//!   (`tasks_for_category`, `projects_for_category`, ...).
//!
//! # Invariants
//! - Primary keys are assigned by SQLite; creates reject records that carry
//!   an id and updates reject records that do not.
//! - Constraint failures are returned as semantic `RepoError` variants.

pub mod audit_log_repo;
pub mod category_repo;
pub mod error;
pub mod goal_repo;
pub mod project_repo;
mod support;
pub mod task_repo;
pub mod user_repo;
