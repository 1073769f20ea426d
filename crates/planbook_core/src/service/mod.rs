//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into audited write operations.
//! - Keep callers decoupled from transaction and clock handling.

pub mod clock;
pub mod planner_service;
