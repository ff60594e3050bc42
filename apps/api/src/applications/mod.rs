//! Application tracking: CRUD over the `applications` table plus the kanban board view.

pub mod board;
pub mod handlers;
pub mod repo;
