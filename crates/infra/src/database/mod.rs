//! Database adapters

pub mod project_repository;

pub use project_repository::SqliteProjectRepository;
