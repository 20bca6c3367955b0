// Postgres storage layer with sqlx
//
// This crate provides database access for the event backend:
// - Database: sqlx/Postgres repository (production)
// - InMemoryDatabase: HashMap-backed twin for dev mode and tests
// - StorageBackend: enum dispatch over the two

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
