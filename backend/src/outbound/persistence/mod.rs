//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! Diesel row structs (`models.rs`) and schema definitions (`schema.rs`)
//! are internal implementation details and never cross into the domain.
//! Every database error is mapped to the owning port's error type.

mod diesel_account_repository;
mod diesel_feedback_repository;
mod diesel_note_repository;
mod diesel_project_repository;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
