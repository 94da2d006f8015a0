//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **github**: GitHub REST commit source over reqwest
//! - **openai**: chat-completion model client over reqwest

pub mod github;
pub mod openai;
pub mod persistence;
