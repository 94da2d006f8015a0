//! GitHub outbound adapter.
//!
//! Thin reqwest implementation of the `CommitSource` port over the GitHub
//! REST v3 API.

mod dto;
mod http_source;

pub use http_source::GithubHttpSource;
