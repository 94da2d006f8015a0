//! HTTP inbound adapter exposing the REST API, public widget, and
//! changelog page.

pub mod auth;
pub mod changelog;
pub mod credits;
pub mod dto;
pub mod error;
pub mod feedback;
pub mod generate;
pub mod github;
pub mod health;
pub mod patch_notes;
pub mod projects;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod widget;

pub use error::ApiResult;
