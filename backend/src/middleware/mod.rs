//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every endpoint, currently
//! request tracing.

pub mod trace;

pub use trace::Trace;
