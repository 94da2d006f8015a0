//! Inbound adapters translating external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the public changelog page and the
//! embeddable widget share the same adapter.

pub mod http;
