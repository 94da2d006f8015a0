//! Shared fixtures for inbound HTTP tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Session middleware for in-process test apps.
///
/// Uses a throwaway signing key and a non-`Secure` cookie so plain HTTP
/// test requests can carry the session.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
