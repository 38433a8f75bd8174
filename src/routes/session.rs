use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_cookie::prelude::*;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "session";

/// Allow-list of session tokens issued by the main application.
#[derive(Clone, Debug, Default)]
pub struct SessionTokens(Arc<HashSet<String>>);

impl SessionTokens {
    pub fn new(tokens: HashSet<String>) -> Self {
        Self(Arc::new(tokens))
    }

    /// Whether the request's `session` cookie names a known session.
    pub fn accepts(&self, cookies: &CookieManager) -> bool {
        cookies
            .get(SESSION_COOKIE)
            .is_some_and(|cookie| self.accepts_token(cookie.value()))
    }

    pub fn accepts_token(&self, token: &str) -> bool {
        !token.is_empty() && self.0.contains(token)
    }
}

/// Proof that the request came with an accepted session.
///
/// Needs the [`CookieLayer`] installed by [`crate::routes::router`].
#[derive(Debug, Clone, Copy)]
pub struct SessionUser;

impl<S> FromRequestParts<S> for SessionUser
where
    SessionTokens: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(cookies) = CookieManager::from_request_parts(parts, state).await else {
            warn!(path = %parts.uri.path(), "cookie jar missing from request");
            return Err(AppError::Unauthorized);
        };

        if SessionTokens::from_ref(state).accepts(&cookies) {
            Ok(SessionUser)
        } else {
            debug!(path = %parts.uri.path(), "request without an accepted session");
            Err(AppError::Unauthorized)
        }
    }
}
