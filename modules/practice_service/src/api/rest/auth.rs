//! Bearer-session extractor
//!
//! Every entity endpoint takes an [`AuthUser`]; requests without a valid
//! session are answered with 401 before the handler runs.

use super::error::{map_domain_error, Problem};
use crate::contract::{AuthContext, PracticeError};
use crate::domain::AuthService;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use std::sync::Arc;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AuthService extension is missing from the router");
                map_domain_error(PracticeError::Internal)
            })?;
        let token = bearer_token(parts).ok_or_else(|| map_domain_error(PracticeError::Unauthenticated))?;
        auth.session(token).map(AuthUser).map_err(map_domain_error)
    }
}
