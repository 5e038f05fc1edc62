//! Identity extractors.
//!
//! Sign-in happens at the identity provider in front of this server, which
//! forwards the user's id in a trusted header (see
//! [`ServerConfig::identity_header`](crate::config::ServerConfig)). These
//! extractors read that header and, for most routes, load the profile record.

use axum::{extract::FromRequestParts, http::request::Parts};

use glassspire_core::UserId;
use glassspire_core::models::User;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Extractor for the caller's identity, without loading a profile.
///
/// Used by registration, where no profile exists yet.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Identity(user_id): Identity) -> impl IntoResponse {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub UserId);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = &state.config().identity_header;
        let raw = parts
            .headers
            .get(header)
            .ok_or_else(|| AppError::Unauthorized("not signed in".to_string()))?;

        let id = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| AppError::BadRequest(format!("malformed {} header", header.as_str())))?;

        Ok(Self(UserId::new(id)))
    }
}

/// Extractor that requires a registered user.
///
/// Rejects with `401` when the identity has no profile record yet.
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(user_id) = Identity::from_request_parts(parts, state).await?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("no account for this identity".to_string()))?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::Span::current().record("user_id", user.id.as_i32());

        Ok(Self(user))
    }
}
