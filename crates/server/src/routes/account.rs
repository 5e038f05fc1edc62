//! Account route handlers.
//!
//! Registration needs only an identity; the other routes need its profile.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use glassspire_core::account::{ProfileUpdate, Registration};
use glassspire_core::models::User;

use crate::db::UserRepository;
use crate::error::{JsonBody, Result};
use crate::middleware::{Identity, RequireUser};
use crate::state::AppState;

/// Create the profile record for a freshly signed-up identity.
///
/// POST /account
#[instrument(skip_all, fields(user_id = %user_id, account_type = %form.account_type))]
pub async fn register(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    JsonBody(form): JsonBody<Registration>,
) -> Result<(StatusCode, Json<User>)> {
    let new_user = form.validate()?;
    let user = UserRepository::new(state.pool())
        .create(user_id, &new_user)
        .await?;

    tracing::info!(
        subscription_status = %user.subscription_status,
        "Account registered"
    );
    Ok((StatusCode::CREATED, Json(user)))
}

/// The signed-in user's profile.
///
/// GET /account
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}

/// Update name, email, phone and address.
///
/// PUT /account
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(form): JsonBody<ProfileUpdate>,
) -> Result<Json<User>> {
    let profile = form.validate()?;
    let user = UserRepository::new(state.pool())
        .update_profile(user.id, &profile)
        .await?;

    tracing::info!("Profile updated");
    Ok(Json(user))
}
