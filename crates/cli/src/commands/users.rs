//! User management commands.

use glassspire_core::{UserId, VerificationStatus};
use glassspire_server::db::{RepositoryError, UserRepository};

use super::{CommandError, connect};

/// Set or clear a user's verification flag.
pub async fn set_verified(id: i32, verified: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let status = if verified {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Unverified
    };

    let user = UserRepository::new(&pool)
        .set_verification(UserId::new(id), status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CommandError::UserNotFound(id),
            other => CommandError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, email = %user.email, ?status, "Verification updated");
    Ok(())
}
