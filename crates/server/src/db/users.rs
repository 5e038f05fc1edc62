//! User repository for database operations.
//!
//! Queries are built at runtime with `sqlx::query_as` and decoded through the
//! `FromRow` impls on the core records.

use sqlx::PgPool;

use glassspire_core::account::{NewUser, ValidProfile};
use glassspire_core::models::User;
use glassspire_core::{AccountType, SubscriptionStatus, UserId, VerificationStatus};

use super::RepositoryError;

/// Columns selected for a [`User`], in `FromRow` order.
const USER_COLUMNS: &str = "id, email, name, account_type, subscription_status, phone_number, \
     address, verification_status, last_login, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM glassspire.users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get several users at once. Missing ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(UserId::as_i32).collect();
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM glassspire.users WHERE id = ANY($1)"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Create the profile record for an identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id or email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, id: UserId, new_user: &NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO glassspire.users \
                 (id, email, name, account_type, subscription_status, verification_status, last_login) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(new_user.account_type)
        .bind(new_user.subscription_status)
        .bind(new_user.verification_status)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "account already exists"))
    }

    /// Replace the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Conflict` if the email belongs to someone else.
    pub async fn update_profile(
        &self,
        id: UserId,
        profile: &ValidProfile,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE glassspire.users \
             SET name = $2, email = $3, phone_number = $4, address = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.phone_number)
        .bind(&profile.address)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email already in use"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// All users of one account type, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_account_type(
        &self,
        account_type: AccountType,
    ) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM glassspire.users WHERE account_type = $1 ORDER BY name, id"
        ))
        .bind(account_type)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Set a user's verification status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_verification(
        &self,
        id: UserId,
        status: VerificationStatus,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE glassspire.users SET verification_status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

/// Set a user's stored subscription status inside a caller's transaction.
pub(crate) async fn set_subscription_status(
    conn: &mut sqlx::PgConnection,
    id: UserId,
    status: SubscriptionStatus,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE glassspire.users SET subscription_status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
