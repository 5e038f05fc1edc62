//! Subscription repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use glassspire_core::models::Subscription;
use glassspire_core::subscription::PaymentPlan;
use glassspire_core::{SubscriptionStatus, UserId};

use super::{RepositoryError, users};

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan, start_date, end_date, payment_method, card_last4";

/// Repository for subscription database operations.
pub struct SubscriptionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new subscription repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's subscription row, if they ever paid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<Subscription>, RepositoryError> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM glassspire.subscriptions WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(subscription)
    }

    /// Write an accepted payment and mark the user active, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent first payment
    /// already created the row, `RepositoryError::NotFound` if the row or
    /// user vanished.
    pub async fn apply_payment(
        &self,
        user_id: UserId,
        plan: &PaymentPlan,
    ) -> Result<Subscription, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let subscription = match plan {
            PaymentPlan::Create(new) => sqlx::query_as::<_, Subscription>(&format!(
                "INSERT INTO glassspire.subscriptions \
                     (user_id, plan, start_date, end_date, payment_method, card_last4) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {SUBSCRIPTION_COLUMNS}"
            ))
            .bind(user_id)
            .bind(new.plan)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(new.payment_method)
            .bind(&new.card_last4)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "subscription already exists"))?,
            PaymentPlan::Renew(renewal) => sqlx::query_as::<_, Subscription>(&format!(
                "UPDATE glassspire.subscriptions \
                 SET plan = $3, end_date = $4, payment_method = $5, card_last4 = $6 \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING {SUBSCRIPTION_COLUMNS}"
            ))
            .bind(renewal.id)
            .bind(user_id)
            .bind(renewal.plan)
            .bind(renewal.end_date)
            .bind(renewal.payment_method)
            .bind(&renewal.card_last4)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?,
        };

        users::set_subscription_status(&mut tx, user_id, SubscriptionStatus::Active).await?;
        tx.commit().await?;

        Ok(subscription)
    }

    /// Mark every active user whose subscription ended before `now` as expired.
    ///
    /// Returns the ids that changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>(
            "UPDATE glassspire.users u \
             SET subscription_status = 'expired', updated_at = NOW() \
             FROM glassspire.subscriptions s \
             WHERE s.user_id = u.id \
               AND u.subscription_status = 'active' \
               AND s.end_date < $1 \
             RETURNING u.id",
        )
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }
}
