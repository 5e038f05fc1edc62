//! Message repository.

use sqlx::PgPool;

use glassspire_core::models::Message;
use glassspire_core::{MessageId, UserId};

use super::RepositoryError;

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, content, timestamp, read";

/// Repository for message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a message as unread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO glassspire.messages (sender_id, receiver_id, content) \
             VALUES ($1, $2, $3) RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        Ok(message)
    }

    /// Messages sent from `sender_id` to `receiver_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn between(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM glassspire.messages \
             WHERE sender_id = $1 AND receiver_id = $2 ORDER BY timestamp, id"
        ))
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    /// Flag messages as read. Only rows addressed to `reader` are touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_read(&self, reader: UserId, ids: &[MessageId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let raw: Vec<i32> = ids.iter().map(MessageId::as_i32).collect();
        let result = sqlx::query(
            "UPDATE glassspire.messages SET read = TRUE \
             WHERE receiver_id = $1 AND id = ANY($2) AND NOT read",
        )
        .bind(reader)
        .bind(raw)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Unread messages addressed to `reader`, by sender.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unread_counts(&self, reader: UserId) -> Result<Vec<(UserId, i64)>, RepositoryError> {
        let rows = sqlx::query_as::<_, (UserId, i64)>(
            "SELECT sender_id, COUNT(*) FROM glassspire.messages \
             WHERE receiver_id = $1 AND NOT read GROUP BY sender_id",
        )
        .bind(reader)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
