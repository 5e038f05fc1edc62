//! Subscription maintenance commands.

use chrono::Utc;
use glassspire_server::db::SubscriptionRepository;

use super::{CommandError, connect};

/// Persist `expired` for every retailer whose paid month has run out.
///
/// Returns how many users were updated.
pub async fn expire() -> Result<usize, CommandError> {
    let pool = connect().await?;

    let expired = SubscriptionRepository::new(&pool)
        .expire_lapsed(Utc::now())
        .await?;

    for user_id in &expired {
        tracing::info!(%user_id, "Subscription expired");
    }
    tracing::info!(count = expired.len(), "Expiry sweep complete");
    Ok(expired.len())
}
