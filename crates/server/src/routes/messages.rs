//! Messaging route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use glassspire_core::UserId;
use glassspire_core::messaging::{self, Conversation, MessageDraft};
use glassspire_core::models::{Message, Participant, User};

use crate::db::{MessageRepository, UserRepository};
use crate::error::{AppError, JsonBody, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Someone the caller can message.
#[derive(Debug, Serialize)]
pub struct Contact {
    #[serde(flatten)]
    pub participant: Participant,
    /// Unread messages from this contact.
    pub unread: i64,
}

/// A conversation with one contact.
#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub with: Participant,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub content: String,
}

/// Everyone on the other side of the marketplace.
///
/// GET /messages/contacts
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn contacts(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Contact>>> {
    let people = UserRepository::new(state.pool())
        .list_by_account_type(messaging::contact_type(user.account_type))
        .await?;
    let unread = MessageRepository::new(state.pool())
        .unread_counts(user.id)
        .await?;

    let contacts = people
        .iter()
        .map(|person| Contact {
            participant: person.participant(),
            unread: unread
                .iter()
                .find(|(sender, _)| *sender == person.id)
                .map_or(0, |(_, count)| *count),
        })
        .collect();

    Ok(Json(contacts))
}

/// Both sides of a conversation, oldest first.
///
/// Messages the caller received are marked read.
///
/// GET /messages/{user_id}
#[instrument(skip_all, fields(user_id = %user.id, contact_id = %contact_id))]
pub async fn conversation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(contact_id): Path<UserId>,
) -> Result<Json<ConversationView>> {
    let contact = load_counterpart(&state, &user, contact_id).await?;
    let repo = MessageRepository::new(state.pool());

    let sent = repo.between(user.id, contact.id).await?;
    let received = repo.between(contact.id, user.id).await?;
    let mut conversation = Conversation::merge(sent, received);

    let unread = conversation.unread_for(user.id);
    let marked = repo.mark_read(user.id, &unread).await?;
    conversation.mark_read_by(user.id);
    if marked > 0 {
        tracing::debug!(marked, "Messages marked read");
    }

    Ok(Json(ConversationView {
        with: contact.participant(),
        messages: conversation.messages,
    }))
}

/// Send a message to a contact.
///
/// POST /messages/{user_id}
#[instrument(skip_all, fields(user_id = %user.id, contact_id = %contact_id))]
pub async fn send(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(contact_id): Path<UserId>,
    JsonBody(body): JsonBody<SendMessage>,
) -> Result<(StatusCode, Json<Message>)> {
    let draft = MessageDraft::new(&body.content)?;
    let contact = load_counterpart(&state, &user, contact_id).await?;

    let message = MessageRepository::new(state.pool())
        .create(user.id, contact.id, draft.content())
        .await?;

    tracing::info!(message_id = %message.id, "Message sent");
    Ok((StatusCode::CREATED, Json(message)))
}

async fn load_counterpart(state: &AppState, user: &User, contact_id: UserId) -> Result<User> {
    let contact = UserRepository::new(state.pool())
        .get_by_id(contact_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {contact_id}")))?;
    messaging::ensure_counterparts(user, &contact)?;
    Ok(contact)
}
