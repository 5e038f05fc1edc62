//! Direct messages between customers and retailers.
//!
//! Messages are append-only. The only mutation is the receiver's read flag.

use serde::Serialize;

use crate::models::{Message, User};
use crate::types::{AccountType, MessageId, UserId};

/// Why a message cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message cannot be empty")]
    EmptyContent,
    #[error("cannot send a message to yourself")]
    SelfAddressed,
    /// Conversations always pair a customer with a retailer.
    #[error("{account_type}s can only message {}s", .account_type.counterpart())]
    SameAccountType { account_type: AccountType },
}

/// Validated message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    content: String,
}

impl MessageDraft {
    /// # Errors
    ///
    /// Returns [`MessageError::EmptyContent`] for blank text.
    pub fn new(content: &str) -> Result<Self, MessageError> {
        if content.trim().is_empty() {
            return Err(MessageError::EmptyContent);
        }
        Ok(Self {
            content: content.to_owned(),
        })
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Check that `sender` may write to `receiver`.
///
/// # Errors
///
/// Returns [`MessageError::SelfAddressed`] or
/// [`MessageError::SameAccountType`].
pub fn ensure_counterparts(sender: &User, receiver: &User) -> Result<(), MessageError> {
    if sender.id == receiver.id {
        return Err(MessageError::SelfAddressed);
    }
    if sender.account_type == receiver.account_type {
        return Err(MessageError::SameAccountType {
            account_type: sender.account_type,
        });
    }
    Ok(())
}

/// Account type listed as possible contacts for `account_type`.
#[must_use]
pub const fn contact_type(account_type: AccountType) -> AccountType {
    account_type.counterpart()
}

/// Both directions of a conversation on one timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Merge what one side sent with what it received, oldest first.
    ///
    /// Messages with the same timestamp keep id order.
    #[must_use]
    pub fn merge(sent: Vec<Message>, received: Vec<Message>) -> Self {
        let mut messages = sent;
        messages.extend(received);
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Self { messages }
    }

    /// Ids of messages addressed to `reader` that are still unread.
    #[must_use]
    pub fn unread_for(&self, reader: UserId) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|m| m.receiver_id == reader && !m.read)
            .map(|m| m.id)
            .collect()
    }

    /// Flag `reader`'s incoming messages as read. Returns how many flipped.
    pub fn mark_read_by(&mut self, reader: UserId) -> usize {
        let mut flipped = 0;
        for message in &mut self.messages {
            if message.receiver_id == reader && !message.read {
                message.read = true;
                flipped += 1;
            }
        }
        flipped
    }
}
