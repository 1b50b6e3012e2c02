//! Messaging platform seam.
//!
//! The handler only needs two things from the platform: the bot's own
//! privileges in a chat, and the ability to delete a message. `ChatPlatform`
//! captures exactly that so the decision logic can run against a fake.

mod telegram;

use async_trait::async_trait;
use teloxide::types::{ChatId, ChatMember, ChatMemberKind, MessageId};
use teloxide::{ApiError, RequestError};
use thiserror::Error;

pub use telegram::TelegramPlatform;

/// The bot's own privileges in a chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberCapabilities {
    pub is_admin: bool,
    pub can_delete_messages: bool,
}

impl MemberCapabilities {
    /// Read capabilities from a chat member record.
    pub fn from_chat_member(member: &ChatMember) -> Self {
        match &member.kind {
            ChatMemberKind::Owner(_) => Self {
                is_admin: true,
                can_delete_messages: true,
            },
            ChatMemberKind::Administrator(admin) => Self {
                is_admin: true,
                can_delete_messages: admin.can_delete_messages,
            },
            _ => Self::default(),
        }
    }
}

/// Platform request failures, classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The message was already gone when we tried to delete it.
    #[error("message to delete not found")]
    MessageNotFound,

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {0}")]
    Api(String),
}

impl PlatformError {
    /// Whether a failed delete just means someone else got there first.
    pub fn is_message_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound)
    }
}

impl From<RequestError> for PlatformError {
    fn from(err: RequestError) -> Self {
        match &err {
            RequestError::Api(ApiError::MessageToDeleteNotFound) => Self::MessageNotFound,
            // Wordings teloxide does not recognize still carry the raw text.
            RequestError::Api(ApiError::Unknown(text))
                if text
                    .to_ascii_lowercase()
                    .contains("message to delete not found") =>
            {
                Self::MessageNotFound
            }
            RequestError::Api(_) => Self::Api(err.to_string()),
            RequestError::RetryAfter(_) => Self::RateLimited(err.to_string()),
            RequestError::Network(_) | RequestError::Io(_) => Self::Network(err.to_string()),
            _ => Self::Api(err.to_string()),
        }
    }
}

/// Operations the sticker handler needs from the messaging platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Fetch the bot's own membership in a chat.
    async fn own_membership(&self, chat_id: ChatId) -> Result<MemberCapabilities, PlatformError>;

    /// Delete one message.
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId)
    -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_not_found() {
        let err = PlatformError::from(RequestError::Api(ApiError::MessageToDeleteNotFound));
        assert!(err.is_message_not_found());
    }

    #[test]
    fn test_unknown_text_not_found() {
        let err = PlatformError::from(RequestError::Api(ApiError::Unknown(
            "Bad Request: Message to delete not found".to_string(),
        )));
        assert_eq!(err, PlatformError::MessageNotFound);
    }

    #[test]
    fn test_other_api_errors_are_operational() {
        let err = PlatformError::from(RequestError::Api(ApiError::Unknown(
            "Bad Request: not enough rights".to_string(),
        )));

        assert!(!err.is_message_not_found());
        assert!(matches!(err, PlatformError::Api(_)));
    }
}
