//! Telegram implementation of the chat platform.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, UserId};

use super::{ChatPlatform, MemberCapabilities, PlatformError};
use crate::bot::ThrottledBot;

/// Talks to the Telegram Bot API on behalf of the bot user `me`.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: ThrottledBot,
    me: UserId,
}

impl TelegramPlatform {
    pub fn new(bot: ThrottledBot, me: UserId) -> Self {
        Self { bot, me }
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn own_membership(&self, chat_id: ChatId) -> Result<MemberCapabilities, PlatformError> {
        // Membership lookups are not rate limited, skip the Throttle queue.
        let member = self.bot.inner().get_chat_member(chat_id, self.me).await?;
        Ok(MemberCapabilities::from_chat_member(&member))
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}
