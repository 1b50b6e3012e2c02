//! Update dispatcher setup.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, UpdateKind};

use super::DispatchErrorHandler;
use crate::events::{self, StickerGuard};
use crate::monitor::Monitor;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Updates are keyed per message, so a slow delete in one chat never holds
/// up the next sticker, even in the same chat.
pub type UpdateKey = (ChatId, MessageId);

/// Build the dispatcher with the sticker handler.
pub fn build_dispatcher(
    bot: ThrottledBot,
    guard: StickerGuard,
    monitor: Arc<Monitor>,
) -> Dispatcher<ThrottledBot, anyhow::Error, UpdateKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![guard])
        .error_handler(Arc::new(DispatchErrorHandler::new(
            monitor,
            "Error while dispatching update",
        )))
        .distribution_function(update_key)
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().branch(events::message_event_handler())
}

fn update_key(update: &Update) -> Option<UpdateKey> {
    match &update.kind {
        UpdateKind::Message(msg) => Some((msg.chat.id, msg.id)),
        _ => None,
    }
}
