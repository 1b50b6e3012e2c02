//! Event handlers.
//!
//! Only one event matters to this bot: a sticker posted in a group.

pub mod sticker;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub use sticker::{InboundMessage, StickerGuard};

/// Build the message event handler.
///
/// Only group and supergroup messages carrying a sticker reach the guard.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .filter(|msg: Message| msg.sticker().is_some())
        .endpoint(sticker_handler)
}

async fn sticker_handler(msg: Message, guard: StickerGuard) -> anyhow::Result<()> {
    guard.handle(InboundMessage::from_message(&msg)).await;
    Ok(())
}
