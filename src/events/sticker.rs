//! Banned sticker removal.
//!
//! Every group sticker goes through `StickerGuard::handle`:
//!
//! 1. Record activity on the monitor (even for stickers we ignore).
//! 2. Ignore stickers whose set is not on the denylist.
//! 3. Ignore (with a warning) if the bot cannot delete messages here.
//! 4. Wait `deletion_delay`, then delete the message.
//!
//! A delete that fails because the message is already gone is benign. Any
//! other failure goes through the monitor's error path. Nothing escapes the
//! handler, not even a panic.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use teloxide::types::{ChatId, Message, MessageId, UserId};
use tracing::{debug, info, warn};

use crate::denylist::Denylist;
use crate::monitor::Monitor;
use crate::permissions::PermissionChecker;
use crate::platform::ChatPlatform;

/// The parts of an incoming message the guard looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub sender_id: Option<UserId>,
    pub sticker: Option<StickerPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerPayload {
    /// Name of the sticker set, if the sticker belongs to one.
    pub set_name: Option<String>,
}

impl InboundMessage {
    pub fn from_message(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id,
            message_id: msg.id,
            sender_id: msg.from.as_ref().map(|u| u.id),
            sticker: msg.sticker().map(|s| StickerPayload {
                set_name: s.set_name.clone(),
            }),
        }
    }
}

/// Why a message was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NoSticker,
    NotBanned,
    NoPermission,
}

/// Terminal result of handling one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored(Skip),
    Deleted,
    /// `benign` is set when the message was already gone.
    DeleteFailed { benign: bool },
    /// The handler panicked; the fault was logged.
    Faulted,
}

/// Removes stickers from banned sets.
#[derive(Clone)]
pub struct StickerGuard {
    denylist: Denylist,
    permissions: PermissionChecker,
    platform: Arc<dyn ChatPlatform>,
    monitor: Arc<Monitor>,
    deletion_delay: Duration,
}

impl StickerGuard {
    pub fn new(
        denylist: Denylist,
        permissions: PermissionChecker,
        platform: Arc<dyn ChatPlatform>,
        monitor: Arc<Monitor>,
        deletion_delay: Duration,
    ) -> Self {
        Self {
            denylist,
            permissions,
            platform,
            monitor,
            deletion_delay,
        }
    }

    /// Handle one message. Never fails and never panics.
    pub async fn handle(&self, msg: InboundMessage) -> Outcome {
        self.monitor.update_activity();

        match AssertUnwindSafe(self.process(&msg)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let error = format!("handler panicked: {}", panic_message(&*panic));
                drop(panic);
                self.monitor
                    .log_error(&error, Some("Unexpected error in sticker handler"))
                    .await;
                Outcome::Faulted
            }
        }
    }

    async fn process(&self, msg: &InboundMessage) -> Outcome {
        let Some(sticker) = &msg.sticker else {
            return Outcome::Ignored(Skip::NoSticker);
        };

        let chat_id = msg.chat_id;
        let set_name = sticker.set_name.as_deref().unwrap_or_default();

        info!("Processing sticker from set '{}' in chat {}", set_name, chat_id);

        if !self.denylist.is_banned(set_name) {
            debug!("Sticker set '{}' is not in banned list", set_name);
            return Outcome::Ignored(Skip::NotBanned);
        }

        // Most expensive check, so it goes last.
        if !self.permissions.has_delete_permission(chat_id).await {
            warn!("Bot lacks admin permissions in chat {}", chat_id);
            return Outcome::Ignored(Skip::NoPermission);
        }

        info!("Attempting to delete sticker from banned set '{}'", set_name);

        tokio::time::sleep(self.deletion_delay).await;

        match self.platform.delete_message(chat_id, msg.message_id).await {
            Ok(()) => {
                match msg.sender_id {
                    Some(user_id) => info!(
                        "Successfully deleted sticker message from set '{}' in chat {} sent by user {}",
                        set_name, chat_id, user_id
                    ),
                    None => info!(
                        "Successfully deleted sticker message from set '{}' in chat {} (no sender)",
                        set_name, chat_id
                    ),
                }
                Outcome::Deleted
            }
            Err(e) if e.is_message_not_found() => {
                warn!("Message already deleted in chat {}", chat_id);
                Outcome::DeleteFailed { benign: true }
            }
            Err(e) => {
                self.permissions.invalidate(chat_id);
                self.monitor
                    .log_error(&e, Some(&format!("Failed to delete message in chat {}", chat_id)))
                    .await;
                Outcome::DeleteFailed { benign: false }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
