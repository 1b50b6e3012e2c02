//! Bot runtime - long polling.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use teloxide::update_listeners::Polling;
use tracing::info;

use super::dispatcher::{ThrottledBot, UpdateKey};
use super::DispatchErrorHandler;
use crate::monitor::Monitor;

/// Run the bot with long polling until Ctrl+C.
///
/// Only message updates are requested, and the backlog accumulated while
/// the bot was offline is dropped. On shutdown polling stops first, then
/// in-flight handlers are allowed to finish.
pub async fn run(
    bot: ThrottledBot,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, UpdateKey>,
    monitor: Arc<Monitor>,
) {
    let listener = Polling::builder(bot)
        .allowed_updates(vec![AllowedUpdate::Message])
        .drop_pending_updates()
        .build();

    info!("Starting bot in polling mode...");

    dispatcher
        .dispatch_with_listener(
            listener,
            Arc::new(DispatchErrorHandler::new(monitor, "Update listener error")),
        )
        .await;

    info!("Dispatcher stopped");
}
