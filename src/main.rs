//! Sticker Guard - Telegram sticker moderation bot
//!
//! Watches group chats and deletes stickers that come from banned sets,
//! provided the bot is allowed to delete messages there.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `denylist` - Banned sticker sets
//! - `monitor` - Activity and error tracking with alert threshold
//! - `alert` - SMS alert sink
//! - `platform` - Telegram API seam (membership, delete)
//! - `cache` - TTL caching with Moka
//! - `permissions` - Bot permission checks with caching
//! - `events` - Sticker handler
//! - `bot` - Dispatcher, error handler and polling runtime
//! - `keepalive` - Liveness HTTP server

mod alert;
mod bot;
mod cache;
mod config;
mod denylist;
mod events;
mod keepalive;
mod monitor;
mod permissions;
mod platform;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, ConfigError, TOKEN_GUIDANCE};
use denylist::Denylist;
use events::StickerGuard;
use monitor::{Monitor, MonitorSettings};
use permissions::PermissionChecker;
use platform::{ChatPlatform, TelegramPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠️ {}", e);
            if e == ConfigError::MissingToken {
                eprintln!("{}", TOKEN_GUIDANCE);
            }
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("sticker_guard={},teloxide=warn", config.log_level))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting sticker guard...");

    let monitor = Arc::new(Monitor::new(
        alert::build_alert_sink(config.alert.clone()),
        MonitorSettings {
            max_errors: config.max_errors,
            error_window: config.error_window,
        },
    ));

    let settings = monitor.settings();
    info!(
        "Alert threshold: {} errors (window {}s)",
        settings.max_errors,
        settings.error_window.as_secs()
    );

    keepalive::spawn(config.keepalive_port, monitor.clone());

    // Initialize bot with Throttle for automatic rate limiting
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    // Also validates the token
    let me = match bot.get_me().await {
        Ok(me) => me,
        Err(e) => {
            monitor.log_error(&e, Some("Failed to start bot")).await;
            return Err(e.into());
        }
    };
    info!("Bot username: @{}", me.username());

    let denylist = Denylist::new(config.banned_sticker_sets.iter().cloned());
    if denylist.is_empty() {
        warn!("No banned sticker sets configured, nothing will be deleted");
    } else {
        info!("Watching {} banned sticker set(s)", denylist.len());
    }

    let platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone(), me.id));
    let permissions =
        PermissionChecker::new(platform.clone(), monitor.clone(), config.permission_cache_ttl);
    let guard = StickerGuard::new(
        denylist,
        permissions,
        platform,
        monitor.clone(),
        config.deletion_delay,
    );

    let dispatcher = bot::build_dispatcher(bot.clone(), guard, monitor.clone());

    bot::run(bot, dispatcher, monitor).await;

    info!("Shutdown complete");
    Ok(())
}
