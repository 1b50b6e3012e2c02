//! Cache module - thin typed layer over Moka.
//!
//! Used to remember API lookups that are expensive and change rarely,
//! such as the bot's own privileges in a chat.

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
