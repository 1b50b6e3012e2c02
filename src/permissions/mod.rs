//! Permission checks for the bot itself.
//!
//! The bot may only delete a sticker once it has confirmed it holds the
//! "delete messages" right in that chat. Any failure to find out counts as
//! "no permission".
//!
//! ## Usage
//!
//! ```rust
//! let checker = PermissionChecker::new(platform, monitor, Duration::from_secs(60));
//!
//! if checker.has_delete_permission(chat_id).await {
//!     // ...
//! }
//! ```

mod checker;

pub use checker::PermissionChecker;
