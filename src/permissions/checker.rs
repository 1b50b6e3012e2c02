//! Permission checker with caching.

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::ChatId;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::monitor::Monitor;
use crate::platform::ChatPlatform;

/// Checks whether the bot can delete messages in a chat.
///
/// Successful lookups are cached per chat for the configured TTL. Failed
/// lookups are never cached.
#[derive(Clone)]
pub struct PermissionChecker {
    platform: Arc<dyn ChatPlatform>,
    monitor: Arc<Monitor>,
    cache: Option<TypedCache<i64, bool>>,
}

impl PermissionChecker {
    /// Create a checker. A zero `cache_ttl` disables caching.
    pub fn new(platform: Arc<dyn ChatPlatform>, monitor: Arc<Monitor>, cache_ttl: Duration) -> Self {
        let cache = (!cache_ttl.is_zero()).then(|| {
            TypedCache::new(
                "own_permissions",
                CacheConfig::with_capacity(10_000).ttl(cache_ttl),
            )
        });

        Self {
            platform,
            monitor,
            cache,
        }
    }

    /// Whether the bot holds the delete-messages right in `chat_id`.
    ///
    /// Never fails: lookup errors are logged through the monitor and
    /// reported as `false`.
    pub async fn has_delete_permission(&self, chat_id: ChatId) -> bool {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&chat_id.0)) {
            debug!("Permission cache hit for chat {}", chat_id);
            return cached;
        }

        match self.platform.own_membership(chat_id).await {
            Ok(capabilities) => {
                debug!(
                    "Bot membership in chat {}: admin={}, can_delete_messages={}",
                    chat_id, capabilities.is_admin, capabilities.can_delete_messages
                );
                if let Some(cache) = &self.cache {
                    cache.insert(chat_id.0, capabilities.can_delete_messages);
                }
                capabilities.can_delete_messages
            }
            Err(e) => {
                self.monitor
                    .log_error(&e, Some("Error checking admin permissions"))
                    .await;
                false
            }
        }
    }

    /// Forget the cached answer for a chat.
    ///
    /// Call this when a delete fails in a way that suggests rights changed.
    pub fn invalidate(&self, chat_id: ChatId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&chat_id.0);
            debug!("Invalidated permission cache for chat {}", chat_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::DisabledSink;
    use crate::monitor::MonitorSettings;
    use crate::testing::{DeleteReply, FakePlatform, Membership};

    const CHAT: ChatId = ChatId(-100_123);

    fn setup(membership: Membership, ttl: Duration) -> (Arc<FakePlatform>, Arc<Monitor>, PermissionChecker) {
        let platform = Arc::new(FakePlatform::new(membership, DeleteReply::Ok));
        let monitor = Arc::new(Monitor::new(Arc::new(DisabledSink), MonitorSettings::default()));
        let checker = PermissionChecker::new(platform.clone(), monitor.clone(), ttl);
        (platform, monitor, checker)
    }

    #[tokio::test]
    async fn test_reports_capability_flag() {
        let (_, _, allowed) = setup(Membership::CanDelete, Duration::ZERO);
        let (_, _, denied) = setup(Membership::CannotDelete, Duration::ZERO);

        assert!(allowed.has_delete_permission(CHAT).await);
        assert!(!denied.has_delete_permission(CHAT).await);
    }

    #[tokio::test]
    async fn test_failure_fails_closed_and_logs() {
        let (_, monitor, checker) = setup(Membership::Fails, Duration::from_secs(60));

        assert!(!checker.has_delete_permission(CHAT).await);
        assert_eq!(monitor.error_count(), 1);
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let (platform, _, checker) = setup(Membership::CanDelete, Duration::from_secs(60));

        assert!(checker.has_delete_permission(CHAT).await);
        assert!(checker.has_delete_permission(CHAT).await);
        assert_eq!(platform.membership_calls(), 1);

        checker.invalidate(CHAT);
        platform.set_membership(Membership::CannotDelete);
        assert!(!checker.has_delete_permission(CHAT).await);
        assert_eq!(platform.membership_calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let (platform, _, checker) = setup(Membership::Fails, Duration::from_secs(60));

        assert!(!checker.has_delete_permission(CHAT).await);
        platform.set_membership(Membership::CanDelete);
        assert!(checker.has_delete_permission(CHAT).await);
        assert_eq!(platform.membership_calls(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let (platform, _, checker) = setup(Membership::CanDelete, Duration::ZERO);

        checker.has_delete_permission(CHAT).await;
        checker.has_delete_permission(CHAT).await;
        assert_eq!(platform.membership_calls(), 2);
    }
}
