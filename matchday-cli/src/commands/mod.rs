//! CLI command implementations.

pub mod friendship;
pub mod profile;
pub mod requests;

use anyhow::{Context, Result};
use matchday_client::{
    CacheSettings, FriendshipApi, FriendshipSync, Notification, Notifier, QueryCache,
};
use matchday_types::{CacheKey, UserDetail, UserId, Username};
use std::sync::Arc;

/// Everything one command needs: cache, synchronizer and who is signed in.
pub struct Session<A: FriendshipApi> {
    pub cache: QueryCache,
    pub sync: FriendshipSync<A>,
    pub viewer: UserId,
}

impl<A: FriendshipApi + 'static> Session<A> {
    /// Wire a cache and synchronizer around `api`.
    pub fn new(api: Arc<A>, viewer: UserId, settings: CacheSettings) -> Self {
        let cache = QueryCache::new(api.clone(), settings);
        let sync = FriendshipSync::new(api, cache.clone(), Arc::new(ConsoleNotifier));
        Self {
            cache,
            sync,
            viewer,
        }
    }

    /// Load a member's profile into the cache and return it.
    pub async fn load_profile(&self, username: &Username) -> Result<UserDetail> {
        let value = self
            .cache
            .fetch(&CacheKey::user_detail(username))
            .await
            .with_context(|| format!("Failed to load profile of @{}", username))?;
        value
            .as_user_detail()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Cache returned a non-profile value for @{}", username))
    }
}

/// Parse a username argument.
pub fn parse_username(raw: &str) -> Result<Username> {
    let trimmed = raw.trim_start_matches('@');
    Username::parse(trimmed).with_context(|| format!("Invalid username '{}'", raw))
}

/// Prints failed-action notifications to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("! {}", notification.message);
    }
}
