//! RefreshController - runs pull-to-refresh against the cache.
//!
//! Wraps the pure [`RefreshState`] machine: events go in, indicator actions
//! come out, and a [`RefreshAction::Refresh`] is carried out here by
//! reloading every watched slot before the gesture returns to rest.

use matchday_core::{RefreshAction, RefreshConfig, RefreshEvent, RefreshState};
use matchday_types::CacheKey;

use crate::cache::QueryCache;

/// Pull-to-refresh driver for one feed.
#[derive(Debug)]
pub struct RefreshController {
    state: RefreshState,
    config: RefreshConfig,
    cache: QueryCache,
    keys: Vec<CacheKey>,
}

impl RefreshController {
    /// Create a controller that reloads `keys` when a refresh fires.
    pub fn new(cache: QueryCache, keys: Vec<CacheKey>) -> Self {
        Self::with_config(cache, keys, RefreshConfig::default())
    }

    /// Create a controller with custom gesture tuning.
    pub fn with_config(cache: QueryCache, keys: Vec<CacheKey>, config: RefreshConfig) -> Self {
        Self {
            state: RefreshState::Idle,
            config,
            cache,
            keys,
        }
    }

    /// Current gesture state.
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Feed one touch event.
    ///
    /// Returns the indicator actions to animate, in order. When the event
    /// releases an armed pull this also reloads every watched slot and
    /// returns only after the reloads have finished.
    pub async fn handle(&mut self, event: RefreshEvent) -> Vec<RefreshAction> {
        let mut actions = self.step(event);
        if actions.contains(&RefreshAction::Refresh) {
            self.reload().await;
            actions.extend(self.step(RefreshEvent::RefreshFinished));
        }
        actions
    }

    fn step(&mut self, event: RefreshEvent) -> Vec<RefreshAction> {
        let (next, actions) = self.state.on_event(event, &self.config);
        if next != self.state {
            tracing::debug!("Refresh gesture: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        actions
    }

    async fn reload(&self) {
        tracing::info!("Refreshing {} slots", self.keys.len());
        for key in &self.keys {
            self.cache.invalidate(key);
            self.cache.refetch(key);
        }
        for key in &self.keys {
            self.cache.settle(key).await;
        }
    }
}
