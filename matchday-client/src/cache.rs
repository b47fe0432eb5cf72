//! QueryCache - keyed client cache of server data.
//!
//! Every piece of server data the UI shows lives in a slot addressed by a
//! [`CacheKey`]. A slot holds the last value written to it, knows whether
//! that value is stale, and tracks at most one in-flight load.
//!
//! # Loads and cancellation
//!
//! Loads run as spawned tasks so they can be cancelled. Each slot carries a
//! generation counter: starting, cancelling or superseding a load bumps it,
//! and a load only lands if the generation it started with is still
//! current. [`QueryCache::invalidate`] supersedes a running load, so data
//! requested before the slot went stale never marks it fresh again.
//! [`QueryCache::cancel`] aborts the task and waits for it to terminate, so
//! once it returns nothing that was in flight can write to the slot.
//!
//! Plain writes ([`QueryCache::set`], [`QueryCache::update`],
//! [`QueryCache::restore`]) do not cancel loads. Callers that need a write
//! to survive cancel first.
//!
//! ```text
//! UI ──read──► QueryCache ──load──► QueryFetcher ──► API
//!                  ▲
//!   FriendshipSync─┘ (cancel, snapshot, project, restore, invalidate)
//! ```

use async_trait::async_trait;
use dashmap::DashMap;
use matchday_types::{CacheKey, CacheValue};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::api::ApiError;

/// Cache errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Loading the slot failed.
    #[error("failed to load {key}: {source}")]
    Fetch {
        /// Slot being loaded.
        key: CacheKey,
        /// Underlying API error.
        source: ApiError,
    },

    /// The load was cancelled before it finished.
    #[error("load of {key} was cancelled")]
    Cancelled {
        /// Slot being loaded.
        key: CacheKey,
    },
}

/// Source of authoritative values for cache slots.
#[async_trait]
pub trait QueryFetcher: Send + Sync {
    /// Load the current server value for `key`.
    async fn fetch(&self, key: &CacheKey) -> Result<CacheValue, ApiError>;
}

/// Cache behaviour knobs.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// A value older than this counts as stale.
    pub stale_time: Duration,
    /// Start a background load when a slot holding a value is invalidated.
    pub refetch_on_invalidate: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            refetch_on_invalidate: true,
        }
    }
}

#[derive(Debug, Clone)]
enum LoadStatus {
    Running,
    Done(Result<CacheValue, ApiError>),
}

impl LoadStatus {
    fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
    status: watch::Receiver<LoadStatus>,
}

impl InFlight {
    fn load(&self) -> Load {
        Load {
            generation: self.generation,
            status: self.status.clone(),
        }
    }
}

/// A waiter's handle on one load.
struct Load {
    generation: u64,
    status: watch::Receiver<LoadStatus>,
}

enum AfterLoad {
    /// The load was the slot's latest.
    Current,
    /// A newer load is running.
    Superseded(Load),
    /// Cancelled or overtaken by a load that already finished.
    Replaced(Option<CacheValue>),
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<CacheValue>,
    updated_at: Option<Instant>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl Slot {
    fn write(&mut self, value: Option<CacheValue>) {
        self.updated_at = value.as_ref().map(|_| Instant::now());
        self.value = value;
        self.invalidated = false;
    }

    fn is_stale(&self, stale_time: Duration) -> bool {
        match (&self.value, self.updated_at) {
            (Some(_), Some(at)) => self.invalidated || at.elapsed() >= stale_time,
            _ => true,
        }
    }

    /// Record the result of load `generation`. Returns whether it landed.
    fn complete(&mut self, generation: u64, result: &Result<CacheValue, ApiError>) -> bool {
        if self.in_flight.as_ref().map(|f| f.generation) == Some(generation) {
            self.in_flight = None;
        }
        if self.generation != generation {
            return false;
        }
        if let Ok(value) = result {
            self.write(Some(value.clone()));
        }
        true
    }
}

/// Shared, cloneable handle to the client cache.
#[derive(Clone)]
pub struct QueryCache {
    slots: Arc<DashMap<CacheKey, Slot>>,
    fetcher: Arc<dyn QueryFetcher>,
    settings: CacheSettings,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("slots", &self.slots.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl QueryCache {
    /// Create an empty cache loading through `fetcher`.
    pub fn new(fetcher: Arc<dyn QueryFetcher>, settings: CacheSettings) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            fetcher,
            settings,
        }
    }

    /// Current value of the slot, stale or not.
    pub fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.slots.get(key).and_then(|slot| slot.value.clone())
    }

    /// Write a value and mark it fresh.
    pub fn set(&self, key: &CacheKey, value: CacheValue) {
        debug_assert!(value.fits(key), "value kind does not match {}", key);
        self.slots.entry(key.clone()).or_default().write(Some(value));
    }

    /// Put a previously taken snapshot back exactly. `None` empties the slot.
    pub fn restore(&self, key: &CacheKey, snapshot: Option<CacheValue>) {
        self.slots.entry(key.clone()).or_default().write(snapshot);
    }

    /// Write a value computed from the current one.
    ///
    /// Returning `None` from `f` leaves the slot untouched. Returns whether
    /// a write happened.
    pub fn update<F>(&self, key: &CacheKey, f: F) -> bool
    where
        F: FnOnce(Option<&CacheValue>) -> Option<CacheValue>,
    {
        let mut slot = self.slots.entry(key.clone()).or_default();
        match f(slot.value.as_ref()) {
            Some(value) => {
                slot.write(Some(value));
                true
            }
            None => false,
        }
    }

    /// Whether the next read should go to the server.
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.slots
            .get(key)
            .map(|slot| slot.is_stale(self.settings.stale_time))
            .unwrap_or(true)
    }

    /// Whether a load for the slot is running.
    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.slots
            .get(key)
            .map(|slot| slot.in_flight.is_some())
            .unwrap_or(false)
    }

    /// Mark the slot stale so the next read refetches.
    ///
    /// A load already running was started before whatever made the slot
    /// stale, so it is superseded: it can no longer land, and a new load
    /// replaces it. With `refetch_on_invalidate`, a slot that holds a value
    /// also starts loading in the background right away.
    pub fn invalidate(&self, key: &CacheKey) {
        let (superseded, has_value) = match self.slots.get_mut(key) {
            Some(mut slot) => {
                slot.invalidated = true;
                let running = slot
                    .in_flight
                    .take()
                    .filter(|in_flight| !in_flight.handle.is_finished());
                if let Some(in_flight) = &running {
                    slot.generation += 1;
                    in_flight.handle.abort();
                }
                (running.is_some(), slot.value.is_some())
            }
            None => (false, false),
        };
        tracing::debug!("Invalidated {}", key);

        if superseded || (has_value && self.settings.refetch_on_invalidate) {
            self.refetch(key);
        }
    }

    /// Start a background load of the slot and return immediately.
    ///
    /// Joins the running load if there is one. Does nothing outside a
    /// tokio runtime.
    pub fn refetch(&self, key: &CacheKey) {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!("No runtime, not refetching {}", key);
            return;
        }
        let _ = self.start_load(key);
    }

    /// Return the slot's value, loading it first if it is stale.
    ///
    /// If the load being awaited is superseded by an invalidation, the
    /// newer load is awaited instead.
    pub async fn fetch(&self, key: &CacheKey) -> Result<CacheValue, CacheError> {
        if !self.is_stale(key) {
            if let Some(value) = self.get(key) {
                return Ok(value);
            }
        }
        let mut load = self.start_load(key);
        loop {
            let outcome = wait_for_load(key, &mut load.status).await;
            match self.after_load(key, load.generation) {
                AfterLoad::Current => return outcome,
                AfterLoad::Superseded(next) => load = next,
                AfterLoad::Replaced(Some(value)) => return Ok(value),
                AfterLoad::Replaced(None) => {
                    return Err(outcome.err().unwrap_or_else(|| CacheError::Cancelled {
                        key: key.clone(),
                    }));
                }
            }
        }
    }

    /// Abort any in-flight load of the slot and wait until it has stopped.
    pub async fn cancel(&self, key: &CacheKey) {
        let in_flight = self.slots.get_mut(key).and_then(|mut slot| {
            slot.generation += 1;
            slot.in_flight.take()
        });
        if let Some(in_flight) = in_flight {
            in_flight.handle.abort();
            let _ = in_flight.handle.await;
            tracing::debug!("Cancelled load of {}", key);
        }
    }

    /// Wait until the slot has no load in flight.
    pub async fn settle(&self, key: &CacheKey) {
        let mut waiting = self.running_load(key);
        while let Some(mut load) = waiting {
            let _ = load.status.wait_for(LoadStatus::is_done).await;
            waiting = self
                .running_load(key)
                .filter(|next| next.generation != load.generation);
        }
    }

    fn running_load(&self, key: &CacheKey) -> Option<Load> {
        let slot = self.slots.get(key)?;
        slot.in_flight.as_ref().map(InFlight::load)
    }

    /// What a waiter on load `generation` should do once it has finished.
    fn after_load(&self, key: &CacheKey, generation: u64) -> AfterLoad {
        let Some(slot) = self.slots.get(key) else {
            return AfterLoad::Current;
        };
        if slot.generation == generation {
            return AfterLoad::Current;
        }
        match &slot.in_flight {
            Some(in_flight) if in_flight.generation != generation => {
                AfterLoad::Superseded(in_flight.load())
            }
            _ if !slot.invalidated => AfterLoad::Replaced(slot.value.clone()),
            _ => AfterLoad::Replaced(None),
        }
    }

    fn start_load(&self, key: &CacheKey) -> Load {
        let mut slot = self.slots.entry(key.clone()).or_default();
        if let Some(in_flight) = &slot.in_flight {
            if !in_flight.handle.is_finished() {
                return in_flight.load();
            }
        }

        slot.generation += 1;
        let generation = slot.generation;
        let (tx, rx) = watch::channel(LoadStatus::Running);
        let slots = Arc::clone(&self.slots);
        let fetcher = Arc::clone(&self.fetcher);
        let task_key = key.clone();

        tracing::debug!("Loading {} (generation {})", key, generation);
        let handle = tokio::spawn(async move {
            let result = fetcher.fetch(&task_key).await;
            let landed = slots
                .get_mut(&task_key)
                .map(|mut slot| slot.complete(generation, &result))
                .unwrap_or(false);
            match &result {
                Ok(_) if landed => tracing::debug!("Loaded {}", task_key),
                Ok(_) => tracing::debug!("Discarded superseded load of {}", task_key),
                Err(e) => tracing::warn!("Failed to load {}: {}", task_key, e),
            }
            let _ = tx.send(LoadStatus::Done(result));
        });

        slot.in_flight = Some(InFlight {
            generation,
            handle,
            status: rx.clone(),
        });
        Load {
            generation,
            status: rx,
        }
    }
}

async fn wait_for_load(
    key: &CacheKey,
    status: &mut watch::Receiver<LoadStatus>,
) -> Result<CacheValue, CacheError> {
    let done = match status.wait_for(LoadStatus::is_done).await {
        Ok(done) => done.clone(),
        Err(_) => return Err(CacheError::Cancelled { key: key.clone() }),
    };
    match done {
        LoadStatus::Done(Ok(value)) => Ok(value),
        LoadStatus::Done(Err(source)) => Err(CacheError::Fetch {
            key: key.clone(),
            source,
        }),
        LoadStatus::Running => Err(CacheError::Cancelled { key: key.clone() }),
    }
}
