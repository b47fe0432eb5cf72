//! # matchday-client
//!
//! Client library for the Matchday community API.
//!
//! This is the library the app shell uses to read profiles and friend
//! requests and to act on friendships.
//!
//! ## Features
//!
//! - **Query Cache**: keyed slots with staleness, background refetch and
//!   awaitable cancellation of in-flight loads
//! - **Optimistic Friendship Actions**: predicted views are written before
//!   the API answers and rolled back exactly on failure
//! - **API Abstraction**: pluggable API layer (HTTP, mock)
//! - **Pure State Machines**: uses matchday-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use matchday_client::{ClientConfig, FriendshipSync, HttpApi, QueryCache, TracingNotifier};
//!
//! let config = ClientConfig::from_file("matchday.toml".as_ref())?;
//! let api = Arc::new(HttpApi::new(&config)?);
//! let cache = QueryCache::new(api.clone(), config.cache_settings());
//! let sync = FriendshipSync::new(api, cache.clone(), Arc::new(TracingNotifier));
//!
//! let bob = Username::parse("bob")?;
//! let detail = cache.fetch(&CacheKey::user_detail(&bob)).await?;
//! sync.accept(&bob, &friendship_id).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod cache;
pub mod config;
pub mod notify;
pub mod refresh;
pub mod sync;

pub use api::{ApiError, FriendshipApi, Gate, HttpApi, MockApi};
pub use cache::{CacheError, CacheSettings, QueryCache, QueryFetcher};
pub use config::{ClientConfig, ConfigError};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use refresh::RefreshController;
pub use sync::{FriendshipSync, TransitionOutcome};
