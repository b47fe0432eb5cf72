//! # matchday-types
//!
//! Domain and wire types for the Matchday community client.
//!
//! This crate provides the foundational types used across all Matchday crates:
//! - [`UserId`], [`FriendshipId`], [`Username`] - Opaque identity types
//! - [`Friendship`], [`FriendshipView`] - Server entity and viewer-relative projection
//! - [`UserDetail`], [`FriendRequest`] - Values held in the client cache
//! - [`CacheKey`], [`CacheValue`] - Composite cache slot addressing
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod friendship;
mod ids;
mod query;
mod user;

pub use error::TypesError;
pub use friendship::{FriendRequest, Friendship, FriendshipStatus, FriendshipView, Side};
pub use ids::{FriendshipId, UserId, Username};
pub use query::{CacheKey, CacheValue};
pub use user::{PublicUser, UserDetail, UserProfile};
