//! Remote API abstraction for Matchday.
//!
//! This module provides a pluggable API layer that abstracts the
//! community backend (HTTP, mock for testing).
//!
//! # Design
//!
//! The API trait is async and covers exactly what the friendship core needs:
//! - four mutating endpoints, one per friendship transition
//! - two reads that fill the `userDetail` and `friendshipRequests` cache slots
//!
//! Mutations never return a body the client relies on; after a mutation the
//! affected slots are invalidated and refetched instead.
//!
//! # Example
//!
//! ```ignore
//! let api = MockApi::new();
//! api.accept_request(&FriendshipId::new("f1")).await?;
//! let pending = api.friendship_requests().await?;
//! ```

mod http;
mod mock;

pub use http::HttpApi;
pub use mock::{Gate, MockApi};

use async_trait::async_trait;
use matchday_core::Transition;
use matchday_types::{
    CacheKey, CacheValue, FriendRequest, FriendshipId, UserDetail, UserId, Username,
};
use thiserror::Error;

use crate::cache::QueryFetcher;

/// API errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the error payload, if any.
        message: Option<String>,
    },

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    /// The answer could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// Message the server put in its error payload.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The community API, as seen by the friendship core.
#[async_trait]
pub trait FriendshipApi: Send + Sync {
    /// `POST /friendships/request/{targetUserId}`.
    async fn send_request(&self, target: &UserId) -> Result<(), ApiError>;

    /// `PUT /friendships/request/{friendshipId}/cancel`.
    async fn cancel_request(&self, friendship: &FriendshipId) -> Result<(), ApiError>;

    /// `PUT /friendships/request/{friendshipId}/reject`.
    async fn reject_request(&self, friendship: &FriendshipId) -> Result<(), ApiError>;

    /// `PUT /friendships/request/{friendshipId}/accept`.
    async fn accept_request(&self, friendship: &FriendshipId) -> Result<(), ApiError>;

    /// `GET /friendships/requests`: pending incoming requests of the viewer.
    async fn friendship_requests(&self) -> Result<Vec<FriendRequest>, ApiError>;

    /// `GET /users/{username}`, with the relationship projected for the viewer.
    async fn user_detail(&self, username: &Username) -> Result<UserDetail, ApiError>;
}

/// Send `transition` to the endpoint that performs it.
///
/// At most one attempt; retrying is left to the user.
pub async fn dispatch<A: FriendshipApi + ?Sized>(
    api: &A,
    transition: &Transition,
) -> Result<(), ApiError> {
    match transition {
        Transition::Send { target } => api.send_request(target).await,
        Transition::Cancel { friendship } => api.cancel_request(friendship).await,
        Transition::Reject { friendship } => api.reject_request(friendship).await,
        Transition::Accept { friendship } => api.accept_request(friendship).await,
    }
}

#[async_trait]
impl<A: FriendshipApi> QueryFetcher for A {
    async fn fetch(&self, key: &CacheKey) -> Result<CacheValue, ApiError> {
        match key {
            CacheKey::UserDetail(username) => {
                self.user_detail(username).await.map(CacheValue::UserDetail)
            }
            CacheKey::FriendshipRequests => self
                .friendship_requests()
                .await
                .map(CacheValue::FriendshipRequests),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_message() {
        let err = ApiError::Server {
            status: 409,
            message: Some("Friend request already exists".into()),
        };
        assert_eq!(
            err.to_string(),
            "server returned 409: Friend request already exists"
        );
        assert_eq!(err.server_message(), Some("Friend request already exists"));
    }

    #[test]
    fn non_server_errors_have_no_server_message() {
        assert!(ApiError::Timeout.server_message().is_none());
        assert!(ApiError::Network("reset".into()).server_message().is_none());
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "server returned 500: no message");
    }

    #[tokio::test]
    async fn dispatch_routes_each_transition() {
        let api = MockApi::new();
        let transitions = vec![
            Transition::Send {
                target: UserId::new("u1"),
            },
            Transition::Cancel {
                friendship: FriendshipId::new("f1"),
            },
            Transition::Reject {
                friendship: FriendshipId::new("f2"),
            },
            Transition::Accept {
                friendship: FriendshipId::new("f3"),
            },
        ];
        for t in &transitions {
            dispatch(&api, t).await.unwrap();
        }
        assert_eq!(api.dispatched(), transitions);
    }

    #[tokio::test]
    async fn fetcher_maps_keys_to_reads() {
        let api = MockApi::new();
        let value = api.fetch(&CacheKey::FriendshipRequests).await.unwrap();
        assert_eq!(value, CacheValue::FriendshipRequests(vec![]));

        let missing = api
            .fetch(&CacheKey::user_detail(&Username::new("ghost")))
            .await;
        assert!(matches!(missing, Err(ApiError::Server { status: 404, .. })));
    }
}
