//! Mock API for testing.
//!
//! Holds the "server truth" in memory, records every dispatched transition,
//! can be told to fail the next call, and can hold calls at a [`Gate`] so a
//! test can look at the cache while a request is in flight.

use super::{ApiError, FriendshipApi};
use async_trait::async_trait;
use matchday_core::Transition;
use matchday_types::{FriendRequest, FriendshipId, UserDetail, UserId, Username};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

/// Rendezvous point between a held API call and the test driving it.
///
/// Every call reaching the gate signals [`Gate::entered`] and then waits
/// for a [`Gate::release`]. Releases are counted, and a release taken by
/// a call that is then aborted goes back to the gate.
#[derive(Debug, Clone)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Semaphore>,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Semaphore::new(0)),
        }
    }
}

impl Gate {
    /// Wait until a call has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held call continue.
    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }
}

/// Mock API for testing.
#[derive(Debug, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

#[derive(Debug, Default)]
struct MockApiInner {
    users: HashMap<Username, UserDetail>,
    requests: Vec<FriendRequest>,
    dispatched: Vec<Transition>,
    fetch_count: usize,
    fail_next_dispatch: Option<ApiError>,
    fail_next_fetch: Option<ApiError>,
    dispatch_gate: Option<Gate>,
    fetch_gate: Option<Gate>,
}

impl MockApi {
    /// Create a new mock API with no users and no pending requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what `GET /users/{username}` returns for this profile.
    pub fn put_user(&self, detail: UserDetail) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(detail.user.username.clone(), detail);
    }

    /// Set what `GET /friendships/requests` returns.
    pub fn set_requests(&self, requests: Vec<FriendRequest>) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests = requests;
    }

    /// All transitions dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<Transition> {
        let inner = self.inner.lock().unwrap();
        inner.dispatched.clone()
    }

    /// Number of reads served so far.
    pub fn fetch_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.fetch_count
    }

    /// Cause the next mutation to fail with `error`.
    pub fn fail_next_dispatch(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_dispatch = Some(error);
    }

    /// Cause the next read to fail with `error`.
    pub fn fail_next_fetch(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_fetch = Some(error);
    }

    /// Hold every mutation at the returned gate until released.
    pub fn hold_dispatches(&self) -> Gate {
        let gate = Gate::default();
        let mut inner = self.inner.lock().unwrap();
        inner.dispatch_gate = Some(gate.clone());
        gate
    }

    /// Hold every read at the returned gate until released.
    pub fn hold_fetches(&self) -> Gate {
        let gate = Gate::default();
        let mut inner = self.inner.lock().unwrap();
        inner.fetch_gate = Some(gate.clone());
        gate
    }

    /// Clear all state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockApiInner::default();
    }

    async fn mutate(&self, transition: Transition) -> Result<(), ApiError> {
        let gate = {
            let mut inner = self.inner.lock().unwrap();
            inner.dispatched.push(transition);
            inner.dispatch_gate.clone()
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }

        let mut inner = self.inner.lock().unwrap();
        match inner.fail_next_dispatch.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Serve a read. The answer reflects the state when the call was made,
    /// even if the call is then held at the gate.
    async fn read<T>(
        &self,
        f: impl FnOnce(&MockApiInner) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let (result, gate) = {
            let mut inner = self.inner.lock().unwrap();
            inner.fetch_count += 1;
            let result = match inner.fail_next_fetch.take() {
                Some(error) => Err(error),
                None => f(&inner),
            };
            (result, inner.fetch_gate.clone())
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        result
    }
}

impl Clone for MockApi {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl FriendshipApi for MockApi {
    async fn send_request(&self, target: &UserId) -> Result<(), ApiError> {
        self.mutate(Transition::Send {
            target: target.clone(),
        })
        .await
    }

    async fn cancel_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.mutate(Transition::Cancel {
            friendship: friendship.clone(),
        })
        .await
    }

    async fn reject_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.mutate(Transition::Reject {
            friendship: friendship.clone(),
        })
        .await
    }

    async fn accept_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.mutate(Transition::Accept {
            friendship: friendship.clone(),
        })
        .await
    }

    async fn friendship_requests(&self) -> Result<Vec<FriendRequest>, ApiError> {
        self.read(|inner| Ok(inner.requests.clone())).await
    }

    async fn user_detail(&self, username: &Username) -> Result<UserDetail, ApiError> {
        let username = username.clone();
        self.read(move |inner| {
            inner.users.get(&username).cloned().ok_or(ApiError::Server {
                status: 404,
                message: Some(format!("User {} not found", username)),
            })
        })
        .await
    }
}
