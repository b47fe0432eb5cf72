//! FriendshipSync - optimistic friendship actions.
//!
//! Every friendship action runs the same protocol against two cache slots,
//! `userDetail(username)` and `friendshipRequests()`:
//!
//! 1. cancel in-flight loads of both slots and wait for them to stop
//! 2. snapshot both slots
//! 3. write the view predicted by [`Transition::projected_view`], and drop
//!    the actioned request from the pending list
//! 4. send the transition to the API (one attempt)
//! 5. on failure restore both snapshots exactly and notify the user;
//!    in every case invalidate both slots so the server has the last word
//!
//! Steps 1-3 complete before the API call starts, so any read made while
//! the request is in flight sees the predicted state.
//!
//! Two overlapping actions on the same slots are not serialised: the last
//! write wins until the final invalidation reconciles both with the server.

use matchday_core::{project_user_detail, remove_request, ActionError, FriendAction, Transition};
use matchday_types::{CacheKey, CacheValue, FriendshipId, UserId, Username};
use std::sync::Arc;

use crate::api::{self, ApiError, FriendshipApi};
use crate::cache::QueryCache;
use crate::notify::{Notification, Notifier};

/// How a friendship action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The server accepted the action; the slots are refetching.
    Committed,
    /// The server refused or could not be reached; the slots were restored.
    RolledBack {
        /// Why the action failed.
        error: ApiError,
    },
}

impl TransitionOutcome {
    /// Whether the server accepted the action.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Pre-action contents of both slots.
struct Snapshot {
    detail: Option<CacheValue>,
    requests: Option<CacheValue>,
}

/// Runs friendship actions with optimistic cache updates.
pub struct FriendshipSync<A: FriendshipApi> {
    api: Arc<A>,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
}

impl<A: FriendshipApi> FriendshipSync<A> {
    /// Create a synchronizer writing to `cache` and reporting to `notifier`.
    pub fn new(api: Arc<A>, cache: QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            cache,
            notifier,
        }
    }

    /// Send a friend request to `target`, whose profile is `username`.
    pub async fn send(&self, username: &Username, target: &UserId) -> TransitionOutcome {
        let transition = Transition::Send {
            target: target.clone(),
        };
        self.apply(username, transition).await
    }

    /// Withdraw the viewer's pending request.
    pub async fn cancel(
        &self,
        username: &Username,
        friendship: &FriendshipId,
    ) -> TransitionOutcome {
        let transition = Transition::Cancel {
            friendship: friendship.clone(),
        };
        self.apply(username, transition).await
    }

    /// Decline a pending request sent to the viewer.
    pub async fn reject(
        &self,
        username: &Username,
        friendship: &FriendshipId,
    ) -> TransitionOutcome {
        let transition = Transition::Reject {
            friendship: friendship.clone(),
        };
        self.apply(username, transition).await
    }

    /// End a friendship. Same as [`FriendshipSync::reject`].
    pub async fn unfriend(
        &self,
        username: &Username,
        friendship: &FriendshipId,
    ) -> TransitionOutcome {
        self.reject(username, friendship).await
    }

    /// Confirm a pending request sent to the viewer.
    pub async fn accept(
        &self,
        username: &Username,
        friendship: &FriendshipId,
    ) -> TransitionOutcome {
        let transition = Transition::Accept {
            friendship: friendship.clone(),
        };
        self.apply(username, transition).await
    }

    /// Run an offered action against the relationship currently cached for
    /// `username`.
    pub async fn perform(
        &self,
        username: &Username,
        target: &UserId,
        action: FriendAction,
    ) -> Result<TransitionOutcome, ActionError> {
        let cached = self.cache.get(&CacheKey::user_detail(username));
        let view = cached
            .as_ref()
            .and_then(CacheValue::as_user_detail)
            .and_then(|d| d.friendship.as_ref());
        let transition = action.transition(target, view)?;
        Ok(self.apply(username, transition).await)
    }

    /// Run `transition` through the optimistic protocol.
    pub async fn apply(&self, username: &Username, transition: Transition) -> TransitionOutcome {
        let detail_key = CacheKey::user_detail(username);
        let requests_key = CacheKey::FriendshipRequests;
        let kind = transition.kind();

        // Nothing in flight may land after the snapshot
        self.cache.cancel(&detail_key).await;
        self.cache.cancel(&requests_key).await;

        let snapshot = Snapshot {
            detail: self.cache.get(&detail_key),
            requests: self.cache.get(&requests_key),
        };

        let current_view = snapshot
            .detail
            .as_ref()
            .and_then(CacheValue::as_user_detail)
            .and_then(|d| d.friendship.as_ref());
        if snapshot.detail.is_some() && !transition.is_allowed_from(current_view) {
            tracing::debug!(
                "{} on {} does not match cached state {:?}, dispatching anyway",
                kind,
                username,
                current_view
            );
        }

        let view = transition.projected_view();
        self.cache
            .update(&detail_key, |current| project_user_detail(current, &view));
        if let Some(id) = transition.actioned_request() {
            self.cache
                .update(&requests_key, |current| remove_request(current, id));
        }
        tracing::debug!("Projected {} on {}: {:?}", kind, username, view);

        let outcome = match api::dispatch(self.api.as_ref(), &transition).await {
            Ok(()) => {
                tracing::debug!("{} on {} committed", kind, username);
                TransitionOutcome::Committed
            }
            Err(error) => {
                tracing::warn!("{} on {} failed, rolling back: {}", kind, username, error);
                self.cache.restore(&detail_key, snapshot.detail);
                self.cache.restore(&requests_key, snapshot.requests);
                self.notifier.notify(Notification::failure(kind, &error));
                TransitionOutcome::RolledBack { error }
            }
        };

        self.cache.invalidate(&detail_key);
        self.cache.invalidate(&requests_key);
        outcome
    }

    /// The cache this synchronizer writes to.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Get a reference to the underlying API (for testing).
    pub fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use crate::cache::CacheSettings;
    use chrono::{TimeZone, Utc};
    use matchday_core::TransitionKind;
    use matchday_types::{
        FriendRequest, FriendshipStatus, FriendshipView, PublicUser, Side, UserDetail,
    };
    use tokio::sync::mpsc;

    struct Harness {
        api: MockApi,
        cache: QueryCache,
        sync: Arc<FriendshipSync<MockApi>>,
        notifications: mpsc::UnboundedReceiver<Notification>,
    }

    fn harness() -> Harness {
        let api = MockApi::new();
        let cache = QueryCache::new(Arc::new(api.clone()), CacheSettings::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = FriendshipSync::new(Arc::new(api.clone()), cache.clone(), Arc::new(tx));
        Harness {
            api,
            cache,
            sync: Arc::new(sync),
            notifications: rx,
        }
    }

    fn user(id: &str, username: &str) -> PublicUser {
        PublicUser {
            id: UserId::new(id),
            first_name: "Test".into(),
            last_name: username.into(),
            avatar: None,
            username: Username::new(username),
        }
    }

    fn detail(id: &str, username: &str, friendship: Option<FriendshipView>) -> UserDetail {
        UserDetail {
            user: user(id, username),
            points: 0,
            bio: None,
            friendship,
        }
    }

    fn request(id: &str, from: &str) -> FriendRequest {
        FriendRequest {
            id: FriendshipId::new(id),
            status: FriendshipStatus::Pending,
            requester: user(&format!("u-{from}"), from),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn view(id: &str, status: FriendshipStatus, side: Side) -> Option<FriendshipView> {
        Some(FriendshipView::new(Some(FriendshipId::new(id)), status, side))
    }

    fn name(username: &str) -> Username {
        Username::new(username)
    }

    fn detail_key(username: &str) -> CacheKey {
        CacheKey::user_detail(&name(username))
    }

    fn cached_view(cache: &QueryCache, username: &str) -> Option<FriendshipView> {
        cache
            .get(&detail_key(username))
            .and_then(|v| v.as_user_detail().cloned())
            .and_then(|d| d.friendship)
    }

    fn cached_request_ids(cache: &QueryCache) -> Vec<String> {
        cache
            .get(&CacheKey::FriendshipRequests)
            .and_then(|v| v.as_friendship_requests().map(|r| r.to_vec()))
            .unwrap_or_default()
            .iter()
            .map(|r| r.id.to_string())
            .collect()
    }

    // ===========================================
    // End-to-end Scenarios
    // ===========================================

    #[tokio::test]
    async fn send_on_empty_cache_ends_with_server_value() {
        let h = harness();
        let server = detail(
            "u123",
            "alice",
            view("f9", FriendshipStatus::Pending, Side::Requester),
        );
        h.api.put_user(server.clone());

        let outcome = h.sync.send(&name("alice"), &UserId::new("u123")).await;
        assert_eq!(outcome, TransitionOutcome::Committed);

        // Nothing was cached, so nothing was projected
        assert!(h.cache.get(&detail_key("alice")).is_none());
        assert!(h.cache.is_stale(&detail_key("alice")));

        let value = h.cache.fetch(&detail_key("alice")).await.unwrap();
        assert_eq!(value, CacheValue::UserDetail(server));
        assert_eq!(
            h.api.dispatched(),
            vec![Transition::Send {
                target: UserId::new("u123")
            }]
        );
    }

    #[tokio::test]
    async fn failed_cancel_restores_exact_snapshot() {
        let mut h = harness();
        let before = CacheValue::UserDetail(detail(
            "u2",
            "bob",
            view("f1", FriendshipStatus::Pending, Side::Requester),
        ));
        h.cache.set(&detail_key("bob"), before.clone());
        h.api
            .fail_next_dispatch(ApiError::Network("connection reset".into()));

        let outcome = h.sync.cancel(&name("bob"), &FriendshipId::new("f1")).await;

        assert!(matches!(outcome, TransitionOutcome::RolledBack { .. }));
        assert_eq!(h.cache.get(&detail_key("bob")), Some(before));
        assert!(h.cache.is_stale(&detail_key("bob")));

        let n = h.notifications.try_recv().unwrap();
        assert_eq!(n.transition, TransitionKind::Cancel);
        assert_eq!(n.message, "Could not cancel friend request: Something went wrong");
    }

    #[tokio::test]
    async fn accept_removes_request_before_server_answers() {
        let h = harness();
        h.cache.set(
            &CacheKey::FriendshipRequests,
            CacheValue::FriendshipRequests(vec![request("f1", "carol"), request("f2", "dave")]),
        );
        h.cache.set(
            &detail_key("carol"),
            CacheValue::UserDetail(detail(
                "u-carol",
                "carol",
                view("f1", FriendshipStatus::Pending, Side::Receiver),
            )),
        );
        let gate = h.api.hold_dispatches();

        let task = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.accept(&name("carol"), &FriendshipId::new("f1")).await }
        });
        gate.entered().await;

        // Optimistic window: request in flight, projection visible
        assert_eq!(cached_request_ids(&h.cache), vec!["f2"]);
        assert_eq!(
            cached_view(&h.cache, "carol"),
            view("f1", FriendshipStatus::Accepted, Side::Receiver)
        );

        gate.release();
        assert_eq!(task.await.unwrap(), TransitionOutcome::Committed);
    }

    #[tokio::test]
    async fn double_send_then_stale_cancel_converges_to_server() {
        let h = harness();
        h.cache.set(
            &detail_key("alice"),
            CacheValue::UserDetail(detail("u123", "alice", None)),
        );

        let alice = name("alice");
        let target = UserId::new("u123");
        let first = h.sync.send(&alice, &target);
        let second = h.sync.send(&alice, &target);
        let (a, b) = tokio::join!(first, second);
        assert!(a.is_committed() && b.is_committed());

        // Server truth after the user cancelled from another device
        let truth = detail(
            "u123",
            "alice",
            view("f5", FriendshipStatus::Canceled, Side::Requester),
        );
        h.api.put_user(truth.clone());

        let outcome = h.sync.cancel(&name("alice"), &FriendshipId::new("f-stale")).await;
        assert!(outcome.is_committed());
        assert_eq!(
            cached_view(&h.cache, "alice"),
            Some(FriendshipView::new(
                Some(FriendshipId::new("f-stale")),
                FriendshipStatus::Canceled,
                Side::Requester
            ))
        );

        h.cache.settle(&detail_key("alice")).await;
        assert_eq!(
            h.cache.get(&detail_key("alice")),
            Some(CacheValue::UserDetail(truth))
        );
    }

    // ===========================================
    // Projections per Transition
    // ===========================================

    #[tokio::test]
    async fn each_transition_projects_its_view() {
        let cases = vec![
            (
                Transition::Send {
                    target: UserId::new("u2"),
                },
                None,
                Some(FriendshipView::new(
                    None,
                    FriendshipStatus::Pending,
                    Side::Requester,
                )),
            ),
            (
                Transition::Cancel {
                    friendship: FriendshipId::new("f1"),
                },
                view("f1", FriendshipStatus::Pending, Side::Requester),
                view("f1", FriendshipStatus::Canceled, Side::Requester),
            ),
            (
                Transition::Reject {
                    friendship: FriendshipId::new("f1"),
                },
                view("f1", FriendshipStatus::Pending, Side::Receiver),
                view("f1", FriendshipStatus::Rejected, Side::Receiver),
            ),
            (
                Transition::Reject {
                    friendship: FriendshipId::new("f1"),
                },
                view("f1", FriendshipStatus::Accepted, Side::Requester),
                view("f1", FriendshipStatus::Rejected, Side::Receiver),
            ),
            (
                Transition::Accept {
                    friendship: FriendshipId::new("f1"),
                },
                view("f1", FriendshipStatus::Pending, Side::Receiver),
                view("f1", FriendshipStatus::Accepted, Side::Receiver),
            ),
        ];

        for (transition, before, expected) in cases {
            let h = harness();
            h.cache.set(
                &detail_key("bob"),
                CacheValue::UserDetail(detail("u2", "bob", before)),
            );
            let gate = h.api.hold_dispatches();

            let task = tokio::spawn({
                let sync = Arc::clone(&h.sync);
                let t = transition.clone();
                async move { sync.apply(&name("bob"), t).await }
            });
            gate.entered().await;
            assert_eq!(cached_view(&h.cache, "bob"), expected, "{:?}", transition);

            gate.release();
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn actioned_request_leaves_list_at_any_position() {
        for (kind, target) in [("cancel", "f1"), ("reject", "f2"), ("accept", "f3")] {
            let h = harness();
            h.cache.set(
                &CacheKey::FriendshipRequests,
                CacheValue::FriendshipRequests(vec![
                    request("f1", "a"),
                    request("f2", "b"),
                    request("f3", "c"),
                ]),
            );
            let gate = h.api.hold_dispatches();
            let id = FriendshipId::new(target);
            let transition = match kind {
                "cancel" => Transition::Cancel { friendship: id },
                "reject" => Transition::Reject { friendship: id },
                _ => Transition::Accept { friendship: id },
            };

            let task = tokio::spawn({
                let sync = Arc::clone(&h.sync);
                async move { sync.apply(&name("x"), transition).await }
            });
            gate.entered().await;

            let ids = cached_request_ids(&h.cache);
            assert_eq!(ids.len(), 2);
            assert!(!ids.contains(&target.to_string()));

            gate.release();
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn send_leaves_request_list_alone() {
        let h = harness();
        let list = CacheValue::FriendshipRequests(vec![request("f1", "a")]);
        h.cache.set(&CacheKey::FriendshipRequests, list.clone());
        let gate = h.api.hold_dispatches();

        let task = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.send(&name("z"), &UserId::new("u-z")).await }
        });
        gate.entered().await;
        assert_eq!(h.cache.get(&CacheKey::FriendshipRequests), Some(list));

        gate.release();
        task.await.unwrap();
    }

    // ===========================================
    // Rollback and Reconciliation
    // ===========================================

    #[tokio::test]
    async fn failed_accept_restores_both_slots() {
        let mut h = harness();
        let list = CacheValue::FriendshipRequests(vec![request("f1", "a"), request("f2", "b")]);
        let profile = CacheValue::UserDetail(detail(
            "u-a",
            "a",
            view("f1", FriendshipStatus::Pending, Side::Receiver),
        ));
        h.cache.set(&CacheKey::FriendshipRequests, list.clone());
        h.cache.set(&detail_key("a"), profile.clone());
        h.api.fail_next_dispatch(ApiError::Server {
            status: 409,
            message: Some("Request is no longer pending".into()),
        });

        let outcome = h.sync.accept(&name("a"), &FriendshipId::new("f1")).await;

        assert!(!outcome.is_committed());
        assert_eq!(h.cache.get(&CacheKey::FriendshipRequests), Some(list));
        assert_eq!(h.cache.get(&detail_key("a")), Some(profile));
        assert_eq!(
            h.notifications.try_recv().unwrap().message,
            "Could not accept friend request: Request is no longer pending"
        );
    }

    #[tokio::test]
    async fn failed_action_on_unloaded_slots_leaves_them_empty() {
        let h = harness();
        h.api.fail_next_dispatch(ApiError::Timeout);

        let outcome = h.sync.reject(&name("ghost"), &FriendshipId::new("f1")).await;

        assert!(!outcome.is_committed());
        assert!(h.cache.get(&detail_key("ghost")).is_none());
        assert!(h.cache.get(&CacheKey::FriendshipRequests).is_none());
        assert_eq!(h.api.fetch_count(), 0);
    }

    #[tokio::test]
    async fn success_refetches_loaded_slots() {
        let h = harness();
        h.cache.set(
            &detail_key("bob"),
            CacheValue::UserDetail(detail(
                "u2",
                "bob",
                view("f1", FriendshipStatus::Pending, Side::Receiver),
            )),
        );
        h.cache.set(
            &CacheKey::FriendshipRequests,
            CacheValue::FriendshipRequests(vec![request("f1", "bob")]),
        );
        let truth = detail(
            "u2",
            "bob",
            view("f1", FriendshipStatus::Accepted, Side::Receiver),
        );
        h.api.put_user(truth.clone());
        h.api.set_requests(vec![]);

        h.sync.accept(&name("bob"), &FriendshipId::new("f1")).await;
        assert!(h.cache.is_fetching(&detail_key("bob")));
        assert!(h.cache.is_fetching(&CacheKey::FriendshipRequests));

        h.cache.settle(&detail_key("bob")).await;
        h.cache.settle(&CacheKey::FriendshipRequests).await;

        assert_eq!(
            h.cache.get(&detail_key("bob")),
            Some(CacheValue::UserDetail(truth))
        );
        assert_eq!(
            h.cache.get(&CacheKey::FriendshipRequests),
            Some(CacheValue::FriendshipRequests(vec![]))
        );
    }

    #[tokio::test]
    async fn in_flight_load_cannot_clobber_projection() {
        let h = harness();
        h.cache.set(
            &detail_key("bob"),
            CacheValue::UserDetail(detail(
                "u2",
                "bob",
                view("f1", FriendshipStatus::Pending, Side::Receiver),
            )),
        );
        // Server still reports the old state while the background load runs
        h.api.put_user(detail(
            "u2",
            "bob",
            view("f1", FriendshipStatus::Pending, Side::Receiver),
        ));
        let fetch_gate = h.api.hold_fetches();
        h.cache.refetch(&detail_key("bob"));
        fetch_gate.entered().await;

        let dispatch_gate = h.api.hold_dispatches();
        let task = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.accept(&name("bob"), &FriendshipId::new("f1")).await }
        });
        dispatch_gate.entered().await;

        // The stale load was cancelled; releasing it changes nothing
        fetch_gate.release();
        tokio::task::yield_now().await;
        assert_eq!(
            cached_view(&h.cache, "bob"),
            view("f1", FriendshipStatus::Accepted, Side::Receiver)
        );

        dispatch_gate.release();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn refetch_started_during_dispatch_is_superseded_on_commit() {
        let h = harness();
        let before = detail("u123", "alice", None);
        let committed = detail(
            "u123",
            "alice",
            view("f9", FriendshipStatus::Pending, Side::Requester),
        );
        h.cache
            .set(&detail_key("alice"), CacheValue::UserDetail(before.clone()));
        h.api.put_user(before);

        let dispatch_gate = h.api.hold_dispatches();
        let task = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.send(&name("alice"), &UserId::new("u123")).await }
        });
        dispatch_gate.entered().await;

        // A background reload answers with the pre-commit profile
        let fetch_gate = h.api.hold_fetches();
        h.cache.refetch(&detail_key("alice"));
        fetch_gate.entered().await;

        h.api.put_user(committed.clone());
        dispatch_gate.release();
        assert!(task.await.unwrap().is_committed());

        fetch_gate.release();
        h.cache.settle(&detail_key("alice")).await;

        assert_eq!(
            h.cache.get(&detail_key("alice")),
            Some(CacheValue::UserDetail(committed))
        );
        assert!(!h.cache.is_stale(&detail_key("alice")));
        assert_eq!(h.api.fetch_count(), 2);
    }

    #[tokio::test]
    async fn first_load_started_during_dispatch_returns_committed_state() {
        let h = harness();
        let committed = detail(
            "u123",
            "alice",
            view("f9", FriendshipStatus::Pending, Side::Requester),
        );
        h.api.put_user(detail("u123", "alice", None));

        let dispatch_gate = h.api.hold_dispatches();
        let task = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.send(&name("alice"), &UserId::new("u123")).await }
        });
        dispatch_gate.entered().await;

        // Profile page mounts while the request is in flight
        let fetch_gate = h.api.hold_fetches();
        let reader = tokio::spawn({
            let cache = h.cache.clone();
            async move { cache.fetch(&detail_key("alice")).await }
        });
        fetch_gate.entered().await;

        h.api.put_user(committed.clone());
        dispatch_gate.release();
        assert!(task.await.unwrap().is_committed());
        fetch_gate.release();

        let value = reader.await.unwrap().unwrap();
        assert_eq!(value, CacheValue::UserDetail(committed.clone()));
        assert_eq!(
            h.cache.get(&detail_key("alice")),
            Some(CacheValue::UserDetail(committed))
        );
        assert!(!h.cache.is_stale(&detail_key("alice")));
        assert_eq!(h.api.fetch_count(), 2);
    }

    #[tokio::test]
    async fn repeated_projection_is_stable() {
        let h = harness();
        h.cache.set(
            &detail_key("bob"),
            CacheValue::UserDetail(detail(
                "u2",
                "bob",
                view("f1", FriendshipStatus::Pending, Side::Receiver),
            )),
        );
        let gate = h.api.hold_dispatches();

        let first = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.accept(&name("bob"), &FriendshipId::new("f1")).await }
        });
        gate.entered().await;
        let once = h.cache.get(&detail_key("bob"));

        let second = tokio::spawn({
            let sync = Arc::clone(&h.sync);
            async move { sync.accept(&name("bob"), &FriendshipId::new("f1")).await }
        });
        gate.entered().await;
        assert_eq!(h.cache.get(&detail_key("bob")), once);

        gate.release();
        gate.release();
        first.await.unwrap();
        second.await.unwrap();
    }

    // ===========================================
    // Offered Actions
    // ===========================================

    #[tokio::test]
    async fn perform_uses_cached_friendship_id() {
        let h = harness();
        h.cache.set(
            &detail_key("bob"),
            CacheValue::UserDetail(detail(
                "u2",
                "bob",
                view("f42", FriendshipStatus::Accepted, Side::Requester),
            )),
        );

        let outcome = h
            .sync
            .perform(&name("bob"), &UserId::new("u2"), FriendAction::Unfriend)
            .await
            .unwrap();

        assert!(outcome.is_committed());
        assert_eq!(
            h.api.dispatched(),
            vec![Transition::Reject {
                friendship: FriendshipId::new("f42")
            }]
        );
    }

    #[tokio::test]
    async fn perform_refuses_unavailable_action() {
        let h = harness();
        h.cache.set(
            &detail_key("bob"),
            CacheValue::UserDetail(detail(
                "u2",
                "bob",
                view("f1", FriendshipStatus::Blocked, Side::Receiver),
            )),
        );

        let result = h
            .sync
            .perform(&name("bob"), &UserId::new("u2"), FriendAction::SendRequest)
            .await;

        assert!(matches!(result, Err(ActionError::NotAvailable { .. })));
        assert!(h.api.dispatched().is_empty());
    }
}
