//! Optimistic projections over cached values.
//!
//! Each function takes the current contents of a cache slot and returns the
//! value to write, or `None` to leave the slot untouched. A slot that was
//! never loaded (or holds a value of the wrong kind) is never written:
//! there is nothing to project onto, and the next fetch fills it anyway.
//!
//! All projections are idempotent.

use matchday_types::{CacheValue, FriendRequest, FriendshipId, FriendshipView};

/// Replace the relationship embedded in a `userDetail` slot.
pub fn project_user_detail(
    current: Option<&CacheValue>,
    view: &FriendshipView,
) -> Option<CacheValue> {
    let detail = current?.as_user_detail()?;
    Some(CacheValue::UserDetail(
        detail.with_friendship(Some(view.clone())),
    ))
}

/// Drop the actioned request from the `friendshipRequests` slot.
pub fn remove_request(current: Option<&CacheValue>, id: &FriendshipId) -> Option<CacheValue> {
    let requests = current?.as_friendship_requests()?;
    Some(CacheValue::FriendshipRequests(without_request(requests, id)))
}

/// Requests other than `id`, order preserved.
pub fn without_request(requests: &[FriendRequest], id: &FriendshipId) -> Vec<FriendRequest> {
    requests.iter().filter(|r| &r.id != id).cloned().collect()
}
