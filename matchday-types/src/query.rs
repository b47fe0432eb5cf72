//! Cache slot addressing.
//!
//! Each cached piece of server data lives in a slot addressed by a
//! composite [`CacheKey`]. The value stored in a slot is a [`CacheValue`].

use std::fmt;

use crate::{FriendRequest, UserDetail, Username};

/// Composite key of a cache slot.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Profile page of a member, including the viewer's relationship to them.
    UserDetail(Username),
    /// Pending incoming friend requests of the viewer.
    FriendshipRequests,
}

impl CacheKey {
    /// Key of the `userDetail(username)` slot.
    pub fn user_detail(username: &Username) -> Self {
        Self::UserDetail(username.clone())
    }

    /// Path segments of the key, most general first.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::UserDetail(username) => vec!["users", "detail", username.as_str()],
            Self::FriendshipRequests => vec!["friendships", "requests"],
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments().join(", "))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey{}", self)
    }
}

/// Value held by a cache slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// Contents of a `userDetail(username)` slot.
    UserDetail(UserDetail),
    /// Contents of the `friendshipRequests()` slot, in server order.
    FriendshipRequests(Vec<FriendRequest>),
}

impl CacheValue {
    /// Borrow as a profile, if this is one.
    pub fn as_user_detail(&self) -> Option<&UserDetail> {
        match self {
            Self::UserDetail(detail) => Some(detail),
            _ => None,
        }
    }

    /// Borrow as the pending request list, if this is one.
    pub fn as_friendship_requests(&self) -> Option<&[FriendRequest]> {
        match self {
            Self::FriendshipRequests(requests) => Some(requests),
            _ => None,
        }
    }

    /// Whether this value belongs in the slot addressed by `key`.
    pub fn fits(&self, key: &CacheKey) -> bool {
        matches!(
            (self, key),
            (Self::UserDetail(_), CacheKey::UserDetail(_))
                | (Self::FriendshipRequests(_), CacheKey::FriendshipRequests)
        )
    }
}
