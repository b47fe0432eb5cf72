//! Friendship entity and its viewer-relative projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FriendshipId, PublicUser, UserId};

/// Relationship status as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// Request sent, waiting for the receiver.
    Pending,
    /// Both parties are friends.
    Accepted,
    /// Receiver declined, or either party ended the friendship.
    Rejected,
    /// Requester withdrew the request.
    Canceled,
    /// Blocked. No client transition exists for this status.
    Blocked,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl FriendshipStatus {
    /// Terminal statuses behave as if no relationship existed.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled)
    }
}

/// Which role the viewing user plays in a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The viewer initiated the current proposal.
    Requester,
    /// The viewer received the current proposal.
    Receiver,
}

/// Friendship entity as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    /// Entity identifier.
    pub id: FriendshipId,
    /// Current status.
    pub status: FriendshipStatus,
    /// Party that initiated the current proposal.
    pub requester_id: UserId,
    /// Party that received the current proposal.
    pub receiver_id: UserId,
    /// Relationship score, accumulated elsewhere.
    #[serde(default)]
    pub points: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// The viewer's role in this relationship, if the viewer is a participant.
    pub fn side_for(&self, viewer: &UserId) -> Option<Side> {
        if &self.requester_id == viewer {
            Some(Side::Requester)
        } else if &self.receiver_id == viewer {
            Some(Side::Receiver)
        } else {
            None
        }
    }
}

/// "My relationship to user X", as cached and displayed.
///
/// No relationship at all is represented by `Option::<FriendshipView>::None`,
/// so `side` always has a meaning when a view exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipView {
    /// Entity id. Unknown for a request that was only sent optimistically.
    pub id: Option<FriendshipId>,
    /// Relationship status.
    pub status: FriendshipStatus,
    /// Viewer's role.
    pub side: Side,
}

impl FriendshipView {
    /// Create a view.
    pub fn new(id: Option<FriendshipId>, status: FriendshipStatus, side: Side) -> Self {
        Self { id, status, side }
    }

    /// Derive the view of `friendship` as seen by `viewer`.
    ///
    /// Returns `None` when the viewer is not a participant.
    pub fn from_entity(friendship: &Friendship, viewer: &UserId) -> Option<Self> {
        let side = friendship.side_for(viewer)?;
        Some(Self {
            id: Some(friendship.id.clone()),
            status: friendship.status,
            side,
        })
    }
}

/// One pending incoming request, as listed by `GET /friendships/requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Friendship entity id.
    pub id: FriendshipId,
    /// Status (normally pending).
    pub status: FriendshipStatus,
    /// Public identity of the user who sent the request.
    pub requester: PublicUser,
    /// When the request was sent.
    pub created_at: DateTime<Utc>,
}
