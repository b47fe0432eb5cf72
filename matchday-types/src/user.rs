//! User profile types.

use serde::{Deserialize, Serialize};

use crate::{Friendship, FriendshipView, UserId, Username};

/// Public identity of a member, embedded in lists and profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Member id.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar URL, if uploaded.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Public handle.
    pub username: Username,
}

impl PublicUser {
    /// "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Profile as returned by `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Public identity.
    #[serde(flatten)]
    pub user: PublicUser,
    /// Community score.
    #[serde(default)]
    pub points: u32,
    /// Free-form biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Relationship between the viewer and this member, if any.
    #[serde(default)]
    pub friendship: Option<Friendship>,
}

/// Profile as held in the `userDetail(username)` cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    /// Public identity.
    #[serde(flatten)]
    pub user: PublicUser,
    /// Community score.
    pub points: u32,
    /// Free-form biography.
    pub bio: Option<String>,
    /// The viewer's relationship to this member.
    pub friendship: Option<FriendshipView>,
}

impl UserDetail {
    /// Build the cached shape from a server profile, deriving the
    /// viewer-relative side of the embedded relationship.
    pub fn from_profile(profile: UserProfile, viewer: &UserId) -> Self {
        let friendship = profile
            .friendship
            .as_ref()
            .and_then(|f| FriendshipView::from_entity(f, viewer));
        Self {
            user: profile.user,
            points: profile.points,
            bio: profile.bio,
            friendship,
        }
    }

    /// Same profile with the relationship replaced.
    pub fn with_friendship(&self, friendship: Option<FriendshipView>) -> Self {
        Self {
            friendship,
            ..self.clone()
        }
    }
}
