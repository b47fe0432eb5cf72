//! Demo data for `--mock`.

use chrono::{TimeZone, Utc};
use matchday_client::MockApi;
use matchday_types::{
    FriendRequest, FriendshipId, FriendshipStatus, FriendshipView, PublicUser, Side, UserDetail,
    UserId, Username,
};

/// The signed-in user in mock mode.
pub const VIEWER_ID: &str = "u-me";

fn member(id: &str, username: &str, first: &str, last: &str) -> PublicUser {
    PublicUser {
        id: UserId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: None,
        username: Username::new(username),
    }
}

fn profile(user: PublicUser, points: u32, friendship: Option<FriendshipView>) -> UserDetail {
    UserDetail {
        user,
        points,
        bio: None,
        friendship,
    }
}

fn view(id: &str, status: FriendshipStatus, side: Side) -> Option<FriendshipView> {
    Some(FriendshipView::new(Some(FriendshipId::new(id)), status, side))
}

/// A mock API with one member in every relationship state.
pub fn demo_api() -> MockApi {
    let api = MockApi::new();
    let carol = member("u-carol", "carol", "Carol", "Reyes");

    api.put_user(profile(member("u-alice", "alice", "Alice", "Moreau"), 120, None));
    api.put_user(profile(
        member("u-bob", "bob", "Bob", "Stone"),
        45,
        view("f-bob", FriendshipStatus::Pending, Side::Requester),
    ));
    api.put_user(profile(
        carol.clone(),
        310,
        view("f-carol", FriendshipStatus::Pending, Side::Receiver),
    ));
    api.put_user(profile(
        member("u-dave", "dave", "Dave", "Okafor"),
        78,
        view("f-dave", FriendshipStatus::Accepted, Side::Requester),
    ));
    api.put_user(profile(
        member("u-erin", "erin", "Erin", "Walsh"),
        5,
        view("f-erin", FriendshipStatus::Blocked, Side::Receiver),
    ));

    let sent_at = Utc
        .with_ymd_and_hms(2024, 9, 14, 18, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);
    api.set_requests(vec![FriendRequest {
        id: FriendshipId::new("f-carol"),
        status: FriendshipStatus::Pending,
        requester: carol,
        created_at: sent_at,
    }]);

    api
}
