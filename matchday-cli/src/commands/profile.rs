//! Show a member's profile.

use anyhow::Result;
use matchday_client::FriendshipApi;
use matchday_core::available_actions;
use matchday_types::{FriendshipStatus, FriendshipView, Side};

use super::{parse_username, Session};

/// Run the profile command.
pub async fn run<A: FriendshipApi + 'static>(session: &Session<A>, username: &str) -> Result<()> {
    let username = parse_username(username)?;
    let detail = session.load_profile(&username).await?;

    println!("=== @{} ===", detail.user.username);
    println!();
    println!("Name:   {}", detail.user.display_name());
    println!("Points: {}", detail.points);
    if let Some(bio) = &detail.bio {
        println!("Bio:    {}", bio);
    }
    println!();
    println!("Friendship: {}", describe(detail.friendship.as_ref()));

    let actions = available_actions(detail.friendship.as_ref());
    if actions.is_empty() {
        println!("Actions:    none");
    } else {
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        println!("Actions:    {}", labels.join(", "));
    }

    Ok(())
}

/// One-line summary of the viewer's relationship.
fn describe(view: Option<&FriendshipView>) -> &'static str {
    let Some(view) = view else {
        return "none";
    };
    match (view.status, view.side) {
        (FriendshipStatus::Pending, Side::Requester) => "request sent, waiting for them",
        (FriendshipStatus::Pending, Side::Receiver) => "they sent you a request",
        (FriendshipStatus::Accepted, _) => "friends",
        (FriendshipStatus::Rejected, _) => "rejected",
        (FriendshipStatus::Canceled, _) => "cancelled",
        (FriendshipStatus::Blocked, _) => "blocked",
        (FriendshipStatus::Unknown, _) => "unknown",
    }
}
