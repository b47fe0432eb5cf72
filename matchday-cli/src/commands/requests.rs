//! List pending friend requests.

use anyhow::{Context, Result};
use matchday_client::FriendshipApi;
use matchday_types::CacheKey;

use super::Session;

/// Run the requests command.
pub async fn run<A: FriendshipApi + 'static>(session: &Session<A>) -> Result<()> {
    let value = session
        .cache
        .fetch(&CacheKey::FriendshipRequests)
        .await
        .context("Failed to load friend requests")?;
    let requests = value.as_friendship_requests().unwrap_or_default();

    println!("=== Friend requests for {} ===", session.viewer);
    println!();
    if requests.is_empty() {
        println!("No pending requests.");
        return Ok(());
    }

    for request in requests {
        println!(
            "  @{:<16} {:<24} {}",
            request.requester.username.as_str(),
            request.requester.display_name(),
            request.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("Answer with 'matchday accept <username>' or 'matchday reject <username>'.");

    Ok(())
}
