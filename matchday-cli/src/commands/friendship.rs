//! Act on a friendship: send, cancel, accept, reject, unfriend.

use anyhow::{bail, Result};
use matchday_client::{FriendshipApi, TransitionOutcome};
use matchday_core::{available_actions, ActionError, FriendAction};

use super::{parse_username, Session};

/// Run one friendship action against `username`.
pub async fn run<A: FriendshipApi + 'static>(
    session: &Session<A>,
    username: &str,
    action: FriendAction,
) -> Result<()> {
    let username = parse_username(username)?;

    // The friendship id comes from the profile, so it must be loaded first
    let detail = session.load_profile(&username).await?;

    let outcome = match session
        .sync
        .perform(&username, &detail.user.id, action)
        .await
    {
        Ok(outcome) => outcome,
        Err(ActionError::NotAvailable { .. }) => {
            let offered: Vec<&str> = available_actions(detail.friendship.as_ref())
                .iter()
                .map(|a| a.label())
                .collect();
            if offered.is_empty() {
                bail!("{} is not possible for @{}", action.label(), username);
            }
            bail!(
                "{} is not possible for @{}; available: {}",
                action.label(),
                username,
                offered.join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        TransitionOutcome::Committed => {
            println!("{}: @{} done.", action.label(), username);
            Ok(())
        }
        TransitionOutcome::RolledBack { error } => {
            bail!("{} for @{} failed: {}", action.label(), username, error)
        }
    }
}
