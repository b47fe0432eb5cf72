//! Friendship relationship state machine.
//!
//! This module is a pure projection of `(status, side)` onto the actions a
//! viewer may take, and of each transition onto the view it predicts. It
//! never fails and never performs I/O; `matchday-client` applies the
//! predicted views to the cache and talks to the API.
//!
//! Unfriending reuses the reject transition. There is no separate
//! "unfriended" status.

use matchday_types::{FriendshipId, FriendshipStatus, FriendshipView, Side, UserId};
use std::fmt;
use thiserror::Error;

/// Actions a viewer can be offered for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FriendAction {
    /// No open relationship: propose one.
    SendRequest,
    /// Viewer sent a pending request: withdraw it.
    CancelRequest,
    /// Viewer received a pending request: confirm it.
    AcceptRequest,
    /// Viewer received a pending request: decline it.
    RejectRequest,
    /// Viewers are friends: end it (a reject under the hood).
    Unfriend,
}

impl FriendAction {
    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SendRequest => "Send request",
            Self::CancelRequest => "Cancel request",
            Self::AcceptRequest => "Accept request",
            Self::RejectRequest => "Reject request",
            Self::Unfriend => "Unfriend",
        }
    }

    /// Build the transition this action triggers.
    ///
    /// `target` is the member whose profile is shown; `view` is the viewer's
    /// current relationship to them.
    pub fn transition(
        self,
        target: &UserId,
        view: Option<&FriendshipView>,
    ) -> Result<Transition, ActionError> {
        if !available_actions(view).contains(&self) {
            return Err(ActionError::NotAvailable {
                action: self,
                status: view.map(|v| v.status),
            });
        }
        let friendship = || {
            view.and_then(|v| v.id.clone())
                .ok_or(ActionError::MissingFriendshipId { action: self })
        };
        Ok(match self {
            Self::SendRequest => Transition::Send {
                target: target.clone(),
            },
            Self::CancelRequest => Transition::Cancel {
                friendship: friendship()?,
            },
            Self::AcceptRequest => Transition::Accept {
                friendship: friendship()?,
            },
            Self::RejectRequest | Self::Unfriend => Transition::Reject {
                friendship: friendship()?,
            },
        })
    }
}

impl fmt::Display for FriendAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors turning an offered action into a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action is not offered for the current relationship.
    #[error("{action} is not available (status: {status:?})")]
    NotAvailable {
        /// Requested action.
        action: FriendAction,
        /// Current status, `None` when no relationship exists.
        status: Option<FriendshipStatus>,
    },

    /// The relationship id is not known yet, e.g. right after an optimistic send.
    #[error("{action} needs a friendship id that is not known yet")]
    MissingFriendshipId {
        /// Requested action.
        action: FriendAction,
    },
}

/// Actions offered for the viewer's relationship `view`.
///
/// Blocked and unrecognised statuses offer nothing.
pub fn available_actions(view: Option<&FriendshipView>) -> Vec<FriendAction> {
    let Some(view) = view else {
        return vec![FriendAction::SendRequest];
    };
    match (view.status, view.side) {
        (FriendshipStatus::Pending, Side::Requester) => vec![FriendAction::CancelRequest],
        (FriendshipStatus::Pending, Side::Receiver) => {
            vec![FriendAction::AcceptRequest, FriendAction::RejectRequest]
        }
        (FriendshipStatus::Accepted, _) => vec![FriendAction::Unfriend],
        (FriendshipStatus::Canceled | FriendshipStatus::Rejected, _) => {
            vec![FriendAction::SendRequest]
        }
        (FriendshipStatus::Blocked | FriendshipStatus::Unknown, _) => vec![],
    }
}

/// The four client-triggerable transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Create a pending request.
    Send,
    /// Requester withdraws a pending request.
    Cancel,
    /// Receiver declines, or either party unfriends.
    Reject,
    /// Receiver confirms.
    Accept,
}

impl TransitionKind {
    /// Imperative verb used in user-facing messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Cancel => "cancel",
            Self::Reject => "reject",
            Self::Accept => "accept",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A transition request, addressed the way the API addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Keyed by the target member.
    Send {
        /// Member receiving the request.
        target: UserId,
    },
    /// Keyed by friendship id.
    Cancel {
        /// Relationship to act on.
        friendship: FriendshipId,
    },
    /// Keyed by friendship id.
    Reject {
        /// Relationship to act on.
        friendship: FriendshipId,
    },
    /// Keyed by friendship id.
    Accept {
        /// Relationship to act on.
        friendship: FriendshipId,
    },
}

impl Transition {
    /// Which transition this is.
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Send { .. } => TransitionKind::Send,
            Self::Cancel { .. } => TransitionKind::Cancel,
            Self::Reject { .. } => TransitionKind::Reject,
            Self::Accept { .. } => TransitionKind::Accept,
        }
    }

    /// Friendship id the transition is keyed by, if any.
    pub fn friendship_id(&self) -> Option<&FriendshipId> {
        match self {
            Self::Send { .. } => None,
            Self::Cancel { friendship }
            | Self::Reject { friendship }
            | Self::Accept { friendship } => Some(friendship),
        }
    }

    /// Pending request that leaves the incoming list once this is actioned.
    pub fn actioned_request(&self) -> Option<&FriendshipId> {
        self.friendship_id()
    }

    /// The view this transition predicts for the viewer.
    ///
    /// Independent of the pre-state: the prediction is a placeholder that the
    /// next authoritative fetch replaces.
    pub fn projected_view(&self) -> FriendshipView {
        match self {
            Self::Send { .. } => {
                FriendshipView::new(None, FriendshipStatus::Pending, Side::Requester)
            }
            Self::Cancel { friendship } => FriendshipView::new(
                Some(friendship.clone()),
                FriendshipStatus::Canceled,
                Side::Requester,
            ),
            Self::Reject { friendship } => FriendshipView::new(
                Some(friendship.clone()),
                FriendshipStatus::Rejected,
                Side::Receiver,
            ),
            Self::Accept { friendship } => FriendshipView::new(
                Some(friendship.clone()),
                FriendshipStatus::Accepted,
                Side::Receiver,
            ),
        }
    }

    /// Whether the transition is legal from `view`.
    ///
    /// Id-keyed transitions also require the cached view to carry the same id.
    pub fn is_allowed_from(&self, view: Option<&FriendshipView>) -> bool {
        let same_id = |v: &FriendshipView| v.id.as_ref() == self.friendship_id();
        match (self, view) {
            (Self::Send { .. }, None) => true,
            (Self::Send { .. }, Some(v)) => v.status.is_closed(),
            (_, None) => false,
            (Self::Cancel { .. }, Some(v)) => {
                same_id(v) && v.status == FriendshipStatus::Pending && v.side == Side::Requester
            }
            (Self::Accept { .. }, Some(v)) => {
                same_id(v) && v.status == FriendshipStatus::Pending && v.side == Side::Receiver
            }
            (Self::Reject { .. }, Some(v)) => {
                same_id(v)
                    && match v.status {
                        FriendshipStatus::Pending => v.side == Side::Receiver,
                        FriendshipStatus::Accepted => true,
                        _ => false,
                    }
            }
        }
    }
}
