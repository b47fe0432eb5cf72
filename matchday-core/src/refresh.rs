//! Pull-to-refresh gesture state machine.
//!
//! Pure, side-effect-free handling of touch events on a scrollable feed.
//! The state machine takes an event and produces a new state plus a list of
//! actions; the caller moves the indicator and runs the refresh.

/// Gesture tuning, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshConfig {
    /// Indicator distance at which releasing triggers a refresh.
    pub threshold: f32,
    /// Indicator never moves further than this.
    pub max_distance: f32,
    /// Finger travel is multiplied by this before moving the indicator.
    pub resistance: f32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            max_distance: 120.0,
            resistance: 0.5,
        }
    }
}

/// Gesture state - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RefreshState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Finger down at the top of the list, below the threshold.
    Pulling {
        /// Current indicator distance.
        distance: f32,
    },
    /// Pulled past the threshold; releasing refreshes.
    Armed {
        /// Current indicator distance.
        distance: f32,
    },
    /// Refresh running; touches are ignored until it finishes.
    Refreshing,
}

/// Touch and lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshEvent {
    /// Finger down.
    TouchStart {
        /// Whether the scroll container is scrolled to the very top.
        at_top: bool,
    },
    /// Finger moved; positive is downwards.
    TouchMove {
        /// Vertical travel since the previous event.
        delta: f32,
    },
    /// Finger lifted.
    TouchEnd,
    /// The refresh started by [`RefreshAction::Refresh`] completed.
    RefreshFinished,
}

/// Instructions for the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshAction {
    /// Move the indicator to `distance`.
    MoveIndicator {
        /// Target distance.
        distance: f32,
    },
    /// Start refreshing the feed.
    Refresh,
    /// Animate the indicator back to rest.
    SnapBack,
}

impl RefreshState {
    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(
        self,
        event: RefreshEvent,
        config: &RefreshConfig,
    ) -> (Self, Vec<RefreshAction>) {
        match (self, event) {
            (Self::Idle, RefreshEvent::TouchStart { at_top: true }) => {
                (Self::Pulling { distance: 0.0 }, vec![])
            }

            (
                Self::Pulling { distance } | Self::Armed { distance },
                RefreshEvent::TouchMove { delta },
            ) => {
                let distance =
                    (distance + delta * config.resistance).clamp(0.0, config.max_distance);
                let state = if distance >= config.threshold {
                    Self::Armed { distance }
                } else {
                    Self::Pulling { distance }
                };
                (state, vec![RefreshAction::MoveIndicator { distance }])
            }

            (Self::Pulling { .. }, RefreshEvent::TouchEnd) => {
                (Self::Idle, vec![RefreshAction::SnapBack])
            }
            (Self::Armed { .. }, RefreshEvent::TouchEnd) => (
                Self::Refreshing,
                vec![
                    RefreshAction::MoveIndicator {
                        distance: config.threshold,
                    },
                    RefreshAction::Refresh,
                ],
            ),

            (Self::Refreshing, RefreshEvent::RefreshFinished) => {
                (Self::Idle, vec![RefreshAction::SnapBack])
            }

            // Everything else leaves the gesture unchanged
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a refresh is running.
    pub fn is_refreshing(&self) -> bool {
        matches!(self, Self::Refreshing)
    }
}
