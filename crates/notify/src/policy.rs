// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::message::Notification;
use serde::Serialize;
use std::time::Duration;

/// How the caller waits for the notifications a transition produces.
///
/// A state change is durable before any of its notifications are sent;
/// the policy only decides whether the response waits for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Nothing is sent.
    DurableOnly,
    /// Wait for delivery, but give up after `timeout` and report the outcome.
    AwaitedBestEffort { timeout: Duration },
    /// Send in the background; the response never waits.
    FireAndForget,
}

/// The notifications produced by a committed state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub policy: DeliveryPolicy,
    pub notifications: Vec<Notification>,
}

impl PendingDelivery {
    /// Creates a new `PendingDelivery`.
    #[must_use]
    pub const fn new(policy: DeliveryPolicy, notifications: Vec<Notification>) -> Self {
        Self {
            policy,
            notifications,
        }
    }

    /// A delivery that sends nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(DeliveryPolicy::DurableOnly, Vec::new())
    }

    /// Returns true if nothing will be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() || self.policy == DeliveryPolicy::DurableOnly
    }
}

/// What happened to a pending delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The policy did not call for delivery, or there was nothing to send.
    NotAttempted,
    /// Handed to a background task; the result is only logged.
    Dispatched,
    /// Every notification was accepted by the transport.
    Delivered,
    /// A notification failed.
    Failed { error: String },
    /// The wait bound elapsed before delivery finished.
    TimedOut { error: String },
}

impl DeliveryOutcome {
    /// Returns true if delivery is known to have succeeded.
    #[must_use]
    pub const fn delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Returns the failure description, if delivery failed or timed out.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } | Self::TimedOut { error } => Some(error),
            Self::NotAttempted | Self::Dispatched | Self::Delivered => None,
        }
    }
}
