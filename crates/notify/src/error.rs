// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised while delivering a notification.
///
/// Delivery errors never propagate past the dispatcher; they are logged and
/// reported as a [`crate::DeliveryOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("delivery task failed: {0}")]
    Task(String),
    #[error("timed out after {0} ms")]
    TimedOut(u128),
}
