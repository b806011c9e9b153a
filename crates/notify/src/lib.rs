// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Notification dispatch.
//!
//! State changes produce [`Notification`]s bundled with a [`DeliveryPolicy`].
//! The [`Dispatcher`] sends them through an injected [`Notifier`] after the
//! change is committed, so delivery can never affect durability.

mod dispatch;
mod error;
mod message;
mod policy;
mod render;
mod transport;

#[cfg(test)]
mod tests;

pub use dispatch::Dispatcher;
pub use error::NotifyError;
pub use message::{Notification, QuoteSummary, Recipient, Template};
pub use policy::{DeliveryOutcome, DeliveryPolicy, PendingDelivery};
pub use render::{Rendered, render};
pub use transport::{LogNotifier, MemoryNotifier, Notifier, SmtpConfig, SmtpNotifier};
