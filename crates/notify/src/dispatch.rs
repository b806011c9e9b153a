// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::NotifyError;
use crate::message::{Notification, Recipient};
use crate::policy::{DeliveryOutcome, DeliveryPolicy, PendingDelivery};
use crate::transport::Notifier;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Sends the notifications of committed state changes according to their
/// delivery policy.
///
/// Failures are logged with recipient, template, and cause, and returned as
/// a [`DeliveryOutcome`]. They never turn into errors for the caller.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    staff_email: String,
}

impl Dispatcher {
    /// Creates a new `Dispatcher`.
    ///
    /// # Arguments
    ///
    /// * `notifier` - The transport to deliver through
    /// * `staff_email` - Where staff alerts are sent
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, staff_email: String) -> Self {
        Self {
            notifier,
            staff_email,
        }
    }

    /// Delivers a pending delivery according to its policy.
    pub async fn deliver(&self, pending: PendingDelivery) -> DeliveryOutcome {
        if pending.is_empty() {
            return DeliveryOutcome::NotAttempted;
        }

        let notifications: Vec<Notification> = pending
            .notifications
            .into_iter()
            .map(|notification| self.resolve(notification))
            .collect();

        match pending.policy {
            DeliveryPolicy::DurableOnly => DeliveryOutcome::NotAttempted,
            DeliveryPolicy::FireAndForget => {
                for notification in notifications {
                    let notifier: Arc<dyn Notifier> = Arc::clone(&self.notifier);
                    tokio::spawn(async move {
                        let _ = send_logged(notifier.as_ref(), &notification).await;
                    });
                }
                DeliveryOutcome::Dispatched
            }
            DeliveryPolicy::AwaitedBestEffort { timeout } => {
                self.deliver_awaited(notifications, timeout).await
            }
        }
    }

    async fn deliver_awaited(
        &self,
        notifications: Vec<Notification>,
        timeout: Duration,
    ) -> DeliveryOutcome {
        let notifier: &dyn Notifier = self.notifier.as_ref();
        let send_all = async {
            for notification in &notifications {
                send_logged(notifier, notification).await?;
            }
            Ok::<(), NotifyError>(())
        };

        match tokio::time::timeout(timeout, send_all).await {
            Ok(Ok(())) => DeliveryOutcome::Delivered,
            Ok(Err(e)) => DeliveryOutcome::Failed {
                error: e.to_string(),
            },
            Err(_) => {
                let e: NotifyError = NotifyError::TimedOut(timeout.as_millis());
                for notification in &notifications {
                    error!(
                        recipient = %notification.recipient,
                        template = notification.template.kind(),
                        error = %e,
                        "Notification delivery did not finish in time"
                    );
                }
                DeliveryOutcome::TimedOut {
                    error: e.to_string(),
                }
            }
        }
    }

    fn resolve(&self, notification: Notification) -> Notification {
        match notification.recipient {
            Recipient::Staff => Notification::new(
                Recipient::Person {
                    email: self.staff_email.clone(),
                    name: Some(String::from("PlanMorph Team")),
                },
                notification.template,
            ),
            Recipient::Person { .. } => notification,
        }
    }
}

async fn send_logged(notifier: &dyn Notifier, notification: &Notification) -> Result<(), NotifyError> {
    match notifier.send(notification).await {
        Ok(()) => {
            debug!(
                recipient = %notification.recipient,
                template = notification.template.kind(),
                "Notification delivered"
            );
            Ok(())
        }
        Err(e) => {
            error!(
                recipient = %notification.recipient,
                template = notification.template.kind(),
                error = %e,
                "Notification delivery failed"
            );
            Err(e)
        }
    }
}
