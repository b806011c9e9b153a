// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery transports.

use crate::error::NotifyError;
use crate::message::{Notification, Recipient};
use crate::render::{Rendered, render};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

/// Something that can deliver a notification.
///
/// The dispatcher resolves [`Recipient::Staff`] to a concrete address before
/// calling `send`, so implementations only ever see [`Recipient::Person`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub portal_url: String,
}

/// Delivers notifications over SMTP.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    portal_url: String,
}

impl SmtpNotifier {
    /// Creates an SMTP notifier.
    ///
    /// With credentials the connection uses TLS; without them it is a plain
    /// relay (local development servers).
    ///
    /// # Errors
    ///
    /// Returns an error if the sender address is invalid or the relay cannot
    /// be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
                address: config.from.clone(),
                reason: e.to_string(),
            })?;

        let transport: SmtpTransport = match (&config.username, &config.password) {
            (Some(username), Some(password)) => SmtpTransport::relay(&config.host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
                .port(config.port)
                .credentials(Credentials::new(username.clone(), password.clone()))
                .timeout(Some(Duration::from_secs(30)))
                .build(),
            _ => SmtpTransport::builder_dangerous(&config.host)
                .port(config.port)
                .timeout(Some(Duration::from_secs(30)))
                .build(),
        };

        Ok(Self {
            transport,
            from,
            portal_url: config.portal_url.clone(),
        })
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        let Recipient::Person { email, name } = &notification.recipient else {
            return Err(NotifyError::InvalidAddress {
                address: notification.recipient.to_string(),
                reason: String::from("unresolved staff recipient"),
            });
        };
        let address: Address = email.parse().map_err(|e: lettre::address::AddressError| {
            NotifyError::InvalidAddress {
                address: email.clone(),
                reason: e.to_string(),
            }
        })?;

        let rendered: Rendered = render(notification, &self.portal_url);
        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(name.clone(), address))
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body)
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message: Message = self.build_message(notification)?;
        let transport: SmtpTransport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| NotifyError::Task(e.to_string()))?
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them.
///
/// Used when no SMTP relay is configured.
pub struct LogNotifier {
    portal_url: String,
}

impl LogNotifier {
    /// Creates a log notifier.
    #[must_use]
    pub const fn new(portal_url: String) -> Self {
        Self { portal_url }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let rendered: Rendered = render(notification, &self.portal_url);
        info!(
            recipient = %notification.recipient,
            template = notification.template.kind(),
            subject = %rendered.subject,
            "Notification (log transport)\n{}",
            rendered.body
        );
        Ok(())
    }
}

/// Records notifications in memory.
///
/// Can be told to fail or to stall, to exercise the dispatcher's failure
/// and timeout handling.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    failure: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MemoryNotifier {
    /// Creates an empty recorder that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason.to_string());
    }

    /// Makes every subsequent send wait `delay` before completing.
    pub fn stall_for(&self, delay: Duration) {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    /// Returns everything sent so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the template kinds sent so far, in order.
    #[must_use]
    pub fn sent_kinds(&self) -> Vec<&'static str> {
        self.sent()
            .iter()
            .map(|notification| notification.template.kind())
            .collect()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let delay: Option<Duration> = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure: Option<String> = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(reason) = failure {
            return Err(NotifyError::Transport(reason));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
