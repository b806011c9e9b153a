// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and services.

use planmorph_audit::Actor;
use planmorph_domain::normalize_email;
use planmorph_notify::{DeliveryPolicy, Notification, PendingDelivery, Recipient, Template};
use planmorph_persistence::{AdminData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::error::AuthError;

/// Length of a session or reset token: 32 random bytes, hex encoded.
pub const TOKEN_LENGTH: usize = 64;

/// Tunables for the identity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthConfig {
    /// How long a login session lasts.
    pub session_ttl: Duration,
    /// How long a password reset token stays valid.
    pub reset_ttl: Duration,
    /// The bcrypt work factor for new password hashes.
    pub hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(24),
            reset_ttl: Duration::hours(1),
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// An admin whose bearer token has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    /// The admin account id.
    pub admin_id: i64,
    /// The admin's email.
    pub email: String,
    /// The admin's display name.
    pub name: String,
}

impl AuthenticatedAdmin {
    /// Converts this admin into an activity-log actor.
    #[must_use]
    pub fn to_actor(&self) -> Actor {
        Actor::admin(self.admin_id, self.email.clone())
    }
}

impl From<&AdminData> for AuthenticatedAdmin {
    fn from(admin: &AdminData) -> Self {
        Self {
            admin_id: admin.admin_id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates an admin and creates a session.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `config` - Session lifetime settings
    /// * `email` - The admin email
    /// * `password` - The plaintext password
    ///
    /// # Errors
    ///
    /// Returns `InvalidLogin` if the credentials are rejected.
    pub fn login(
        persistence: &Persistence,
        config: &AuthConfig,
        email: &str,
        password: &str,
    ) -> Result<(SessionData, AdminData), AuthError> {
        let Ok(email) = normalize_email("email", email) else {
            return Err(AuthError::InvalidLogin);
        };

        let Some(admin) = persistence
            .get_admin_by_email(&email)
            .map_err(Self::map_persistence_error)?
        else {
            warn!(email = %email, "Login rejected: unknown email");
            return Err(AuthError::InvalidLogin);
        };

        if !Self::verify_password(password, &admin.password_hash)? {
            warn!(admin_id = admin.admin_id, "Login rejected: wrong password");
            return Err(AuthError::InvalidLogin);
        }

        let session: SessionData = persistence
            .create_session(&Self::generate_token(), admin.admin_id, config.session_ttl)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(admin.admin_id)
            .map_err(Self::map_persistence_error)?;

        info!(admin_id = admin.admin_id, "Admin logged in");
        Ok((session, admin))
    }

    /// Validates a session token and returns the authenticated admin.
    ///
    /// An expired session is deleted as it is rejected.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCredential`, `InvalidCredential` or
    /// `ExpiredCredential` depending on why the token was refused.
    pub fn validate_session(
        persistence: &Persistence,
        token: &str,
    ) -> Result<AuthenticatedAdmin, AuthError> {
        if !is_well_formed_token(token) {
            return Err(AuthError::MalformedCredential);
        }

        let session: SessionData = persistence
            .get_session_by_token(token)
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidCredential)?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::Internal(format!("Unreadable session expiry: {e}")))?;
        if OffsetDateTime::now_utc() >= expires_at {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::ExpiredCredential);
        }

        let admin: AdminData = persistence
            .get_admin(session.admin_id)
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidCredential)?;

        Ok(AuthenticatedAdmin::from(&admin))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &Persistence, token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(token)
            .map_err(Self::map_persistence_error)
    }

    /// Starts a password reset for `email`.
    ///
    /// The returned delivery carries the token when the email belongs to an
    /// admin and is empty otherwise; callers must respond identically in
    /// both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity store cannot be read or written.
    pub fn request_password_reset(
        persistence: &Persistence,
        config: &AuthConfig,
        email: &str,
    ) -> Result<PendingDelivery, AuthError> {
        let Ok(email) = normalize_email("email", email) else {
            return Ok(PendingDelivery::none());
        };
        let Some(admin) = persistence
            .get_admin_by_email(&email)
            .map_err(Self::map_persistence_error)?
        else {
            debug!("Password reset requested for unknown email");
            return Ok(PendingDelivery::none());
        };

        let token: String = Self::generate_token();
        persistence
            .create_password_reset(&token, admin.admin_id, config.reset_ttl)
            .map_err(Self::map_persistence_error)?;
        info!(admin_id = admin.admin_id, "Password reset issued");

        Ok(PendingDelivery::new(
            DeliveryPolicy::FireAndForget,
            vec![Notification::new(
                Recipient::person(&admin.email, Some(&admin.name)),
                Template::PasswordReset {
                    reset_token: token,
                    expires_in_minutes: u32::try_from(config.reset_ttl.whole_minutes())
                        .unwrap_or(0),
                },
            )],
        ))
    }

    /// Hashes a password with bcrypt.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
        bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("Hashing failed: {e}")))
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::Internal(format!("Stored hash is unreadable: {e}")))
    }

    /// Generates an opaque random token.
    fn generate_token() -> String {
        let words: [u64; 4] = [
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
        ];
        words.iter().map(|word| format!("{word:016x}")).collect()
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        error!(error = %err, "Identity store failure");
        AuthError::Internal(err.to_string())
    }
}

/// Returns true if `token` could have been issued by this service.
#[must_use]
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_hexdigit())
}
