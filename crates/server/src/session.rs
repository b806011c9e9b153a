// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer session extraction for admin routes.

use axum::{extract::FromRequestParts, http::request::Parts};
use planmorph_api::{AuthError, AuthenticatedAdmin, AuthenticationService};
use planmorph_persistence::Persistence;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

/// Extractor for authenticated admins.
///
/// Reads `Authorization: Bearer <token>`, validates the session, and hands
/// the handler the admin together with the raw token (needed by logout).
///
/// # Errors
///
/// Rejects with HTTP 401 and a `reason` of `missing_credential`,
/// `malformed_credential`, `expired_credential` or `invalid_credential`.
pub struct SessionAdmin(pub AuthenticatedAdmin, pub String);

impl FromRequestParts<AppState> for SessionAdmin {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                AuthError::MissingCredential
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                AuthError::MalformedCredential
            })?;

        let token: String = auth_header
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .ok_or_else(|| {
                warn!("Authorization header does not start with 'Bearer '");
                AuthError::MalformedCredential
            })?;

        let persistence: Persistence = state.persistence.clone();
        let lookup: String = token.clone();
        let admin: AuthenticatedAdmin = tokio::task::spawn_blocking(move || {
            AuthenticationService::validate_session(&persistence, &lookup)
        })
        .await
        .map_err(|e| HttpError::internal(format!("Session lookup task failed: {e}")))?
        .inspect_err(|e| warn!(reason = e.reason(), "Session validation failed"))?;

        debug!(admin_id = admin.admin_id, "Session validated");
        Ok(Self(admin, token))
    }
}
