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
#![allow(clippy::multiple_crate_versions)]

//! The API boundary.
//!
//! Every operation follows the same order: validate the input, check that
//! the referenced entities exist, plan the transition with the lifecycle
//! engine, persist it, and hand back the response together with the
//! notifications to send. Nothing here sends mail or speaks HTTP.

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthConfig, AuthenticatedAdmin, AuthenticationService, TOKEN_LENGTH, is_well_formed_token,
};
pub use error::{
    ApiError, AuthError, ticket_not_found, translate_core_error, translate_domain_error,
};
pub use handlers::{
    add_client_message, assign_assessment, bootstrap_admin, change_client_plan,
    delete_project_request, delete_quotation, get_admin_ticket, get_application,
    get_project_request, get_public_ticket, get_quotation, issue_quotation, list_all_quotations,
    list_applications, list_project_requests, list_quotations, list_tickets, login, logout,
    register_admin, request_password_reset, reset_password, respond_to_ticket, schedule_interview,
    submit_application, submit_project_request, submit_ticket, ticket_stats,
    update_application_status, update_project_request_status, update_ticket, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AdminInfo, AdminTicketResponse, AllQuotationsResponse, ApplicationDetailResponse,
    ApplicationListQuery, ApplicationListResponse, ApplicationResponse,
    ApplicationSubmittedResponse, ClientPlanUpdate, LoginRequest, LoginResponse, MessageResponse,
    PasswordResetConfirm, PasswordResetRequest, ProjectRequestDetailResponse,
    ProjectRequestListResponse, ProjectRequestResponse, PublicMessage, PublicTicket,
    PublicTicketResponse, QuotationDetailResponse, QuotationListResponse, QuotationResponse,
    RegisterAdminRequest, RegisterAdminResponse, RequestListQuery, RequestStatusUpdate,
    SupportClientResponse, TicketCreatedResponse, TicketListQuery, TicketListResponse,
    TicketLookupQuery, TicketMessageResponse, TicketResponse, TicketSummary,
};

use planmorph_notify::PendingDelivery;

/// The result of a state-changing API operation.
///
/// The change is already committed when this is returned; `delivery` holds
/// the notifications the caller should dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// Notifications to send now that the change is durable.
    pub delivery: PendingDelivery,
}

impl<T> ApiResult<T> {
    /// Creates a new `ApiResult`.
    #[must_use]
    pub const fn new(response: T, delivery: PendingDelivery) -> Self {
        Self { response, delivery }
    }
}
