// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handlers.
//!
//! Each handler runs its API operation on the blocking pool, then hands
//! any resulting notifications to the dispatcher. Delivery only starts
//! once the operation has returned, so the change is already committed.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
};
use planmorph_api::{
    AdminInfo, AdminTicketResponse, AllQuotationsResponse, ApiError, ApiResult,
    ApplicationDetailResponse, ApplicationListQuery, ApplicationListResponse, ApplicationResponse,
    ApplicationSubmittedResponse, AuthConfig, ClientPlanUpdate, LoginRequest, LoginResponse,
    MessageResponse, PasswordResetConfirm, PasswordResetRequest, ProjectRequestDetailResponse,
    ProjectRequestListResponse, ProjectRequestResponse, PublicTicketResponse,
    QuotationDetailResponse, QuotationListResponse, QuotationResponse, RegisterAdminRequest,
    RegisterAdminResponse, RequestListQuery, RequestStatusUpdate, SupportClientResponse,
    TicketCreatedResponse, TicketListQuery, TicketListResponse, TicketLookupQuery,
    TicketMessageResponse, TicketResponse,
};
use planmorph_domain::{
    AdminResponseDraft, ApplicationDraft, AssessmentDraft, ClientReplyDraft, InterviewDraft,
    ProjectRequestDraft, Quotation, QuotationDraft, StatusUpdateDraft, TalentAssessment,
    TalentInterview, TicketDraft, TicketPatchDraft, TicketStats, format_timestamp,
};
use planmorph_notify::{DeliveryOutcome, PendingDelivery};
use planmorph_persistence::Persistence;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionAdmin;

type Created<T> = (StatusCode, Json<T>);

/// Runs an API operation on the blocking pool.
async fn run_blocking<T, F>(state: &AppState, operation: F) -> Result<T, HttpError>
where
    F: FnOnce(&Persistence) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let persistence: Persistence = state.persistence.clone();
    tokio::task::spawn_blocking(move || operation(&persistence))
        .await
        .map_err(|e| HttpError::internal(format!("Worker task failed: {e}")))?
        .map_err(HttpError::from)
}

/// Hands a committed operation's notifications to the dispatcher.
async fn dispatch(state: &AppState, delivery: PendingDelivery) -> DeliveryOutcome {
    let outcome: DeliveryOutcome = state.dispatcher.deliver(delivery).await;
    debug!(outcome = ?outcome, "Notifications handed off");
    outcome
}

/// Returns a committed result's response after dispatching its delivery.
async fn respond<T>(state: &AppState, result: ApiResult<T>) -> T {
    dispatch(state, result.delivery).await;
    result.response
}

// ============================================================================
// Health
// ============================================================================

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` when the server answers.
    pub status: String,
    /// The current server time.
    pub timestamp: String,
    /// The service name.
    pub service: String,
}

/// Handler for GET `/api/health`.
pub async fn handle_health() -> Result<Json<HealthResponse>, HttpError> {
    let timestamp: String = format_timestamp(OffsetDateTime::now_utc())
        .map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(Json(HealthResponse {
        status: String::from("healthy"),
        timestamp,
        service: String::from("PlanMorph Operations API"),
    }))
}

// ============================================================================
// Identity
// ============================================================================

/// Handler for POST `/api/auth/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!("Handling login request");
    let config: AuthConfig = app_state.auth;
    let response: LoginResponse =
        run_blocking(&app_state, move |p| planmorph_api::login(p, &config, &req)).await?;
    Ok(Json(response))
}

/// Handler for POST `/api/auth/logout`.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, token): SessionAdmin,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(admin_id = admin.admin_id, "Handling logout request");
    let response: MessageResponse =
        run_blocking(&app_state, move |p| planmorph_api::logout(p, &token)).await?;
    Ok(Json(response))
}

/// Handler for GET `/api/auth/me` and POST `/api/auth/verify`.
pub async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
) -> Result<Json<AdminInfo>, HttpError> {
    let response: AdminInfo =
        run_blocking(&app_state, move |p| planmorph_api::whoami(p, &admin)).await?;
    Ok(Json(response))
}

/// Handler for POST `/api/auth/register`.
pub async fn handle_register_admin(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Json(req): Json<RegisterAdminRequest>,
) -> Result<Created<RegisterAdminResponse>, HttpError> {
    info!(admin_id = admin.admin_id, "Handling register_admin request");
    let config: AuthConfig = app_state.auth;
    let response: RegisterAdminResponse = run_blocking(&app_state, move |p| {
        planmorph_api::register_admin(p, &config, &req, &admin)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/api/auth/request-reset`.
pub async fn handle_request_password_reset(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!("Handling password reset request");
    let config: AuthConfig = app_state.auth;
    let result: ApiResult<MessageResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::request_password_reset(p, &config, &req)
    })
    .await?;
    Ok(Json(respond(&app_state, result).await))
}

/// Handler for POST `/api/auth/reset-password`.
pub async fn handle_reset_password(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PasswordResetConfirm>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!("Handling password reset confirmation");
    let config: AuthConfig = app_state.auth;
    let response: MessageResponse = run_blocking(&app_state, move |p| {
        planmorph_api::reset_password(p, &config, &req)
    })
    .await?;
    Ok(Json(response))
}

// ============================================================================
// Project requests and quotations
// ============================================================================

/// Handler for POST `/api/requests`.
pub async fn handle_submit_request(
    AxumState(app_state): AxumState<AppState>,
    Json(draft): Json<ProjectRequestDraft>,
) -> Result<Created<ProjectRequestResponse>, HttpError> {
    info!(project_type = %draft.project_type, "Handling submit_request");
    let result: ApiResult<ProjectRequestResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::submit_project_request(p, &draft)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for GET `/api/requests`.
pub async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<ProjectRequestListResponse>, HttpError> {
    let response: ProjectRequestListResponse = run_blocking(&app_state, move |p| {
        planmorph_api::list_project_requests(p, &query)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/api/requests/{id}`.
pub async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Path(request_id): Path<i64>,
) -> Result<Json<ProjectRequestDetailResponse>, HttpError> {
    let response: ProjectRequestDetailResponse = run_blocking(&app_state, move |p| {
        planmorph_api::get_project_request(p, request_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for PUT `/api/requests/{id}`.
pub async fn handle_update_request(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(request_id): Path<i64>,
    Json(update): Json<RequestStatusUpdate>,
) -> Result<Json<ProjectRequestResponse>, HttpError> {
    info!(request_id, status = %update.status, "Handling update_request");
    let response: ProjectRequestResponse = run_blocking(&app_state, move |p| {
        planmorph_api::update_project_request_status(p, request_id, &update, &admin)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/api/requests/{id}`.
pub async fn handle_delete_request(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(request_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(request_id, "Handling delete_request");
    let response: MessageResponse = run_blocking(&app_state, move |p| {
        planmorph_api::delete_project_request(p, request_id, &admin)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for POST `/api/quotes`.
///
/// The quotation email is awaited with a bound; its outcome is reported in
/// the response without affecting the stored quotation.
pub async fn handle_issue_quotation(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Json(draft): Json<QuotationDraft>,
) -> Result<Created<QuotationResponse>, HttpError> {
    info!(request_id = ?draft.request_id, "Handling issue_quotation");
    let result: ApiResult<Quotation> = run_blocking(&app_state, move |p| {
        planmorph_api::issue_quotation(p, &draft, &admin)
    })
    .await?;
    let outcome: DeliveryOutcome = dispatch(&app_state, result.delivery).await;
    Ok((
        StatusCode::CREATED,
        Json(QuotationResponse::new(result.response, &outcome)),
    ))
}

/// Handler for GET `/api/quotes`.
pub async fn handle_list_all_quotations(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
) -> Result<Json<AllQuotationsResponse>, HttpError> {
    let response: AllQuotationsResponse =
        run_blocking(&app_state, planmorph_api::list_all_quotations).await?;
    Ok(Json(response))
}

/// Handler for GET `/api/quotes/{id}`.
pub async fn handle_get_quotation(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Path(quotation_id): Path<i64>,
) -> Result<Json<QuotationDetailResponse>, HttpError> {
    let response: QuotationDetailResponse = run_blocking(&app_state, move |p| {
        planmorph_api::get_quotation(p, quotation_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/api/quotes/{id}`.
pub async fn handle_delete_quotation(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(quotation_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(quotation_id, "Handling delete_quotation");
    let response: MessageResponse = run_blocking(&app_state, move |p| {
        planmorph_api::delete_quotation(p, quotation_id, &admin)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/api/quotes/request/{request_id}`.
pub async fn handle_list_quotations(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Path(request_id): Path<i64>,
) -> Result<Json<QuotationListResponse>, HttpError> {
    let response: QuotationListResponse = run_blocking(&app_state, move |p| {
        planmorph_api::list_quotations(p, request_id)
    })
    .await?;
    Ok(Json(response))
}

// ============================================================================
// Support
// ============================================================================

/// Handler for POST `/api/support/submit`.
pub async fn handle_submit_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(draft): Json<TicketDraft>,
) -> Result<Created<TicketCreatedResponse>, HttpError> {
    info!(category = %draft.category, "Handling submit_ticket");
    let result: ApiResult<TicketCreatedResponse> =
        run_blocking(&app_state, move |p| planmorph_api::submit_ticket(p, &draft)).await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for GET `/api/support/ticket/{ticket_number}`.
pub async fn handle_get_public_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_number): Path<String>,
    Query(query): Query<TicketLookupQuery>,
) -> Result<Json<PublicTicketResponse>, HttpError> {
    debug!(ticket_number = %ticket_number, "Handling public ticket lookup");
    let response: PublicTicketResponse = run_blocking(&app_state, move |p| {
        planmorph_api::get_public_ticket(p, &ticket_number, &query)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for POST `/api/support/ticket/{ticket_number}/message`.
pub async fn handle_client_message(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_number): Path<String>,
    Json(draft): Json<ClientReplyDraft>,
) -> Result<Created<TicketMessageResponse>, HttpError> {
    info!(ticket_number = %ticket_number, "Handling client reply");
    let result: ApiResult<TicketMessageResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::add_client_message(p, &ticket_number, &draft)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for GET `/api/support/admin/tickets`.
pub async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Query(query): Query<TicketListQuery>,
) -> Result<Json<TicketListResponse>, HttpError> {
    let response: TicketListResponse =
        run_blocking(&app_state, move |p| planmorph_api::list_tickets(p, &query)).await?;
    Ok(Json(response))
}

/// Handler for GET `/api/support/admin/tickets/{id}`.
pub async fn handle_get_admin_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Path(ticket_id): Path<i64>,
) -> Result<Json<AdminTicketResponse>, HttpError> {
    let response: AdminTicketResponse = run_blocking(&app_state, move |p| {
        planmorph_api::get_admin_ticket(p, ticket_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for PATCH `/api/support/admin/tickets/{id}`.
pub async fn handle_update_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(ticket_id): Path<i64>,
    Json(draft): Json<TicketPatchDraft>,
) -> Result<Json<TicketResponse>, HttpError> {
    info!(ticket_id, "Handling update_ticket");
    let result: ApiResult<TicketResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::update_ticket(p, ticket_id, &draft, &admin)
    })
    .await?;
    Ok(Json(respond(&app_state, result).await))
}

/// Handler for POST `/api/support/admin/tickets/{id}/respond`.
pub async fn handle_respond_to_ticket(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(ticket_id): Path<i64>,
    Json(draft): Json<AdminResponseDraft>,
) -> Result<Created<TicketMessageResponse>, HttpError> {
    info!(
        ticket_id,
        internal = draft.is_internal_note,
        "Handling respond_to_ticket"
    );
    let result: ApiResult<TicketMessageResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::respond_to_ticket(p, ticket_id, &draft, &admin)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for GET `/api/support/admin/stats`.
pub async fn handle_ticket_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
) -> Result<Json<TicketStats>, HttpError> {
    let stats: TicketStats = run_blocking(&app_state, planmorph_api::ticket_stats).await?;
    Ok(Json(stats))
}

/// Handler for PATCH `/api/support/admin/clients/{id}/plan`.
pub async fn handle_change_client_plan(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(client_id): Path<i64>,
    Json(update): Json<ClientPlanUpdate>,
) -> Result<Json<SupportClientResponse>, HttpError> {
    info!(client_id, plan = %update.plan_type, "Handling change_client_plan");
    let response: SupportClientResponse = run_blocking(&app_state, move |p| {
        planmorph_api::change_client_plan(p, client_id, &update, &admin)
    })
    .await?;
    Ok(Json(response))
}

// ============================================================================
// Talent
// ============================================================================

/// Handler for POST `/api/talent/apply`.
pub async fn handle_submit_application(
    AxumState(app_state): AxumState<AppState>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Created<ApplicationSubmittedResponse>, HttpError> {
    info!(role = %draft.role, "Handling submit_application");
    let result: ApiResult<ApplicationSubmittedResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::submit_application(p, &draft)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for GET `/api/talent/applications`.
pub async fn handle_list_applications(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<ApplicationListResponse>, HttpError> {
    let response: ApplicationListResponse = run_blocking(&app_state, move |p| {
        planmorph_api::list_applications(p, &query)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/api/talent/applications/{id}`.
pub async fn handle_get_application(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(_, _): SessionAdmin,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationDetailResponse>, HttpError> {
    let response: ApplicationDetailResponse = run_blocking(&app_state, move |p| {
        planmorph_api::get_application(p, application_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for PATCH `/api/talent/applications/{id}/status`.
pub async fn handle_update_application_status(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(application_id): Path<i64>,
    Json(draft): Json<StatusUpdateDraft>,
) -> Result<Json<ApplicationResponse>, HttpError> {
    info!(application_id, status = %draft.status, "Handling update_application_status");
    let result: ApiResult<ApplicationResponse> = run_blocking(&app_state, move |p| {
        planmorph_api::update_application_status(p, application_id, &draft, &admin)
    })
    .await?;
    Ok(Json(respond(&app_state, result).await))
}

/// Handler for POST `/api/talent/applications/{id}/assessment`.
pub async fn handle_assign_assessment(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(application_id): Path<i64>,
    Json(draft): Json<AssessmentDraft>,
) -> Result<Created<TalentAssessment>, HttpError> {
    info!(application_id, "Handling assign_assessment");
    let result: ApiResult<TalentAssessment> = run_blocking(&app_state, move |p| {
        planmorph_api::assign_assessment(p, application_id, &draft, &admin)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}

/// Handler for POST `/api/talent/applications/{id}/interview`.
pub async fn handle_schedule_interview(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(application_id): Path<i64>,
    Json(draft): Json<InterviewDraft>,
) -> Result<Created<TalentInterview>, HttpError> {
    info!(application_id, "Handling schedule_interview");
    let result: ApiResult<TalentInterview> = run_blocking(&app_state, move |p| {
        planmorph_api::schedule_interview(p, application_id, &draft, &admin)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&app_state, result).await)))
}
