// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.

use planmorph::{
    AssessmentPlan, InterviewPlan, TicketUpdate, Transition, application_delivery,
    application_event, plan_admin_response, plan_application_status, plan_assessment,
    plan_client_reply, plan_interview, plan_quotation, plan_request_status, plan_ticket_update,
    quotation_deletion_event, request_submission_delivery, request_submission_event,
    ticket_submission_delivery,
};
use planmorph_audit::ActivityRecord;
use planmorph_domain::{
    AdminResponse, AdminResponseDraft, ApplicationDraft, ApplicationStatus, AssessmentDraft,
    ClientReply, ClientReplyDraft, EntityKind, FieldViolation, InterviewDraft, NewApplication,
    NewAssessment, NewInterview, NewProjectRequest, NewQuotation, NewTicket, PlanType,
    ProjectRequest, ProjectRequestDraft, Quotation, QuotationDetail, QuotationDraft, RequestStatus,
    SenderType, StatusUpdate, StatusUpdateDraft, SupportClient, SupportTicket, TalentApplication,
    TalentAssessment, TalentInterview, TalentRole, TicketDraft, TicketMessage, TicketNumber,
    TicketPatch, TicketPatchDraft, TicketPriority, TicketStats, TicketStatus, Violations,
    normalize_email, validate_name,
};
use planmorph_notify::PendingDelivery;
use planmorph_persistence::{AdminData, NewTicketMessage, Persistence, PersistenceError, SessionData};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::ApiResult;
use crate::auth::{AuthConfig, AuthenticatedAdmin, AuthenticationService, is_well_formed_token};
use crate::error::{ApiError, ticket_not_found, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AdminInfo, AdminTicketResponse, AllQuotationsResponse, ApplicationDetailResponse,
    ApplicationListQuery, ApplicationListResponse, ApplicationResponse,
    ApplicationSubmittedResponse, ClientPlanUpdate, LoginRequest, LoginResponse, MessageResponse,
    PasswordResetConfirm, PasswordResetRequest, ProjectRequestDetailResponse,
    ProjectRequestListResponse, ProjectRequestResponse, PublicMessage, PublicTicket,
    PublicTicketResponse, QuotationDetailResponse, QuotationListResponse, RegisterAdminRequest,
    RegisterAdminResponse, RequestListQuery, RequestStatusUpdate, SupportClientResponse,
    TicketCreatedResponse, TicketListQuery, TicketListResponse, TicketLookupQuery,
    TicketMessageResponse, TicketResponse, TicketSummary,
};

/// The reply to every password reset request, whether or not the email is known.
const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists with that email, a password reset link has been sent.";

/// Parses an optional list filter. Blank values mean no filter.
fn parse_filter<T>(
    field: &str,
    raw: Option<&str>,
    parse: impl Fn(&str, &str) -> Result<T, FieldViolation>,
) -> Result<Option<T>, ApiError> {
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .map(|value| parse(field, value))
        .transpose()?)
}

fn load_request(persistence: &Persistence, request_id: i64) -> Result<ProjectRequest, ApiError> {
    persistence
        .get_project_request(request_id)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Project request",
                format!("Project request {request_id} does not exist"),
            )
        })
}

fn load_ticket(persistence: &Persistence, ticket_id: i64) -> Result<SupportTicket, ApiError> {
    persistence
        .get_ticket(ticket_id)?
        .ok_or_else(|| ApiError::not_found("Ticket", format!("Ticket {ticket_id} does not exist")))
}

fn load_application(
    persistence: &Persistence,
    application_id: i64,
) -> Result<TalentApplication, ApiError> {
    persistence.get_application(application_id)?.ok_or_else(|| {
        ApiError::not_found(
            "Application",
            format!("Application {application_id} does not exist"),
        )
    })
}

/// Resolves a public ticket reference, reporting every miss the same way.
fn load_public_ticket(
    persistence: &Persistence,
    ticket_number: &str,
) -> Result<SupportTicket, ApiError> {
    let Ok(number) = TicketNumber::parse(ticket_number) else {
        return Err(ticket_not_found());
    };
    persistence
        .get_ticket_by_number(number)?
        .ok_or_else(ticket_not_found)
}

// ============================================================================
// Identity
// ============================================================================

/// Authenticates an admin and opens a session.
///
/// # Errors
///
/// Returns an authentication error if the credentials are rejected.
pub fn login(
    persistence: &Persistence,
    config: &AuthConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session, admin): (SessionData, AdminData) =
        AuthenticationService::login(persistence, config, &request.email, &request.password)?;

    Ok(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        admin: AdminInfo::from(&admin),
    })
}

/// Ends the session behind `token`.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &Persistence, token: &str) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, token)?;
    Ok(MessageResponse::new("Logged out"))
}

/// Returns the account behind a validated session.
///
/// # Errors
///
/// Returns an error if the account no longer exists.
pub fn whoami(persistence: &Persistence, admin: &AuthenticatedAdmin) -> Result<AdminInfo, ApiError> {
    let stored: AdminData = persistence
        .get_admin(admin.admin_id)?
        .ok_or_else(|| ApiError::not_found("Admin", format!("Admin {} does not exist", admin.admin_id)))?;
    Ok(AdminInfo::from(&stored))
}

/// Creates another admin account.
///
/// # Errors
///
/// Returns an error if a field is invalid, the password breaks the policy,
/// or the email is already registered.
pub fn register_admin(
    persistence: &Persistence,
    config: &AuthConfig,
    request: &RegisterAdminRequest,
    actor: &AuthenticatedAdmin,
) -> Result<RegisterAdminResponse, ApiError> {
    let email: Result<String, FieldViolation> = normalize_email("email", &request.email);
    let name: Result<String, FieldViolation> = validate_name("name", &request.name);
    let mut violations: Violations = Violations::new();
    violations.note(&email);
    violations.note(&name);
    violations.finish().map_err(translate_domain_error)?;
    let (email, name): (String, String) = (email?, name?);

    PasswordPolicy::default().validate(&request.password)?;
    let hash: String = AuthenticationService::hash_password(&request.password, config.hash_cost)?;
    let admin_id: i64 = persistence.create_admin(&email, &name, &hash)?;
    let admin: AdminData = persistence
        .get_admin(admin_id)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Admin not found after creation"),
        })?;

    info!(admin_id, created_by = actor.admin_id, "Admin account created");
    Ok(RegisterAdminResponse {
        admin: AdminInfo::from(&admin),
        message: String::from("Admin account created"),
    })
}

/// Creates the first admin account if none exists yet.
///
/// Returns the new admin's id, or `None` if an admin already exists.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the write fails.
pub fn bootstrap_admin(
    persistence: &Persistence,
    config: &AuthConfig,
    email: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    if persistence.count_admins()? > 0 {
        return Ok(None);
    }

    let email: String = normalize_email("email", email)?;
    PasswordPolicy::default().validate(password)?;
    let hash: String = AuthenticationService::hash_password(password, config.hash_cost)?;
    let admin_id: i64 = persistence.create_admin(&email, "Administrator", &hash)?;

    info!(admin_id, email = %email, "Bootstrap admin created");
    Ok(Some(admin_id))
}

/// Starts a password reset.
///
/// The response is the same whether or not the email belongs to an admin.
///
/// # Errors
///
/// Returns an error only if the identity store fails.
pub fn request_password_reset(
    persistence: &Persistence,
    config: &AuthConfig,
    request: &PasswordResetRequest,
) -> Result<ApiResult<MessageResponse>, ApiError> {
    let delivery: PendingDelivery =
        AuthenticationService::request_password_reset(persistence, config, &request.email)?;
    Ok(ApiResult::new(
        MessageResponse::new(RESET_REQUESTED_MESSAGE),
        delivery,
    ))
}

/// Completes a password reset and revokes every session of the account.
///
/// # Errors
///
/// Returns an error if the password breaks the policy or the token is
/// unknown, used, or expired.
pub fn reset_password(
    persistence: &Persistence,
    config: &AuthConfig,
    request: &PasswordResetConfirm,
) -> Result<MessageResponse, ApiError> {
    PasswordPolicy::default().validate(&request.new_password)?;
    if !is_well_formed_token(&request.token) {
        return Err(ApiError::invalid("token", "Reset token is invalid"));
    }

    let hash: String =
        AuthenticationService::hash_password(&request.new_password, config.hash_cost)?;
    let admin_id: i64 = persistence
        .complete_password_reset(&request.token, &hash)
        .map_err(|err| match err {
            PersistenceError::NotFound(_) => ApiError::invalid("token", "Reset token is invalid"),
            other => ApiError::from(other),
        })?;

    info!(admin_id, "Password reset completed");
    Ok(MessageResponse::new(
        "Password has been reset. Please log in with your new password.",
    ))
}

// ============================================================================
// Project requests and quotations
// ============================================================================

/// Records a project request from the public form.
///
/// The staff alert and the client confirmation go out after the request is
/// stored; their failure never fails the submission.
///
/// # Errors
///
/// Returns an error if a field is invalid or the write fails.
pub fn submit_project_request(
    persistence: &Persistence,
    draft: &ProjectRequestDraft,
) -> Result<ApiResult<ProjectRequestResponse>, ApiError> {
    let request: NewProjectRequest = draft.validate().map_err(translate_domain_error)?;
    let stored: ProjectRequest =
        persistence.insert_project_request(&request, &request_submission_event(&request))?;

    info!(
        request_id = stored.id,
        project_type = stored.project_type.as_str(),
        "Project request submitted"
    );
    let delivery: PendingDelivery = request_submission_delivery(&stored);
    Ok(ApiResult::new(
        ProjectRequestResponse {
            request: stored,
            message: String::from("Request submitted successfully! We will contact you soon."),
        },
        delivery,
    ))
}

/// Lists project requests, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the filter is not a known status.
pub fn list_project_requests(
    persistence: &Persistence,
    query: &RequestListQuery,
) -> Result<ProjectRequestListResponse, ApiError> {
    let status: Option<RequestStatus> =
        parse_filter("status", query.status.as_deref(), RequestStatus::parse_field)?;
    let requests: Vec<ProjectRequest> = persistence.list_project_requests(status)?;
    debug!(count = requests.len(), "Listed project requests");

    Ok(ProjectRequestListResponse {
        count: requests.len(),
        requests,
    })
}

/// Returns a request with its quotations and activity.
///
/// # Errors
///
/// Returns an error if the request does not exist.
pub fn get_project_request(
    persistence: &Persistence,
    request_id: i64,
) -> Result<ProjectRequestDetailResponse, ApiError> {
    let request: ProjectRequest = load_request(persistence, request_id)?;
    let quotations: Vec<Quotation> = persistence.list_quotations(request_id)?;
    let activity: Vec<ActivityRecord> =
        persistence.list_activity(EntityKind::ProjectRequest, request_id)?;

    Ok(ProjectRequestDetailResponse {
        request,
        quotations,
        activity,
    })
}

/// Applies an admin status edit to a request. No notification is sent.
///
/// # Errors
///
/// Returns an error if the status is unknown, the request does not exist,
/// the lifecycle refuses the change, or the status moved concurrently.
pub fn update_project_request_status(
    persistence: &Persistence,
    request_id: i64,
    update: &RequestStatusUpdate,
    admin: &AuthenticatedAdmin,
) -> Result<ProjectRequestResponse, ApiError> {
    let target: RequestStatus = RequestStatus::parse_field("status", &update.status)?;
    let request: ProjectRequest = load_request(persistence, request_id)?;
    let transition: Transition<RequestStatus> =
        plan_request_status(&request, target, admin.to_actor()).map_err(translate_core_error)?;
    let updated: ProjectRequest = persistence.update_request_status(request_id, &transition)?;

    info!(
        request_id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        admin_id = admin.admin_id,
        "Project request status updated"
    );
    Ok(ProjectRequestResponse {
        request: updated,
        message: String::from("Request updated successfully"),
    })
}

/// Deletes a request together with its quotations.
///
/// # Errors
///
/// Returns an error if the request does not exist.
pub fn delete_project_request(
    persistence: &Persistence,
    request_id: i64,
    admin: &AuthenticatedAdmin,
) -> Result<MessageResponse, ApiError> {
    if !persistence.delete_project_request(request_id)? {
        return Err(ApiError::not_found(
            "Project request",
            format!("Project request {request_id} does not exist"),
        ));
    }

    info!(request_id, admin_id = admin.admin_id, "Project request deleted");
    Ok(MessageResponse::new("Request deleted successfully"))
}

/// Issues a quotation and moves its request to `Quoted` in one transaction.
///
/// The returned delivery is awaited with a bound by the caller, whose
/// outcome becomes the response's `email_sent` flag.
///
/// # Errors
///
/// Returns an error if the quotation is invalid, the request does not
/// exist, or the request's status does not allow quoting.
pub fn issue_quotation(
    persistence: &Persistence,
    draft: &QuotationDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<Quotation>, ApiError> {
    let quotation: NewQuotation = draft.validate().map_err(translate_domain_error)?;
    let request: ProjectRequest = load_request(persistence, quotation.request_id)?;
    let transition: Transition<RequestStatus> =
        plan_quotation(&request, &quotation, admin.to_actor()).map_err(translate_core_error)?;
    let stored: Quotation = persistence.insert_quotation(&quotation, &transition)?;

    info!(
        quotation_id = stored.id,
        request_id = request.id,
        total_cost = %stored.total_cost,
        admin_id = admin.admin_id,
        "Quotation issued"
    );
    Ok(ApiResult::new(stored, transition.delivery))
}

/// Lists a request's quotations, newest first.
///
/// # Errors
///
/// Returns an error if the request does not exist.
pub fn list_quotations(
    persistence: &Persistence,
    request_id: i64,
) -> Result<QuotationListResponse, ApiError> {
    load_request(persistence, request_id)?;
    Ok(QuotationListResponse {
        request_id,
        quotations: persistence.list_quotations(request_id)?,
    })
}

/// Lists every quotation, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_all_quotations(persistence: &Persistence) -> Result<AllQuotationsResponse, ApiError> {
    let quotes: Vec<QuotationDetail> = persistence.list_all_quotations()?;
    debug!(count = quotes.len(), "Listed quotations");
    Ok(AllQuotationsResponse {
        total: quotes.len(),
        quotes,
    })
}

/// Loads one quotation.
///
/// # Errors
///
/// Returns a not-found error if there is no such quotation.
pub fn get_quotation(
    persistence: &Persistence,
    quotation_id: i64,
) -> Result<QuotationDetailResponse, ApiError> {
    let quote: QuotationDetail = persistence
        .get_quotation(quotation_id)?
        .ok_or_else(|| ApiError::not_found("Quotation", "Quote not found"))?;
    Ok(QuotationDetailResponse { quote })
}

/// Deletes a quotation and records it on the request's activity log.
///
/// The request keeps its status.
///
/// # Errors
///
/// Returns a not-found error if there is no such quotation.
pub fn delete_quotation(
    persistence: &Persistence,
    quotation_id: i64,
    admin: &AuthenticatedAdmin,
) -> Result<MessageResponse, ApiError> {
    let request_id: i64 = persistence
        .delete_quotation(
            quotation_id,
            &quotation_deletion_event(quotation_id, admin.to_actor()),
        )?
        .ok_or_else(|| ApiError::not_found("Quotation", "Quote not found"))?;

    info!(quotation_id, request_id, admin_id = admin.admin_id, "Quotation deleted");
    Ok(MessageResponse::new("Quote deleted successfully"))
}

// ============================================================================
// Support tickets
// ============================================================================

/// Opens a ticket from the public form.
///
/// # Errors
///
/// Returns an error if a field is invalid or the write fails.
pub fn submit_ticket(
    persistence: &Persistence,
    draft: &TicketDraft,
) -> Result<ApiResult<TicketCreatedResponse>, ApiError> {
    let ticket: NewTicket = draft.validate().map_err(translate_domain_error)?;
    let stored: SupportTicket = persistence.submit_ticket(&ticket)?;

    info!(
        ticket_number = %stored.ticket_number,
        plan = stored.client_plan.as_str(),
        sla_hours = stored.response_sla_hours,
        "Support ticket opened"
    );
    let delivery: PendingDelivery = ticket_submission_delivery(&stored);
    Ok(ApiResult::new(
        TicketCreatedResponse {
            success: true,
            message: String::from("Support ticket created successfully"),
            ticket: TicketSummary {
                id: stored.id,
                ticket_number: stored.ticket_number,
                status: stored.status,
                sla_hours: stored.response_sla_hours,
            },
        },
        delivery,
    ))
}

/// Returns a ticket to the client who opened it.
///
/// The email must match the ticket's client. Internal notes are never
/// included.
///
/// # Errors
///
/// Returns a not-found error if the ticket does not exist or the email does
/// not match, without saying which.
pub fn get_public_ticket(
    persistence: &Persistence,
    ticket_number: &str,
    query: &TicketLookupQuery,
) -> Result<PublicTicketResponse, ApiError> {
    if query.email.trim().is_empty() {
        return Err(ApiError::invalid("email", "Email is required"));
    }
    let ticket: SupportTicket = load_public_ticket(persistence, ticket_number)?;
    if !ticket.client_email.eq_ignore_ascii_case(query.email.trim()) {
        debug!(ticket_number = %ticket.ticket_number, "Ticket lookup email mismatch");
        return Err(ticket_not_found());
    }

    let messages: Vec<TicketMessage> = persistence.list_ticket_messages(ticket.id, false)?;
    Ok(PublicTicketResponse {
        ticket: PublicTicket::from(&ticket),
        messages: messages.iter().map(PublicMessage::from).collect(),
    })
}

/// Appends a client reply to a ticket.
///
/// A ticket waiting on the client moves back to in progress.
///
/// # Errors
///
/// Returns a not-found error if the ticket does not exist or the email does
/// not own it, and a rule violation if the ticket is closed.
pub fn add_client_message(
    persistence: &Persistence,
    ticket_number: &str,
    draft: &ClientReplyDraft,
) -> Result<ApiResult<TicketMessageResponse>, ApiError> {
    let reply: ClientReply = draft.validate().map_err(translate_domain_error)?;
    let ticket: SupportTicket = load_public_ticket(persistence, ticket_number)?;
    let transition: Transition<TicketStatus> =
        plan_client_reply(&ticket, &reply).map_err(translate_core_error)?;

    let message: NewTicketMessage = NewTicketMessage {
        sender_type: SenderType::Client,
        sender_id: None,
        sender_name: reply
            .sender_name
            .clone()
            .or_else(|| Some(ticket.client_name.clone())),
        sender_email: Some(reply.email.clone()),
        message: reply.message.clone(),
        is_internal_note: false,
    };
    let stored: TicketMessage = persistence.add_ticket_message(ticket.id, &message, &transition)?;

    info!(ticket_number = %ticket.ticket_number, "Client replied to ticket");
    Ok(ApiResult::new(
        TicketMessageResponse {
            success: true,
            message: String::from("Reply added successfully"),
            data: stored,
        },
        transition.delivery,
    ))
}

/// Lists tickets, optionally filtered by status and priority.
///
/// # Errors
///
/// Returns an error if a filter is not a known value.
pub fn list_tickets(
    persistence: &Persistence,
    query: &TicketListQuery,
) -> Result<TicketListResponse, ApiError> {
    let status: Option<TicketStatus> =
        parse_filter("status", query.status.as_deref(), TicketStatus::parse_field)?;
    let priority: Option<TicketPriority> = parse_filter(
        "priority",
        query.priority.as_deref(),
        TicketPriority::parse_field,
    )?;
    let tickets: Vec<SupportTicket> = persistence.list_tickets(status, priority)?;
    debug!(count = tickets.len(), "Listed tickets");

    Ok(TicketListResponse {
        count: tickets.len(),
        tickets,
    })
}

/// Returns a ticket with every message, its client, and its activity.
///
/// # Errors
///
/// Returns an error if the ticket does not exist.
pub fn get_admin_ticket(
    persistence: &Persistence,
    ticket_id: i64,
) -> Result<AdminTicketResponse, ApiError> {
    let ticket: SupportTicket = load_ticket(persistence, ticket_id)?;
    let client: Option<SupportClient> = persistence.get_support_client(ticket.client_id)?;
    let messages: Vec<TicketMessage> = persistence.list_ticket_messages(ticket_id, true)?;
    let activity: Vec<ActivityRecord> =
        persistence.list_activity(EntityKind::SupportTicket, ticket_id)?;

    Ok(AdminTicketResponse {
        ticket,
        client,
        messages,
        activity,
    })
}

/// Applies a partial admin update to a ticket.
///
/// # Errors
///
/// Returns an error if the patch is invalid or empty, the ticket or the
/// assignee does not exist, or the status moved concurrently.
pub fn update_ticket(
    persistence: &Persistence,
    ticket_id: i64,
    draft: &TicketPatchDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<TicketResponse>, ApiError> {
    let patch: TicketPatch = draft.validate().map_err(translate_domain_error)?;
    let ticket: SupportTicket = load_ticket(persistence, ticket_id)?;
    if let Some(assignee) = patch.assigned_to
        && persistence.get_admin(assignee)?.is_none()
    {
        return Err(ApiError::invalid(
            "assigned_to",
            format!("No admin with id {assignee}"),
        ));
    }

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let update: TicketUpdate =
        plan_ticket_update(&ticket, &patch, admin.admin_id, &admin.email, now)
            .map_err(translate_core_error)?;
    let updated: SupportTicket = persistence.update_ticket(ticket_id, &update, now)?;

    info!(
        ticket_number = %updated.ticket_number,
        from = update.transition.from.as_str(),
        to = update.transition.to.as_str(),
        admin_id = admin.admin_id,
        "Ticket updated"
    );
    Ok(ApiResult::new(
        TicketResponse { ticket: updated },
        update.transition.delivery,
    ))
}

/// Adds an admin response or internal note to a ticket.
///
/// # Errors
///
/// Returns an error if the message is invalid or the ticket does not exist.
pub fn respond_to_ticket(
    persistence: &Persistence,
    ticket_id: i64,
    draft: &AdminResponseDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<TicketMessageResponse>, ApiError> {
    let response: AdminResponse = draft.validate().map_err(translate_domain_error)?;
    let ticket: SupportTicket = load_ticket(persistence, ticket_id)?;
    let transition: Transition<TicketStatus> =
        plan_admin_response(&ticket, &response, admin.to_actor()).map_err(translate_core_error)?;

    let message: NewTicketMessage = NewTicketMessage {
        sender_type: SenderType::Admin,
        sender_id: Some(admin.admin_id),
        sender_name: Some(admin.name.clone()),
        sender_email: Some(admin.email.clone()),
        message: response.message.clone(),
        is_internal_note: response.is_internal_note,
    };
    let stored: TicketMessage = persistence.add_ticket_message(ticket_id, &message, &transition)?;

    info!(
        ticket_number = %ticket.ticket_number,
        internal = response.is_internal_note,
        admin_id = admin.admin_id,
        "Admin responded to ticket"
    );
    Ok(ApiResult::new(
        TicketMessageResponse {
            success: true,
            message: String::from("Response added successfully"),
            data: stored,
        },
        transition.delivery,
    ))
}

/// Returns the ticket dashboard counts.
///
/// # Errors
///
/// Returns an error if a count fails.
pub fn ticket_stats(persistence: &Persistence) -> Result<TicketStats, ApiError> {
    Ok(persistence.ticket_stats()?)
}

/// Changes a client's service plan.
///
/// Only tickets opened afterwards see the new plan.
///
/// # Errors
///
/// Returns an error if the plan is unknown or the client does not exist.
pub fn change_client_plan(
    persistence: &Persistence,
    client_id: i64,
    update: &ClientPlanUpdate,
    admin: &AuthenticatedAdmin,
) -> Result<SupportClientResponse, ApiError> {
    let plan: PlanType = PlanType::parse_field("plan_type", &update.plan_type)?;
    let client: SupportClient = persistence.set_client_plan(client_id, plan)?;

    info!(client_id, plan = plan.as_str(), admin_id = admin.admin_id, "Client plan changed");
    Ok(SupportClientResponse {
        plan_type: client.plan_type,
        client,
    })
}

// ============================================================================
// Talent applications
// ============================================================================

/// Records a talent application.
///
/// # Errors
///
/// Returns an invalid-input error on the `email` field if the email
/// already has an application, or if any other field is invalid.
pub fn submit_application(
    persistence: &Persistence,
    draft: &ApplicationDraft,
) -> Result<ApiResult<ApplicationSubmittedResponse>, ApiError> {
    let application: NewApplication = draft.validate().map_err(translate_domain_error)?;
    let stored: TalentApplication = persistence
        .insert_application(&application, &application_event(&application))
        .map_err(|err| match err {
            PersistenceError::DuplicateEmail(_) => {
                ApiError::invalid("email", "An application with this email already exists")
            }
            other => ApiError::from(other),
        })?;

    info!(
        application_id = stored.id,
        role = stored.role.as_str(),
        needs_assessment = stored.needs_assessment,
        "Talent application received"
    );
    let delivery: PendingDelivery = application_delivery(&stored);
    Ok(ApiResult::new(
        ApplicationSubmittedResponse {
            message: String::from("Application submitted successfully"),
            application_id: stored.id,
            needs_assessment: stored.needs_assessment,
        },
        delivery,
    ))
}

/// Lists applications, optionally filtered by status and role.
///
/// # Errors
///
/// Returns an error if a filter is not a known value.
pub fn list_applications(
    persistence: &Persistence,
    query: &ApplicationListQuery,
) -> Result<ApplicationListResponse, ApiError> {
    let status: Option<ApplicationStatus> = parse_filter(
        "status",
        query.status.as_deref(),
        ApplicationStatus::parse_field,
    )?;
    let role: Option<TalentRole> =
        parse_filter("role", query.role.as_deref(), TalentRole::parse_field)?;
    let applications: Vec<TalentApplication> = persistence.list_applications(status, role)?;
    debug!(count = applications.len(), "Listed applications");

    Ok(ApplicationListResponse {
        count: applications.len(),
        applications,
    })
}

/// Returns an application with its assessments, interviews and activity.
///
/// # Errors
///
/// Returns an error if the application does not exist.
pub fn get_application(
    persistence: &Persistence,
    application_id: i64,
) -> Result<ApplicationDetailResponse, ApiError> {
    let application: TalentApplication = load_application(persistence, application_id)?;
    let assessments: Vec<TalentAssessment> = persistence.list_assessments(application_id)?;
    let interviews: Vec<TalentInterview> = persistence.list_interviews(application_id)?;
    let activity: Vec<ActivityRecord> =
        persistence.list_activity(EntityKind::TalentApplication, application_id)?;

    Ok(ApplicationDetailResponse {
        application,
        assessments,
        interviews,
        activity,
    })
}

/// Records an admin decision on an application.
///
/// # Errors
///
/// Returns an error if the update is invalid, the application does not
/// exist, or the lifecycle refuses the change.
pub fn update_application_status(
    persistence: &Persistence,
    application_id: i64,
    draft: &StatusUpdateDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<ApplicationResponse>, ApiError> {
    let update: StatusUpdate = draft.validate().map_err(translate_domain_error)?;
    let application: TalentApplication = load_application(persistence, application_id)?;
    let transition: Transition<ApplicationStatus> =
        plan_application_status(&application, &update, admin.to_actor())
            .map_err(translate_core_error)?;
    let updated: TalentApplication = persistence.update_application_status(
        application_id,
        &update,
        &transition,
        admin.admin_id,
    )?;

    info!(
        application_id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        admin_id = admin.admin_id,
        "Application status updated"
    );
    Ok(ApiResult::new(
        ApplicationResponse {
            application: updated,
        },
        transition.delivery,
    ))
}

/// Assigns an assessment task to an applicant.
///
/// # Errors
///
/// Returns an error if the task is invalid, the application does not
/// exist, or the application is already decided.
pub fn assign_assessment(
    persistence: &Persistence,
    application_id: i64,
    draft: &AssessmentDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<TalentAssessment>, ApiError> {
    let assessment: NewAssessment = draft.validate().map_err(translate_domain_error)?;
    let application: TalentApplication = load_application(persistence, application_id)?;
    let plan: AssessmentPlan = plan_assessment(
        &application,
        &assessment,
        admin.to_actor(),
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;
    let stored: TalentAssessment =
        persistence.assign_assessment(application_id, &assessment, &plan, admin.admin_id)?;

    info!(
        application_id,
        deadline = %stored.deadline,
        admin_id = admin.admin_id,
        "Assessment assigned"
    );
    Ok(ApiResult::new(stored, plan.transition.delivery))
}

/// Schedules an interview with an applicant.
///
/// # Errors
///
/// Returns an error if the schedule is invalid, the application does not
/// exist, or the application is already decided.
pub fn schedule_interview(
    persistence: &Persistence,
    application_id: i64,
    draft: &InterviewDraft,
    admin: &AuthenticatedAdmin,
) -> Result<ApiResult<TalentInterview>, ApiError> {
    let interview: NewInterview = draft.validate().map_err(translate_domain_error)?;
    let application: TalentApplication = load_application(persistence, application_id)?;
    let plan: InterviewPlan =
        plan_interview(&application, &interview, admin.to_actor()).map_err(translate_core_error)?;
    let stored: TalentInterview =
        persistence.schedule_interview(application_id, &interview, &plan, admin.admin_id)?;

    info!(
        application_id,
        scheduled_at = %stored.scheduled_at,
        admin_id = admin.admin_id,
        "Interview scheduled"
    );
    Ok(ApiResult::new(stored, plan.transition.delivery))
}
