// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Submitted entities arrive as the domain drafts (`ProjectRequestDraft`,
//! `TicketDraft` and so on); the types here cover everything else.

use planmorph_audit::ActivityRecord;
use planmorph_domain::{
    PlanType, ProjectRequest, Quotation, QuotationDetail, RequestStatus, SenderType, SupportClient, SupportTicket,
    TalentApplication, TalentAssessment, TalentInterview, TicketCategory, TicketMessage,
    TicketNumber, TicketPriority, TicketStatus,
};
use planmorph_notify::DeliveryOutcome;
use planmorph_persistence::AdminData;

// ============================================================================
// Identity
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The admin email.
    pub email: String,
    /// The admin password.
    pub password: String,
}

/// Public view of an admin account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdminInfo {
    /// The admin account id.
    pub id: i64,
    /// The admin email.
    pub email: String,
    /// The admin display name.
    pub name: String,
    /// When the account was created.
    pub created_at: String,
    /// The last successful login, if any.
    pub last_login_at: Option<String>,
}

impl From<&AdminData> for AdminInfo {
    fn from(admin: &AdminData) -> Self {
        Self {
            id: admin.admin_id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            created_at: admin.created_at.clone(),
            last_login_at: admin.last_login_at.clone(),
        }
    }
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The bearer token (opaque).
    pub token: String,
    /// Session expiration timestamp (RFC 3339).
    pub expires_at: String,
    /// The logged-in admin.
    pub admin: AdminInfo,
}

/// API request to create another admin account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterAdminRequest {
    /// The new admin's email.
    pub email: String,
    /// The new admin's display name.
    pub name: String,
    /// The initial password.
    pub password: String,
}

/// API response for a created admin account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterAdminResponse {
    /// The created admin.
    pub admin: AdminInfo,
    /// A success message.
    pub message: String,
}

/// API request to start a password reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PasswordResetRequest {
    /// The account email.
    pub email: String,
}

/// API request to finish a password reset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PasswordResetConfirm {
    /// The token from the reset email.
    pub token: String,
    /// The new password.
    pub new_password: String,
}

/// A response that only carries a message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    /// A human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new `MessageResponse`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Project requests and quotations
// ============================================================================

/// Query parameters for listing project requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RequestListQuery {
    /// Only return requests in this status.
    pub status: Option<String>,
}

/// API request to change a project request's status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestStatusUpdate {
    /// The new status.
    pub status: String,
}

/// API response carrying a single project request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectRequestResponse {
    /// The request.
    pub request: ProjectRequest,
    /// A success message.
    pub message: String,
}

/// API response listing project requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectRequestListResponse {
    /// The requests, newest first.
    pub requests: Vec<ProjectRequest>,
    /// The number of requests returned.
    pub count: usize,
}

/// API response for the admin view of one project request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectRequestDetailResponse {
    /// The request.
    pub request: ProjectRequest,
    /// Every quotation issued for it, newest first.
    pub quotations: Vec<Quotation>,
    /// The activity log, newest first.
    pub activity: Vec<ActivityRecord>,
}

/// API response for an issued quotation.
///
/// The quotation is stored whether or not the email went out;
/// `email_sent` tells the operator when to follow up by hand.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuotationResponse {
    /// A success message.
    pub message: String,
    /// The stored quotation.
    pub quote: Quotation,
    /// The request's status after quoting.
    pub request_status: RequestStatus,
    /// Whether the quotation email was delivered.
    pub email_sent: bool,
    /// Why delivery failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

impl QuotationResponse {
    /// Builds the response from a stored quotation and its delivery outcome.
    #[must_use]
    pub fn new(quote: Quotation, outcome: &DeliveryOutcome) -> Self {
        let email_sent: bool = outcome.delivered();
        let message: &str = if email_sent {
            "Quotation created and sent successfully!"
        } else {
            "Quotation created but email failed to send. Please send manually."
        };
        Self {
            message: message.to_string(),
            quote,
            request_status: RequestStatus::Quoted,
            email_sent,
            email_error: outcome.error().map(str::to_string),
        }
    }
}

/// API response listing a request's quotations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuotationListResponse {
    /// The request the quotations belong to.
    pub request_id: i64,
    /// The quotations, newest first.
    pub quotations: Vec<Quotation>,
}

/// API response for a single quotation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QuotationDetailResponse {
    /// The quotation with its request's contact details.
    pub quote: QuotationDetail,
}

/// API response listing every quotation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AllQuotationsResponse {
    /// The quotations, newest first.
    pub quotes: Vec<QuotationDetail>,
    /// How many quotations exist.
    pub total: usize,
}

// ============================================================================
// Support tickets
// ============================================================================

/// The ticket summary returned when a ticket is opened.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    /// The ticket id.
    pub id: i64,
    /// The human-readable ticket number.
    pub ticket_number: TicketNumber,
    /// The initial status.
    pub status: TicketStatus,
    /// The response target snapshotted from the client's plan.
    pub sla_hours: u32,
}

/// API response for an opened ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketCreatedResponse {
    /// Always true; kept for clients of the public form.
    pub success: bool,
    /// A success message.
    pub message: String,
    /// The created ticket.
    pub ticket: TicketSummary,
}

/// Query parameters for the public ticket lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct TicketLookupQuery {
    /// The email the ticket was opened with.
    #[serde(default)]
    pub email: String,
}

/// The client-facing view of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublicTicket {
    pub ticket_number: TicketNumber,
    pub subject: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub response_sla_hours: u32,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&SupportTicket> for PublicTicket {
    fn from(ticket: &SupportTicket) -> Self {
        Self {
            ticket_number: ticket.ticket_number,
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            category: ticket.category,
            priority: ticket.priority,
            status: ticket.status,
            response_sla_hours: ticket.response_sla_hours,
            resolution_notes: ticket.resolution_notes.clone(),
            resolved_at: ticket.resolved_at.clone(),
            closed_at: ticket.closed_at.clone(),
            created_at: ticket.created_at.clone(),
            updated_at: ticket.updated_at.clone(),
        }
    }
}

/// A message as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublicMessage {
    pub sender_type: SenderType,
    pub sender_name: Option<String>,
    pub message: String,
    pub created_at: String,
}

impl From<&TicketMessage> for PublicMessage {
    fn from(message: &TicketMessage) -> Self {
        Self {
            sender_type: message.sender_type,
            sender_name: message.sender_name.clone(),
            message: message.message.clone(),
            created_at: message.created_at.clone(),
        }
    }
}

/// API response for the public ticket lookup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublicTicketResponse {
    /// The ticket.
    pub ticket: PublicTicket,
    /// Messages visible to the client, oldest first.
    pub messages: Vec<PublicMessage>,
}

/// API response for a message added to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketMessageResponse {
    /// Always true.
    pub success: bool,
    /// A success message.
    pub message: String,
    /// The stored message.
    pub data: TicketMessage,
}

/// Query parameters for the admin ticket list.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct TicketListQuery {
    /// Only return tickets in this status.
    pub status: Option<String>,
    /// Only return tickets with this priority.
    pub priority: Option<String>,
}

/// API response listing tickets.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketListResponse {
    /// The tickets, newest first.
    pub tickets: Vec<SupportTicket>,
    /// The number of tickets returned.
    pub count: usize,
}

/// API response for the admin view of one ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdminTicketResponse {
    /// The ticket.
    pub ticket: SupportTicket,
    /// The client who opened it.
    pub client: Option<SupportClient>,
    /// Every message, internal notes included, oldest first.
    pub messages: Vec<TicketMessage>,
    /// The activity log, newest first.
    pub activity: Vec<ActivityRecord>,
}

/// API response carrying a single ticket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketResponse {
    /// The ticket after the change.
    pub ticket: SupportTicket,
}

/// API request to change a client's service plan.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientPlanUpdate {
    /// The new plan.
    pub plan_type: String,
}

/// API response carrying a support client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SupportClientResponse {
    /// The client after the change.
    pub client: SupportClient,
    /// The plan new tickets will snapshot.
    pub plan_type: PlanType,
}

// ============================================================================
// Talent applications
// ============================================================================

/// API response for a received application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmittedResponse {
    /// A success message.
    pub message: String,
    /// The application id.
    pub application_id: i64,
    /// Whether the applicant will be asked to complete an assessment.
    pub needs_assessment: bool,
}

/// Query parameters for listing applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ApplicationListQuery {
    /// Only return applications in this status.
    pub status: Option<String>,
    /// Only return applications for this role.
    pub role: Option<String>,
}

/// API response listing applications.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplicationListResponse {
    /// The applications, newest first.
    pub applications: Vec<TalentApplication>,
    /// The number of applications returned.
    pub count: usize,
}

/// API response for the admin view of one application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplicationDetailResponse {
    /// The application.
    pub application: TalentApplication,
    /// Assessments assigned to the applicant, newest first.
    pub assessments: Vec<TalentAssessment>,
    /// Interviews scheduled with the applicant, newest first.
    pub interviews: Vec<TalentInterview>,
    /// The activity log, newest first.
    pub activity: Vec<ActivityRecord>,
}

/// API response carrying a single application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplicationResponse {
    /// The application after the change.
    pub application: TalentApplication,
}
