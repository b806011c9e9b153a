// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain records.
//!
//! Enumerations are stored as their `as_str` text and money as integer
//! cents; a row that no longer parses is reported as
//! `PersistenceError::InvalidStoredValue` rather than silently coerced.

use diesel::prelude::*;
use planmorph_audit::{ActivityAction, ActivityRecord, Actor, ActorType};
use planmorph_domain::{
    ApplicationStatus, Availability, BudgetRange, CostBreakdown, EntityKind, ExperienceLevel,
    InterviewType, Money, NotableProject, PlanType, ProjectRequest, ProjectType, Quotation,
    RecurringPeriod, RequestStatus, SenderType, SupportClient, SupportTicket, TalentApplication,
    TalentAssessment, TalentInterview, TalentRole, TicketCategory, TicketMessage, TicketNumber,
    TicketPriority, TicketStatus,
};

use crate::diesel_schema::{
    activity_log, admins, password_resets, project_requests, quotations, sessions,
    support_clients, support_tickets, talent_applications, talent_assessments, talent_interviews,
    ticket_messages,
};
use crate::error::PersistenceError;

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminData {
    pub admin_id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A bearer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub token: String,
    pub admin_id: i64,
    pub created_at: String,
    pub expires_at: String,
}

/// A password reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetData {
    pub reset_id: i64,
    pub admin_id: i64,
    pub expires_at: String,
    pub used_at: Option<String>,
}

/// A ticket message awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketMessage {
    pub sender_type: SenderType,
    pub sender_id: Option<i64>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub message: String,
    pub is_internal_note: bool,
}

fn to_u32(field: &str, value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("{field}: {value}")))
}

fn to_u16(field: &str, value: i32) -> Result<u16, PersistenceError> {
    u16::try_from(value)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("{field}: {value}")))
}

fn string_list(field: &str, text: &str) -> Result<Vec<String>, PersistenceError> {
    serde_json::from_str(text)
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("{field}: {e}")))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = admins)]
pub(crate) struct AdminRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    created_at: String,
    last_login_at: Option<String>,
}

impl From<AdminRow> for AdminData {
    fn from(row: AdminRow) -> Self {
        Self {
            admin_id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    id: i64,
    token: String,
    admin_id: i64,
    created_at: String,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.id,
            token: row.token,
            admin_id: row.admin_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = password_resets)]
pub(crate) struct PasswordResetRow {
    id: i64,
    admin_id: i64,
    expires_at: String,
    used_at: Option<String>,
}

impl From<PasswordResetRow> for PasswordResetData {
    fn from(row: PasswordResetRow) -> Self {
        Self {
            reset_id: row.id,
            admin_id: row.admin_id,
            expires_at: row.expires_at,
            used_at: row.used_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = project_requests)]
pub(crate) struct ProjectRequestRow {
    id: i64,
    client_name: String,
    client_email: String,
    client_phone: String,
    company_name: Option<String>,
    project_type: String,
    requirements: String,
    budget_range: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProjectRequestRow> for ProjectRequest {
    type Error = PersistenceError;

    fn try_from(row: ProjectRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            company_name: row.company_name,
            project_type: row.project_type.parse::<ProjectType>()?,
            requirements: row.requirements,
            budget_range: row
                .budget_range
                .as_deref()
                .map(str::parse::<BudgetRange>)
                .transpose()?,
            status: row.status.parse::<RequestStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = quotations)]
pub(crate) struct QuotationRow {
    id: i64,
    request_id: i64,
    total_cost_cents: i64,
    timeline_weeks: i32,
    cost_breakdown: Option<String>,
    notes: Option<String>,
    recurring_cost_cents: i64,
    recurring_period: String,
    recurring_description: Option<String>,
    sent_at: String,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = PersistenceError;

    fn try_from(row: QuotationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            request_id: row.request_id,
            total_cost: Money::from_cents("total_cost_cents", row.total_cost_cents)?,
            timeline_weeks: to_u16("timeline_weeks", row.timeline_weeks)?,
            cost_breakdown: row
                .cost_breakdown
                .as_deref()
                .map(CostBreakdown::from_json)
                .transpose()?,
            notes: row.notes,
            recurring_cost: Money::from_cents("recurring_cost_cents", row.recurring_cost_cents)?,
            recurring_period: row.recurring_period.parse::<RecurringPeriod>()?,
            recurring_description: row.recurring_description,
            sent_at: row.sent_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = support_clients)]
pub(crate) struct SupportClientRow {
    id: i64,
    full_name: String,
    email: String,
    phone: Option<String>,
    company_name: Option<String>,
    plan_type: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SupportClientRow> for SupportClient {
    type Error = PersistenceError;

    fn try_from(row: SupportClientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            company_name: row.company_name,
            plan_type: row.plan_type.parse::<PlanType>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = support_tickets)]
pub(crate) struct SupportTicketRow {
    id: i64,
    ticket_number: String,
    client_id: i64,
    client_name: String,
    client_email: String,
    client_phone: Option<String>,
    subject: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    client_plan: String,
    response_sla_hours: i32,
    assigned_to: Option<i64>,
    assigned_at: Option<String>,
    resolution_notes: Option<String>,
    resolved_at: Option<String>,
    resolved_by: Option<i64>,
    closed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SupportTicketRow> for SupportTicket {
    type Error = PersistenceError;

    fn try_from(row: SupportTicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            ticket_number: TicketNumber::parse(&row.ticket_number)?,
            client_id: row.client_id,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            subject: row.subject,
            description: row.description,
            category: row.category.parse::<TicketCategory>()?,
            priority: row.priority.parse::<TicketPriority>()?,
            status: row.status.parse::<TicketStatus>()?,
            client_plan: row.client_plan.parse::<PlanType>()?,
            response_sla_hours: to_u32("response_sla_hours", row.response_sla_hours)?,
            assigned_to: row.assigned_to,
            assigned_at: row.assigned_at,
            resolution_notes: row.resolution_notes,
            resolved_at: row.resolved_at,
            resolved_by: row.resolved_by,
            closed_at: row.closed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = ticket_messages)]
pub(crate) struct TicketMessageRow {
    id: i64,
    ticket_id: i64,
    sender_type: String,
    sender_id: Option<i64>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    message: String,
    is_internal_note: i32,
    created_at: String,
}

impl TryFrom<TicketMessageRow> for TicketMessage {
    type Error = PersistenceError;

    fn try_from(row: TicketMessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            ticket_id: row.ticket_id,
            sender_type: row.sender_type.parse::<SenderType>()?,
            sender_id: row.sender_id,
            sender_name: row.sender_name,
            sender_email: row.sender_email,
            message: row.message,
            is_internal_note: row.is_internal_note != 0,
            created_at: row.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = activity_log)]
pub(crate) struct ActivityRow {
    id: i64,
    entity_kind: String,
    entity_id: i64,
    action: String,
    actor_type: String,
    actor_id: Option<i64>,
    actor_name: Option<String>,
    details: Option<String>,
    created_at: String,
}

impl TryFrom<ActivityRow> for ActivityRecord {
    type Error = PersistenceError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            entity_kind: row.entity_kind.parse::<EntityKind>()?,
            entity_id: row.entity_id,
            action: row.action.parse::<ActivityAction>()?,
            actor: Actor {
                actor_type: row.actor_type.parse::<ActorType>()?,
                id: row.actor_id,
                name: row.actor_name,
            },
            details: row
                .details
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = talent_applications)]
pub(crate) struct TalentApplicationRow {
    id: i64,
    full_name: String,
    email: String,
    phone: Option<String>,
    location: Option<String>,
    role: String,
    specialization: String,
    experience_level: String,
    years_of_experience: Option<i32>,
    portfolio_url: Option<String>,
    github_url: Option<String>,
    linkedin_url: Option<String>,
    behance_url: Option<String>,
    dribbble_url: Option<String>,
    skills: String,
    technologies: String,
    notable_projects: String,
    previous_companies: Option<String>,
    why_join: String,
    availability: String,
    expected_salary_range: Option<String>,
    status: String,
    needs_assessment: i32,
    admin_notes: Option<String>,
    reviewed_by: Option<i64>,
    reviewed_at: Option<String>,
    assessment_task: Option<String>,
    assessment_deadline: Option<String>,
    interview_scheduled_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TalentApplicationRow> for TalentApplication {
    type Error = PersistenceError;

    fn try_from(row: TalentApplicationRow) -> Result<Self, Self::Error> {
        let notable_projects: Vec<NotableProject> = serde_json::from_str(&row.notable_projects)
            .map_err(|e| PersistenceError::InvalidStoredValue(format!("notable_projects: {e}")))?;
        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            location: row.location,
            role: row.role.parse::<TalentRole>()?,
            specialization: row.specialization,
            experience_level: row.experience_level.parse::<ExperienceLevel>()?,
            years_of_experience: row
                .years_of_experience
                .map(|years| to_u32("years_of_experience", years))
                .transpose()?,
            portfolio_url: row.portfolio_url,
            github_url: row.github_url,
            linkedin_url: row.linkedin_url,
            behance_url: row.behance_url,
            dribbble_url: row.dribbble_url,
            skills: string_list("skills", &row.skills)?,
            technologies: string_list("technologies", &row.technologies)?,
            notable_projects,
            previous_companies: row.previous_companies,
            why_join: row.why_join,
            availability: row.availability.parse::<Availability>()?,
            expected_salary_range: row.expected_salary_range,
            status: row.status.parse::<ApplicationStatus>()?,
            needs_assessment: row.needs_assessment != 0,
            admin_notes: row.admin_notes,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            assessment_task: row.assessment_task,
            assessment_deadline: row.assessment_deadline,
            interview_scheduled_at: row.interview_scheduled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = talent_assessments)]
pub(crate) struct TalentAssessmentRow {
    id: i64,
    application_id: i64,
    task_title: String,
    task_description: String,
    task_requirements: Option<String>,
    task_type: Option<String>,
    deadline: String,
    assigned_by: Option<i64>,
    created_at: String,
}

impl From<TalentAssessmentRow> for TalentAssessment {
    fn from(row: TalentAssessmentRow) -> Self {
        Self {
            id: row.id,
            application_id: row.application_id,
            task_title: row.task_title,
            task_description: row.task_description,
            task_requirements: row.task_requirements,
            task_type: row.task_type,
            deadline: row.deadline,
            assigned_by: row.assigned_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = talent_interviews)]
pub(crate) struct TalentInterviewRow {
    id: i64,
    application_id: i64,
    interview_type: String,
    scheduled_at: String,
    duration_minutes: i32,
    meeting_link: Option<String>,
    location: Option<String>,
    notes: Option<String>,
    interviewer_id: Option<i64>,
    created_at: String,
}

impl TryFrom<TalentInterviewRow> for TalentInterview {
    type Error = PersistenceError;

    fn try_from(row: TalentInterviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            application_id: row.application_id,
            interview_type: row.interview_type.parse::<InterviewType>()?,
            scheduled_at: row.scheduled_at,
            duration_minutes: to_u16("duration_minutes", row.duration_minutes)?,
            meeting_link: row.meeting_link,
            location: row.location,
            notes: row.notes,
            interviewer_id: row.interviewer_id,
            created_at: row.created_at,
        })
    }
}
