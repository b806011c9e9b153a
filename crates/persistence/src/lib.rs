// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the `PlanMorph` service backend.
//!
//! This crate stores project requests, support tickets, talent
//! applications, their activity log, and the admin identity tables in
//! `SQLite` through Diesel.
//!
//! ## Connections
//!
//! A [`Persistence`] owns an r2d2 pool. Each call borrows one connection
//! for its duration; every multi-row write runs in one transaction on that
//! connection. Cloning a `Persistence` shares the pool.
//!
//! ## Migrations
//!
//! Migrations live in `migrations/`, are embedded at compile time, and run
//! when the adapter is constructed. Foreign key enforcement is verified at
//! startup; a connection without it is refused.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives each caller its own named,
//! shared-cache in-memory database, so tests are isolated without touching
//! the filesystem.

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

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use planmorph::{AssessmentPlan, InterviewPlan, TicketUpdate, Transition};
use planmorph_audit::{ActivityEvent, ActivityRecord};
use planmorph_domain::{
    ApplicationStatus, EntityKind, NewApplication, NewAssessment, NewInterview,
    NewProjectRequest, NewQuotation, NewTicket, PlanType, ProjectRequest, Quotation,
    QuotationDetail, RequestStatus, StatusUpdate, SupportClient, SupportTicket, TalentApplication,
    TalentAssessment, TalentInterview, TalentRole, TicketMessage, TicketNumber, TicketPriority,
    TicketStats, TicketStatus, format_timestamp,
};
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::backend::{DbConnection, DbPool};

pub use data_models::{AdminData, NewTicketMessage, PasswordResetData, SessionData};
pub use error::PersistenceError;
pub use mutations::support::TICKET_NUMBER_ATTEMPTS;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Connections opened for an in-memory database.
const IN_MEMORY_POOL_SIZE: u32 = 4;

/// How far back the dashboard's "recent tickets" count looks.
const RECENT_TICKET_DAYS: i64 = 7;

/// The current time as a stored timestamp.
fn now() -> Result<String, PersistenceError> {
    stamp(OffsetDateTime::now_utc())
}

fn stamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(format_timestamp(at)?)
}

/// Persistence adapter over a pooled `SQLite` database.
#[derive(Clone)]
pub struct Persistence {
    pool: DbPool,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:planmorph_mem_{db_id}?mode=memory&cache=shared");

        let persistence: Self = Self {
            pool: backend::sqlite::build_pool(&shared_memory_url, IN_MEMORY_POOL_SIZE)?,
        };
        persistence.initialize(false)?;
        Ok(persistence)
    }

    /// Creates a persistence adapter over a database file, creating it if
    /// needed.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    /// * `pool_size` - The maximum number of pooled connections
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P, pool_size: u32) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let persistence: Self = Self {
            pool: backend::sqlite::build_pool(path_str, pool_size)?,
        };
        persistence.initialize(true)?;
        Ok(persistence)
    }

    fn initialize(&self, wal: bool) -> Result<(), PersistenceError> {
        let mut conn: DbConnection = self.connection()?;
        if wal {
            backend::sqlite::enable_wal_mode(&mut conn)?;
        }
        backend::sqlite::run_migrations(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;
        info!("Database initialized");
        Ok(())
    }

    fn connection(&self) -> Result<DbConnection, PersistenceError> {
        Ok(self.pool.get()?)
    }

    // ========================================================================
    // Admins, sessions, password resets
    // ========================================================================

    /// Creates an admin account from an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is taken.
    pub fn create_admin(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::admins::create_admin(&mut *self.connection()?, email, name, password_hash, &now()?)
    }

    /// Counts admin accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_admins(&self) -> Result<i64, PersistenceError> {
        queries::admins::count_admins(&mut *self.connection()?)
    }

    /// Looks up an admin by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin_by_email(&mut *self.connection()?, email)
    }

    /// Looks up an admin by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_admin(&self, admin_id: i64) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin(&mut *self.connection()?, admin_id)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&self, admin_id: i64) -> Result<(), PersistenceError> {
        mutations::admins::update_last_login(&mut *self.connection()?, admin_id, &now()?)
    }

    /// Stores a session that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &self,
        token: &str,
        admin_id: i64,
        ttl: Duration,
    ) -> Result<SessionData, PersistenceError> {
        let created: OffsetDateTime = OffsetDateTime::now_utc();
        let created_at: String = stamp(created)?;
        let expires_at: String = stamp(created + ttl)?;
        let session_id: i64 = mutations::admins::create_session(
            &mut *self.connection()?,
            token,
            admin_id,
            &created_at,
            &expires_at,
        )?;

        Ok(SessionData {
            session_id,
            token: token.to_string(),
            admin_id,
            created_at,
            expires_at,
        })
    }

    /// Looks up a session by token without checking expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(&self, token: &str) -> Result<Option<SessionData>, PersistenceError> {
        queries::admins::get_session_by_token(&mut *self.connection()?, token)
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&self, token: &str) -> Result<(), PersistenceError> {
        mutations::admins::delete_session(&mut *self.connection()?, token)
    }

    /// Deletes every expired session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&self) -> Result<usize, PersistenceError> {
        mutations::admins::delete_expired_sessions(&mut *self.connection()?, &now()?)
    }

    /// Stores a password reset token that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_password_reset(
        &self,
        token: &str,
        admin_id: i64,
        ttl: Duration,
    ) -> Result<(), PersistenceError> {
        let created: OffsetDateTime = OffsetDateTime::now_utc();
        mutations::admins::create_password_reset(
            &mut *self.connection()?,
            token,
            admin_id,
            &stamp(created)?,
            &stamp(created + ttl)?,
        )
    }

    /// Looks up a password reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_password_reset(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetData>, PersistenceError> {
        queries::admins::get_password_reset(&mut *self.connection()?, token)
    }

    /// Consumes a reset token, sets the new hash, and revokes the admin's
    /// sessions. Returns the admin id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `ResetTokenExpired`, or `ResetTokenUsed` when the
    /// token cannot be used.
    pub fn complete_password_reset(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::admins::complete_password_reset(
            &mut *self.connection()?,
            token,
            password_hash,
            &now()?,
        )
    }

    // ========================================================================
    // Project requests
    // ========================================================================

    /// Stores a new project request.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn insert_project_request(
        &self,
        request: &NewProjectRequest,
        event: &ActivityEvent,
    ) -> Result<ProjectRequest, PersistenceError> {
        mutations::project_requests::insert_project_request(
            &mut *self.connection()?,
            request,
            event,
            &now()?,
        )
    }

    /// Loads a project request.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_project_request(
        &self,
        request_id: i64,
    ) -> Result<Option<ProjectRequest>, PersistenceError> {
        queries::project_requests::get_project_request(&mut *self.connection()?, request_id)
    }

    /// Lists project requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_project_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<ProjectRequest>, PersistenceError> {
        queries::project_requests::list_project_requests(&mut *self.connection()?, status)
    }

    /// Stores a quotation and marks its request quoted.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn insert_quotation(
        &self,
        quotation: &NewQuotation,
        transition: &Transition<RequestStatus>,
    ) -> Result<Quotation, PersistenceError> {
        mutations::project_requests::insert_quotation(
            &mut *self.connection()?,
            quotation,
            transition,
            &now()?,
        )
    }

    /// Applies an admin status edit to a request.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn update_request_status(
        &self,
        request_id: i64,
        transition: &Transition<RequestStatus>,
    ) -> Result<ProjectRequest, PersistenceError> {
        mutations::project_requests::update_request_status(
            &mut *self.connection()?,
            request_id,
            transition,
            &now()?,
        )
    }

    /// Deletes a request and its quotations. Returns false if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_project_request(&self, request_id: i64) -> Result<bool, PersistenceError> {
        mutations::project_requests::delete_project_request(&mut *self.connection()?, request_id)
    }

    /// Lists a request's quotations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_quotations(&self, request_id: i64) -> Result<Vec<Quotation>, PersistenceError> {
        queries::project_requests::list_quotations(&mut *self.connection()?, request_id)
    }

    /// Lists every quotation, newest first, with request contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_quotations(&self) -> Result<Vec<QuotationDetail>, PersistenceError> {
        queries::project_requests::list_all_quotations(&mut *self.connection()?)
    }

    /// Loads one quotation with its request's contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_quotation(
        &self,
        quotation_id: i64,
    ) -> Result<Option<QuotationDetail>, PersistenceError> {
        queries::project_requests::get_quotation(&mut *self.connection()?, quotation_id)
    }

    /// Deletes a quotation, logging it on its request. Returns the request
    /// id, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_quotation(
        &self,
        quotation_id: i64,
        event: &ActivityEvent,
    ) -> Result<Option<i64>, PersistenceError> {
        mutations::project_requests::delete_quotation(
            &mut *self.connection()?,
            quotation_id,
            event,
            &now()?,
        )
    }

    // ========================================================================
    // Support tickets
    // ========================================================================

    /// Stores a ticket, creating its client on first contact.
    ///
    /// # Errors
    ///
    /// Returns `TicketNumberUnavailable` if numbering kept colliding, or a
    /// database error.
    pub fn submit_ticket(&self, ticket: &NewTicket) -> Result<SupportTicket, PersistenceError> {
        mutations::support::submit_ticket(&mut *self.connection()?, ticket, &now()?)
    }

    /// Loads a ticket by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket(&self, ticket_id: i64) -> Result<Option<SupportTicket>, PersistenceError> {
        queries::support::get_ticket(&mut *self.connection()?, ticket_id)
    }

    /// Loads a ticket by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket_by_number(
        &self,
        ticket_number: TicketNumber,
    ) -> Result<Option<SupportTicket>, PersistenceError> {
        queries::support::get_ticket_by_number(&mut *self.connection()?, ticket_number)
    }

    /// Lists tickets, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets(
        &self,
        status: Option<TicketStatus>,
        priority: Option<TicketPriority>,
    ) -> Result<Vec<SupportTicket>, PersistenceError> {
        queries::support::list_tickets(&mut *self.connection()?, status, priority)
    }

    /// Lists a ticket's messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ticket_messages(
        &self,
        ticket_id: i64,
        include_internal: bool,
    ) -> Result<Vec<TicketMessage>, PersistenceError> {
        queries::support::list_ticket_messages(&mut *self.connection()?, ticket_id, include_internal)
    }

    /// Appends a message and applies the status change it implies.
    ///
    /// # Errors
    ///
    /// Returns `TransitionRefused` if the stored status no longer accepts
    /// the message, or a database error.
    pub fn add_ticket_message(
        &self,
        ticket_id: i64,
        message: &NewTicketMessage,
        transition: &Transition<TicketStatus>,
    ) -> Result<TicketMessage, PersistenceError> {
        mutations::support::add_ticket_message(
            &mut *self.connection()?,
            ticket_id,
            message,
            transition,
            &now()?,
        )
    }

    /// Applies a planned admin update.
    ///
    /// `at` must be the time the update was planned with, so the stamps it
    /// carries agree with `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn update_ticket(
        &self,
        ticket_id: i64,
        update: &TicketUpdate,
        at: OffsetDateTime,
    ) -> Result<SupportTicket, PersistenceError> {
        mutations::support::update_ticket(&mut *self.connection()?, ticket_id, update, &stamp(at)?)
    }

    /// Loads a support client.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_support_client(
        &self,
        client_id: i64,
    ) -> Result<Option<SupportClient>, PersistenceError> {
        queries::support::get_support_client(&mut *self.connection()?, client_id)
    }

    /// Loads a support client by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_support_client_by_email(
        &self,
        email: &str,
    ) -> Result<Option<SupportClient>, PersistenceError> {
        queries::support::get_support_client_by_email(&mut *self.connection()?, email)
    }

    /// Changes a client's plan. Existing tickets keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such client.
    pub fn set_client_plan(
        &self,
        client_id: i64,
        plan: PlanType,
    ) -> Result<SupportClient, PersistenceError> {
        mutations::support::set_client_plan(&mut *self.connection()?, client_id, plan, &now()?)
    }

    /// Aggregates ticket counts for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if a count fails.
    pub fn ticket_stats(&self) -> Result<TicketStats, PersistenceError> {
        let cutoff: String = stamp(OffsetDateTime::now_utc() - Duration::days(RECENT_TICKET_DAYS))?;
        queries::support::ticket_stats(&mut *self.connection()?, &cutoff)
    }

    // ========================================================================
    // Talent applications
    // ========================================================================

    /// Stores a new application.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is already on file.
    pub fn insert_application(
        &self,
        application: &NewApplication,
        event: &ActivityEvent,
    ) -> Result<TalentApplication, PersistenceError> {
        mutations::talent::insert_application(&mut *self.connection()?, application, event, &now()?)
    }

    /// Loads an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_application(
        &self,
        application_id: i64,
    ) -> Result<Option<TalentApplication>, PersistenceError> {
        queries::talent::get_application(&mut *self.connection()?, application_id)
    }

    /// Lists applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
        role: Option<TalentRole>,
    ) -> Result<Vec<TalentApplication>, PersistenceError> {
        queries::talent::list_applications(&mut *self.connection()?, status, role)
    }

    /// Stores an assessment and moves the application to
    /// `assessment_assigned`.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn assign_assessment(
        &self,
        application_id: i64,
        assessment: &NewAssessment,
        plan: &AssessmentPlan,
        admin_id: i64,
    ) -> Result<TalentAssessment, PersistenceError> {
        mutations::talent::assign_assessment(
            &mut *self.connection()?,
            application_id,
            assessment,
            plan,
            admin_id,
            &now()?,
        )
    }

    /// Stores an interview and moves the application to
    /// `interview_scheduled`.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn schedule_interview(
        &self,
        application_id: i64,
        interview: &NewInterview,
        plan: &InterviewPlan,
        admin_id: i64,
    ) -> Result<TalentInterview, PersistenceError> {
        mutations::talent::schedule_interview(
            &mut *self.connection()?,
            application_id,
            interview,
            plan,
            admin_id,
            &now()?,
        )
    }

    /// Records an admin decision on an application.
    ///
    /// # Errors
    ///
    /// Returns `StatusChanged` on a concurrent status change, or a database
    /// error.
    pub fn update_application_status(
        &self,
        application_id: i64,
        update: &StatusUpdate,
        transition: &Transition<ApplicationStatus>,
        admin_id: i64,
    ) -> Result<TalentApplication, PersistenceError> {
        mutations::talent::update_application_status(
            &mut *self.connection()?,
            application_id,
            update,
            transition,
            admin_id,
            &now()?,
        )
    }

    /// Lists an application's assessments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_assessments(
        &self,
        application_id: i64,
    ) -> Result<Vec<TalentAssessment>, PersistenceError> {
        queries::talent::list_assessments(&mut *self.connection()?, application_id)
    }

    /// Lists an application's interviews by scheduled time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_interviews(
        &self,
        application_id: i64,
    ) -> Result<Vec<TalentInterview>, PersistenceError> {
        queries::talent::list_interviews(&mut *self.connection()?, application_id)
    }

    // ========================================================================
    // Activity
    // ========================================================================

    /// Lists the activity recorded against an entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_activity(
        &self,
        entity: EntityKind,
        entity_id: i64,
    ) -> Result<Vec<ActivityRecord>, PersistenceError> {
        queries::activity::list_activity(&mut *self.connection()?, entity, entity_id)
    }
}
