// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project requests submitted by prospective clients.
//!
//! A request starts `Pending`. Issuing a quotation moves it to `Quoted`;
//! an admin may approve, reject, or reset it to `Pending` at any time, but
//! may never mark it `Quoted` without a quotation row.

use crate::error::{DomainError, Violations};
use crate::lifecycle::{EntityKind, StatusMachine, TransitionTrigger};
use crate::validation::{
    normalize_email, optional_text, required_text, validate_name, validate_phone,
};
use serde::{Deserialize, Serialize};

closed_enum! {
    /// Lifecycle status of a project request.
    pub enum RequestStatus: "status" {
        /// Awaiting review or a quotation.
        Pending => "Pending",
        /// At least one quotation has been issued.
        Quoted => "Quoted",
        /// The client and staff agreed to proceed.
        Approved => "Approved",
        /// Declined.
        Rejected => "Rejected",
    }
}

impl StatusMachine for RequestStatus {
    const ENTITY: EntityKind = EntityKind::ProjectRequest;

    fn initial() -> Self {
        Self::Pending
    }

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        // Decisions can always be reset by an admin; nothing is final.
        false
    }

    fn permits(&self, target: Self, trigger: TransitionTrigger) -> bool {
        match trigger {
            TransitionTrigger::QuotationIssued => {
                matches!(self, Self::Pending | Self::Quoted) && target == Self::Quoted
            }
            TransitionTrigger::AdminEdit => target != Self::Quoted,
            TransitionTrigger::ClientReply
            | TransitionTrigger::AdminResponse
            | TransitionTrigger::AssessmentAssigned
            | TransitionTrigger::InterviewScheduled => false,
        }
    }
}

closed_enum! {
    /// The kind of project a client is asking for.
    pub enum ProjectType: "project_type" {
        ECommerceWebsite => "E-commerce Website",
        BusinessWebsite => "Business Website",
        WebApplication => "Web Application",
        AiChatbotIntegration => "AI Chatbot Integration",
        BusinessAutomation => "Business Automation",
        DataAnalyticsDashboard => "Data Analytics Dashboard",
        CustomSolution => "Custom Solution",
        Other => "Other",
    }
}

closed_enum! {
    /// The client's self-reported budget bracket.
    pub enum BudgetRange: "budget_range" {
        Under50k => "Under KES 50,000",
        From50kTo100k => "KES 50,000 - 100,000",
        From100kTo250k => "KES 100,000 - 250,000",
        From250kTo500k => "KES 250,000 - 500,000",
        Above500k => "Above KES 500,000",
        NotSure => "Not Sure",
    }
}

/// An unvalidated project request submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectRequestDraft {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub company_name: Option<String>,
    pub project_type: String,
    pub requirements: String,
    pub budget_range: Option<String>,
}

/// A validated project request, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectRequest {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub company_name: Option<String>,
    pub project_type: ProjectType,
    pub requirements: String,
    pub budget_range: Option<BudgetRange>,
}

impl ProjectRequestDraft {
    /// Validates every field of the submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewProjectRequest, DomainError> {
        let client_name = validate_name("client_name", &self.client_name);
        let client_email = normalize_email("client_email", &self.client_email);
        let client_phone = validate_phone("client_phone", &self.client_phone);
        let company_name = optional_text(
            "company_name",
            "Company name",
            self.company_name.as_deref(),
            255,
        );
        let project_type = ProjectType::parse_field("project_type", &self.project_type);
        let requirements = required_text(
            "requirements",
            "Requirements",
            &self.requirements,
            20,
            5000,
        );
        let budget_range = self
            .budget_range
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|raw| BudgetRange::parse_field("budget_range", raw))
            .transpose();

        let mut violations: Violations = Violations::new();
        violations.note(&client_name);
        violations.note(&client_email);
        violations.note(&client_phone);
        violations.note(&company_name);
        violations.note(&project_type);
        violations.note(&requirements);
        violations.note(&budget_range);
        violations.finish()?;

        Ok(NewProjectRequest {
            client_name: client_name?,
            client_email: client_email?,
            client_phone: client_phone?,
            company_name: company_name?,
            project_type: project_type?,
            requirements: requirements?,
            budget_range: budget_range?,
        })
    }
}

/// A stored project request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRequest {
    pub id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub company_name: Option<String>,
    pub project_type: ProjectType,
    pub requirements: String,
    pub budget_range: Option<BudgetRange>,
    pub status: RequestStatus,
    pub created_at: String,
    pub updated_at: String,
}
