// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Talent applications and their assessment and interview records.
//!
//! Applications move through review, an optional assessment, an interview,
//! and a final decision. Entering `assessment_assigned` or
//! `interview_scheduled` requires creating the matching record, so those
//! statuses are only reachable through their dedicated triggers.

use crate::error::{DomainError, FieldViolation, Violations};
use crate::lifecycle::{EntityKind, StatusMachine, TransitionTrigger};
use crate::timestamp::parse_timestamp;
use crate::validation::{
    label_list, normalize_email, optional_text, optional_url, required_text, validate_name,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Default number of days an applicant has to complete an assessment.
pub const DEFAULT_ASSESSMENT_DAYS: u16 = 7;

/// Default interview length in minutes.
pub const DEFAULT_INTERVIEW_MINUTES: u16 = 60;

/// Maximum number of notable projects on one application.
pub const MAX_NOTABLE_PROJECTS: usize = 20;

closed_enum! {
    /// Lifecycle status of a talent application.
    pub enum ApplicationStatus: "status" {
        Pending => "pending",
        UnderReview => "under_review",
        AssessmentAssigned => "assessment_assigned",
        AssessmentSubmitted => "assessment_submitted",
        InterviewScheduled => "interview_scheduled",
        Accepted => "accepted",
        Rejected => "rejected",
        /// The applicant pulled out.
        Withdrawn => "withdrawn",
    }
}

impl StatusMachine for ApplicationStatus {
    const ENTITY: EntityKind = EntityKind::TalentApplication;

    fn initial() -> Self {
        Self::Pending
    }

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    fn permits(&self, target: Self, trigger: TransitionTrigger) -> bool {
        match trigger {
            TransitionTrigger::AssessmentAssigned => {
                !self.is_terminal() && target == Self::AssessmentAssigned
            }
            TransitionTrigger::InterviewScheduled => {
                !self.is_terminal() && target == Self::InterviewScheduled
            }
            TransitionTrigger::AdminEdit => {
                if *self == target {
                    return true;
                }
                if matches!(target, Self::AssessmentAssigned | Self::InterviewScheduled) {
                    return false;
                }
                !self.is_terminal() || target == Self::UnderReview
            }
            TransitionTrigger::QuotationIssued
            | TransitionTrigger::ClientReply
            | TransitionTrigger::AdminResponse => false,
        }
    }
}

closed_enum! {
    /// The discipline an applicant is applying for.
    pub enum TalentRole: "role" {
        Developer => "developer",
        Designer => "designer",
        Both => "both",
    }
}

closed_enum! {
    /// Self-reported seniority.
    pub enum ExperienceLevel: "experience_level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    }
}

closed_enum! {
    /// How soon an applicant can start.
    pub enum Availability: "availability" {
        Immediate => "immediate",
        TwoWeeks => "two_weeks",
        OneMonth => "one_month",
        Flexible => "flexible",
    }
}

closed_enum! {
    /// How an interview is conducted.
    pub enum InterviewType: "interview_type" {
        Video => "video",
        Phone => "phone",
        InPerson => "in_person",
    }
}

/// A project an applicant wants to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotableProject {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl NotableProject {
    /// Validates an untyped list of notable projects.
    ///
    /// # Errors
    ///
    /// Returns a violation naming `field` if the value is not a list of
    /// project records or a record is malformed.
    pub fn list_from_value(field: &str, value: &Value) -> Result<Vec<Self>, FieldViolation> {
        let projects: Vec<Self> = serde_json::from_value(value.clone()).map_err(|e| {
            FieldViolation::new(field, format!("Notable projects are malformed: {e}"))
        })?;
        if projects.len() > MAX_NOTABLE_PROJECTS {
            return Err(FieldViolation::new(
                field,
                format!("At most {MAX_NOTABLE_PROJECTS} notable projects are allowed"),
            ));
        }

        projects
            .into_iter()
            .map(|project| {
                Ok(Self {
                    title: required_text(field, "Project title", &project.title, 1, 255)?,
                    description: optional_text(
                        field,
                        "Project description",
                        project.description.as_deref(),
                        2000,
                    )?,
                    url: optional_url(field, project.url.as_deref())?,
                    technologies: label_list(field, &project.technologies, 0)?,
                    role: optional_text(field, "Project role", project.role.as_deref(), 255)?,
                })
            })
            .collect()
    }
}

/// Decides whether an applicant must complete an assessment before an
/// interview.
///
/// Beginners, anyone reporting under two years of experience, and anyone
/// without a portfolio are assessed.
#[must_use]
pub const fn needs_assessment(
    experience_level: ExperienceLevel,
    years_of_experience: Option<u32>,
    has_portfolio: bool,
) -> bool {
    let junior: bool = match years_of_experience {
        Some(years) => years < 2,
        None => false,
    };
    matches!(experience_level, ExperienceLevel::Beginner) || junior || !has_portfolio
}

/// An unvalidated talent application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationDraft {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: String,
    pub specialization: String,
    pub experience_level: String,
    pub years_of_experience: Option<i64>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub behance_url: Option<String>,
    pub dribbble_url: Option<String>,
    pub skills: Vec<String>,
    pub technologies: Vec<String>,
    pub notable_projects: Option<Value>,
    pub previous_companies: Option<String>,
    pub why_join: String,
    pub availability: String,
    pub expected_salary_range: Option<String>,
}

/// A validated talent application, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: TalentRole,
    pub specialization: String,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: Option<u32>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub behance_url: Option<String>,
    pub dribbble_url: Option<String>,
    pub skills: Vec<String>,
    pub technologies: Vec<String>,
    pub notable_projects: Vec<NotableProject>,
    pub previous_companies: Option<String>,
    pub why_join: String,
    pub availability: Availability,
    pub expected_salary_range: Option<String>,
}

impl NewApplication {
    /// Whether this applicant must complete an assessment.
    #[must_use]
    pub const fn needs_assessment(&self) -> bool {
        needs_assessment(
            self.experience_level,
            self.years_of_experience,
            self.portfolio_url.is_some(),
        )
    }
}

impl ApplicationDraft {
    /// Validates every field of the application.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewApplication, DomainError> {
        let full_name = validate_name("full_name", &self.full_name);
        let email = normalize_email("email", &self.email);
        let phone = optional_text("phone", "Phone", self.phone.as_deref(), 50);
        let location = optional_text("location", "Location", self.location.as_deref(), 255);
        let role = TalentRole::parse_field("role", &self.role);
        let specialization = required_text(
            "specialization",
            "Specialization",
            &self.specialization,
            1,
            255,
        );
        let experience_level =
            ExperienceLevel::parse_field("experience_level", &self.experience_level);
        let years_of_experience = match self.years_of_experience.map(u32::try_from) {
            None => Ok(None),
            Some(Ok(years)) if years <= 70 => Ok(Some(years)),
            Some(_) => Err(FieldViolation::new(
                "years_of_experience",
                "Years of experience must be between 0 and 70",
            )),
        };
        let portfolio_url = optional_url("portfolio_url", self.portfolio_url.as_deref());
        let github_url = optional_url("github_url", self.github_url.as_deref());
        let linkedin_url = optional_url("linkedin_url", self.linkedin_url.as_deref());
        let behance_url = optional_url("behance_url", self.behance_url.as_deref());
        let dribbble_url = optional_url("dribbble_url", self.dribbble_url.as_deref());
        let skills = label_list("skills", &self.skills, 1);
        let technologies = label_list("technologies", &self.technologies, 0);
        let notable_projects = match &self.notable_projects {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => NotableProject::list_from_value("notable_projects", value),
        };
        let previous_companies = optional_text(
            "previous_companies",
            "Previous companies",
            self.previous_companies.as_deref(),
            1000,
        );
        let why_join = required_text("why_join", "Why you want to join", &self.why_join, 1, 5000);
        let availability = Availability::parse_field("availability", &self.availability);
        let expected_salary_range = optional_text(
            "expected_salary_range",
            "Expected salary range",
            self.expected_salary_range.as_deref(),
            100,
        );

        let mut violations: Violations = Violations::new();
        violations.note(&full_name);
        violations.note(&email);
        violations.note(&phone);
        violations.note(&location);
        violations.note(&role);
        violations.note(&specialization);
        violations.note(&experience_level);
        violations.note(&years_of_experience);
        violations.note(&portfolio_url);
        violations.note(&github_url);
        violations.note(&linkedin_url);
        violations.note(&behance_url);
        violations.note(&dribbble_url);
        violations.note(&skills);
        violations.note(&technologies);
        violations.note(&notable_projects);
        violations.note(&previous_companies);
        violations.note(&why_join);
        violations.note(&availability);
        violations.note(&expected_salary_range);
        violations.finish()?;

        Ok(NewApplication {
            full_name: full_name?,
            email: email?,
            phone: phone?,
            location: location?,
            role: role?,
            specialization: specialization?,
            experience_level: experience_level?,
            years_of_experience: years_of_experience?,
            portfolio_url: portfolio_url?,
            github_url: github_url?,
            linkedin_url: linkedin_url?,
            behance_url: behance_url?,
            dribbble_url: dribbble_url?,
            skills: skills?,
            technologies: technologies?,
            notable_projects: notable_projects?,
            previous_companies: previous_companies?,
            why_join: why_join?,
            availability: availability?,
            expected_salary_range: expected_salary_range?,
        })
    }
}

/// An unvalidated admin status update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdateDraft {
    pub status: String,
    pub admin_notes: Option<String>,
}

/// A validated admin status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub admin_notes: Option<String>,
}

impl StatusUpdateDraft {
    /// Validates the update.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<StatusUpdate, DomainError> {
        let status = ApplicationStatus::parse_field("status", &self.status);
        let admin_notes =
            optional_text("admin_notes", "Admin notes", self.admin_notes.as_deref(), 5000);

        let mut violations: Violations = Violations::new();
        violations.note(&status);
        violations.note(&admin_notes);
        violations.finish()?;

        Ok(StatusUpdate {
            status: status?,
            admin_notes: admin_notes?,
        })
    }
}

/// An unvalidated assessment assignment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssessmentDraft {
    pub task_title: String,
    pub task_description: String,
    pub task_requirements: Option<String>,
    pub task_type: Option<String>,
    pub deadline_days: Option<i64>,
}

/// A validated assessment assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssessment {
    pub task_title: String,
    pub task_description: String,
    pub task_requirements: Option<String>,
    pub task_type: Option<String>,
    pub deadline_days: u16,
}

impl AssessmentDraft {
    /// Validates the assignment. The deadline defaults to seven days.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewAssessment, DomainError> {
        let task_title = required_text("task_title", "Task title", &self.task_title, 1, 255);
        let task_description = required_text(
            "task_description",
            "Task description",
            &self.task_description,
            1,
            5000,
        );
        let task_requirements = optional_text(
            "task_requirements",
            "Task requirements",
            self.task_requirements.as_deref(),
            5000,
        );
        let task_type = optional_text("task_type", "Task type", self.task_type.as_deref(), 100);
        let deadline_days = match self.deadline_days.map(u16::try_from) {
            None => Ok(DEFAULT_ASSESSMENT_DAYS),
            Some(Ok(days)) if (1..=90).contains(&days) => Ok(days),
            Some(_) => Err(FieldViolation::new(
                "deadline_days",
                "Deadline must be between 1 and 90 days",
            )),
        };

        let mut violations: Violations = Violations::new();
        violations.note(&task_title);
        violations.note(&task_description);
        violations.note(&task_requirements);
        violations.note(&task_type);
        violations.note(&deadline_days);
        violations.finish()?;

        Ok(NewAssessment {
            task_title: task_title?,
            task_description: task_description?,
            task_requirements: task_requirements?,
            task_type: task_type?,
            deadline_days: deadline_days?,
        })
    }
}

/// An unvalidated interview schedule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterviewDraft {
    pub interview_type: String,
    pub scheduled_at: String,
    pub duration_minutes: Option<i64>,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// A validated interview schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterview {
    pub interview_type: InterviewType,
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: u16,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl InterviewDraft {
    /// Validates the schedule. Duration defaults to sixty minutes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewInterview, DomainError> {
        let interview_type = InterviewType::parse_field("interview_type", &self.interview_type);
        let scheduled_at = parse_timestamp("scheduled_at", &self.scheduled_at);
        let duration_minutes = match self.duration_minutes.map(u16::try_from) {
            None => Ok(DEFAULT_INTERVIEW_MINUTES),
            Some(Ok(minutes)) if (15..=480).contains(&minutes) => Ok(minutes),
            Some(_) => Err(FieldViolation::new(
                "duration_minutes",
                "Duration must be between 15 and 480 minutes",
            )),
        };
        let meeting_link = optional_url("meeting_link", self.meeting_link.as_deref());
        let location = optional_text("location", "Location", self.location.as_deref(), 255);
        let notes = optional_text("notes", "Notes", self.notes.as_deref(), 2000);

        let mut violations: Violations = Violations::new();
        violations.note(&interview_type);
        violations.note(&scheduled_at);
        violations.note(&duration_minutes);
        violations.note(&meeting_link);
        violations.note(&location);
        violations.note(&notes);
        violations.finish()?;

        Ok(NewInterview {
            interview_type: interview_type?,
            scheduled_at: scheduled_at?,
            duration_minutes: duration_minutes?,
            meeting_link: meeting_link?,
            location: location?,
            notes: notes?,
        })
    }
}

/// A stored talent application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TalentApplication {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: TalentRole,
    pub specialization: String,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: Option<u32>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub behance_url: Option<String>,
    pub dribbble_url: Option<String>,
    pub skills: Vec<String>,
    pub technologies: Vec<String>,
    pub notable_projects: Vec<NotableProject>,
    pub previous_companies: Option<String>,
    pub why_join: String,
    pub availability: Availability,
    pub expected_salary_range: Option<String>,
    pub status: ApplicationStatus,
    pub needs_assessment: bool,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
    pub assessment_task: Option<String>,
    pub assessment_deadline: Option<String>,
    pub interview_scheduled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An assessment task assigned to an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TalentAssessment {
    pub id: i64,
    pub application_id: i64,
    pub task_title: String,
    pub task_description: String,
    pub task_requirements: Option<String>,
    pub task_type: Option<String>,
    pub deadline: String,
    pub assigned_by: Option<i64>,
    pub created_at: String,
}

/// A scheduled interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TalentInterview {
    pub id: i64,
    pub application_id: i64,
    pub interview_type: InterviewType,
    pub scheduled_at: String,
    pub duration_minutes: u16,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub interviewer_id: Option<i64>,
    pub created_at: String,
}
