// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph_audit::Actor;
use planmorph_domain::{
    ApplicationStatus, Availability, BudgetRange, ExperienceLevel, PlanType, ProjectRequest,
    ProjectType, RequestStatus, SupportTicket, TalentApplication, TalentRole, TicketCategory,
    TicketNumber, TicketPriority, TicketStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const NOW: OffsetDateTime = datetime!(2026-03-02 09:30 UTC);

pub fn create_test_admin() -> Actor {
    Actor::admin(1, String::from("admin@planmorph.software"))
}

pub fn create_test_request(status: RequestStatus) -> ProjectRequest {
    ProjectRequest {
        id: 11,
        client_name: String::from("Jane Doe"),
        client_email: String::from("jane@x.com"),
        client_phone: String::from("0712345678"),
        company_name: None,
        project_type: ProjectType::BusinessWebsite,
        requirements: String::from("A five page site with a contact form."),
        budget_range: Some(BudgetRange::From50kTo100k),
        status,
        created_at: String::from("2026-03-01T08:00:00Z"),
        updated_at: String::from("2026-03-01T08:00:00Z"),
    }
}

pub fn create_test_ticket(status: TicketStatus) -> SupportTicket {
    SupportTicket {
        id: 4,
        ticket_number: TicketNumber::from_sequence(4).unwrap(),
        client_id: 2,
        client_name: String::from("Jane Doe"),
        client_email: String::from("jane@x.com"),
        client_phone: None,
        subject: String::from("Checkout broken"),
        description: String::from("The pay button does nothing."),
        category: TicketCategory::Bug,
        priority: TicketPriority::Medium,
        status,
        client_plan: PlanType::Basic,
        response_sla_hours: 48,
        assigned_to: None,
        assigned_at: None,
        resolution_notes: None,
        resolved_at: None,
        resolved_by: None,
        closed_at: None,
        created_at: String::from("2026-03-01T08:00:00Z"),
        updated_at: String::from("2026-03-01T08:00:00Z"),
    }
}

pub fn create_test_application(status: ApplicationStatus) -> TalentApplication {
    TalentApplication {
        id: 9,
        full_name: String::from("Sam Otieno"),
        email: String::from("sam@x.com"),
        phone: None,
        location: Some(String::from("Nairobi")),
        role: TalentRole::Developer,
        specialization: String::from("Backend"),
        experience_level: ExperienceLevel::Intermediate,
        years_of_experience: Some(3),
        portfolio_url: Some(String::from("https://sam.dev")),
        github_url: None,
        linkedin_url: None,
        behance_url: None,
        dribbble_url: None,
        skills: vec![String::from("Rust")],
        technologies: vec![String::from("PostgreSQL")],
        notable_projects: Vec::new(),
        previous_companies: None,
        why_join: String::from("I want to build things for local businesses."),
        availability: Availability::Immediate,
        expected_salary_range: None,
        status,
        needs_assessment: false,
        admin_notes: None,
        reviewed_by: None,
        reviewed_at: None,
        assessment_task: None,
        assessment_deadline: None,
        interview_scheduled_at: None,
        created_at: String::from("2026-03-01T08:00:00Z"),
        updated_at: String::from("2026-03-01T08:00:00Z"),
    }
}
