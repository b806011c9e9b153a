// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph::{application_event, request_submission_event};
use planmorph_audit::Actor;
use planmorph_domain::{
    Availability, BudgetRange, ExperienceLevel, Money, NewApplication, NewProjectRequest,
    NewQuotation, NewTicket, ProjectRequest, ProjectType, RecurringPeriod, TalentApplication,
    TalentRole, TicketCategory,
};

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_admin(persistence: &Persistence) -> Actor {
    let admin_id: i64 = persistence
        .create_admin("ops@planmorph.software", "Ops", "$2b$04$hash")
        .expect("admin created");
    Actor::admin(admin_id, String::from("ops@planmorph.software"))
}

pub fn create_test_new_request() -> NewProjectRequest {
    NewProjectRequest {
        client_name: String::from("Jane Doe"),
        client_email: String::from("jane@x.com"),
        client_phone: String::from("0712345678"),
        company_name: None,
        project_type: ProjectType::BusinessWebsite,
        requirements: String::from("A five page site with a contact form."),
        budget_range: Some(BudgetRange::From50kTo100k),
    }
}

pub fn create_test_request(persistence: &Persistence) -> ProjectRequest {
    let request: NewProjectRequest = create_test_new_request();
    persistence
        .insert_project_request(&request, &request_submission_event(&request))
        .expect("request stored")
}

pub fn create_test_quotation(request_id: i64, total: f64) -> NewQuotation {
    NewQuotation {
        request_id,
        total_cost: Money::from_major("total_cost", total).expect("valid amount"),
        timeline_weeks: 4,
        cost_breakdown: None,
        notes: None,
        recurring_cost: Money::ZERO,
        recurring_period: RecurringPeriod::Never,
        recurring_description: None,
    }
}

pub fn create_test_new_ticket(email: &str) -> NewTicket {
    NewTicket {
        full_name: String::from("Jane Doe"),
        email: email.to_string(),
        phone: None,
        company_name: Some(String::from("Acme")),
        subject: String::from("Checkout broken"),
        description: String::from("The pay button does nothing."),
        category: TicketCategory::Bug,
    }
}

pub fn create_test_new_application(email: &str) -> NewApplication {
    NewApplication {
        full_name: String::from("Sam Otieno"),
        email: email.to_string(),
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
        skills: vec![String::from("Rust"), String::from("SQL")],
        technologies: vec![String::from("PostgreSQL")],
        notable_projects: Vec::new(),
        previous_companies: None,
        why_join: String::from("I want to build things for local businesses."),
        availability: Availability::Immediate,
        expected_salary_range: None,
    }
}

pub fn create_test_application(persistence: &Persistence, email: &str) -> TalentApplication {
    let application: NewApplication = create_test_new_application(email);
    persistence
        .insert_application(&application, &application_event(&application))
        .expect("application stored")
}
