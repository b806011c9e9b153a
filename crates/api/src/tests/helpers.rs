// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use planmorph_domain::{
    ApplicationDraft, ProjectRequestDraft, QuotationDraft, TicketDraft, TicketNumber,
};
use planmorph_persistence::Persistence;
use time::Duration;

use crate::{
    AuthConfig, AuthenticatedAdmin, LoginRequest, LoginResponse, bootstrap_admin, login,
    submit_ticket,
};

pub const TEST_ADMIN_EMAIL: &str = "ops@planmorph.software";
pub const TEST_PASSWORD: &str = "Sup3rSecret";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Minimum bcrypt cost so hashing does not dominate the test run.
pub fn create_test_config() -> AuthConfig {
    AuthConfig {
        session_ttl: Duration::hours(24),
        reset_ttl: Duration::hours(1),
        hash_cost: 4,
    }
}

pub fn create_test_admin(persistence: &Persistence) -> AuthenticatedAdmin {
    let admin_id: i64 =
        bootstrap_admin(persistence, &create_test_config(), TEST_ADMIN_EMAIL, TEST_PASSWORD)
            .expect("bootstrap succeeds")
            .expect("first admin is created");
    AuthenticatedAdmin {
        admin_id,
        email: String::from(TEST_ADMIN_EMAIL),
        name: String::from("Administrator"),
    }
}

pub fn login_test_admin(persistence: &Persistence) -> LoginResponse {
    login(
        persistence,
        &create_test_config(),
        &LoginRequest {
            email: String::from(TEST_ADMIN_EMAIL),
            password: String::from(TEST_PASSWORD),
        },
    )
    .expect("login succeeds")
}

pub fn create_test_request_draft() -> ProjectRequestDraft {
    ProjectRequestDraft {
        client_name: String::from("Jane Doe"),
        client_email: String::from("jane@x.com"),
        client_phone: String::from("0712345678"),
        company_name: None,
        project_type: String::from("Business Website"),
        requirements: String::from("A five page site with a contact form."),
        budget_range: None,
    }
}

pub fn create_test_quotation_draft(request_id: i64, total: f64) -> QuotationDraft {
    QuotationDraft {
        request_id: Some(request_id),
        total_cost: Some(total),
        timeline_weeks: Some(4),
        ..QuotationDraft::default()
    }
}

pub fn create_test_ticket_draft(email: &str) -> TicketDraft {
    TicketDraft {
        full_name: String::from("Jane Doe"),
        email: email.to_string(),
        phone: None,
        company_name: Some(String::from("Acme")),
        subject: String::from("Checkout broken"),
        description: String::from("The pay button does nothing."),
        category: String::from("bug"),
    }
}

/// Opens a ticket and returns its id and number.
pub fn create_test_ticket(persistence: &Persistence, email: &str) -> (i64, TicketNumber) {
    let created = submit_ticket(persistence, &create_test_ticket_draft(email))
        .expect("ticket submitted")
        .response
        .ticket;
    (created.id, created.ticket_number)
}

pub fn create_test_application_draft(email: &str) -> ApplicationDraft {
    ApplicationDraft {
        full_name: String::from("Amina Otieno"),
        email: email.to_string(),
        role: String::from("developer"),
        specialization: String::from("Backend"),
        experience_level: String::from("advanced"),
        years_of_experience: Some(6),
        portfolio_url: Some(String::from("https://amina.dev")),
        skills: vec![String::from("Rust")],
        why_join: String::from("I like the product work."),
        availability: String::from("two_weeks"),
        ..ApplicationDraft::default()
    }
}
