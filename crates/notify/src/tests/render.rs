// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Notification, QuoteSummary, Recipient, Rendered, Template, render};
use planmorph_domain::{
    ApplicationStatus, CostBreakdown, Money, PlanType, RecurringPeriod, TicketCategory,
    TicketNumber, TicketPriority, TicketStatus,
};
use serde_json::json;

const PORTAL: &str = "https://tech.planmorph.software";

fn to_jane(template: Template) -> Notification {
    Notification::new(Recipient::person("jane@x.com", Some("Jane")), template)
}

#[test]
fn test_ticket_created_mentions_number_and_sla() {
    let rendered: Rendered = render(
        &to_jane(Template::TicketCreated {
            ticket_number: TicketNumber::from_sequence(7).unwrap(),
            subject: String::from("Checkout broken"),
            category: TicketCategory::Bug,
            sla_hours: 48,
        }),
        PORTAL,
    );

    assert_eq!(rendered.subject, "Support Ticket Created - ST-00007");
    assert!(rendered.body.starts_with("Hi Jane,"));
    assert!(rendered.body.contains("Expected Response Time: 48 hours"));
    assert!(rendered.body.contains("https://tech.planmorph.software/support"));
}

#[test]
fn test_new_ticket_alert_shouts_priority() {
    let rendered: Rendered = render(
        &Notification::to_staff(Template::NewTicketAlert {
            ticket_number: TicketNumber::from_sequence(12).unwrap(),
            client_name: String::from("Jane"),
            client_email: String::from("jane@x.com"),
            subject: String::from("Down"),
            description: String::from("Site is down"),
            category: TicketCategory::TechnicalIssue,
            priority: TicketPriority::Medium,
            plan: PlanType::Premium,
        }),
        PORTAL,
    );

    assert_eq!(rendered.subject, "New Support Ticket: ST-00012 - MEDIUM");
    assert!(rendered.body.contains("Plan: premium"));
}

#[test]
fn test_status_update_includes_resolution_notes() {
    let rendered: Rendered = render(
        &to_jane(Template::TicketStatusUpdated {
            ticket_number: TicketNumber::from_sequence(3).unwrap(),
            status: TicketStatus::Resolved,
            resolution_notes: Some(String::from("Cleared the cache.")),
        }),
        PORTAL,
    );

    assert!(rendered.body.contains("is now: resolved"));
    assert!(rendered.body.contains("Cleared the cache."));
}

#[test]
fn test_quote_lists_breakdown_and_recurring_cost() {
    let breakdown: CostBreakdown =
        CostBreakdown::from_value("cost_breakdown", &json!({"Design": 25000, "Build": 50000}))
            .unwrap();
    let rendered: Rendered = render(
        &to_jane(Template::Quotation(QuoteSummary {
            client_name: String::from("Jane"),
            project_type: String::from("Business Website"),
            requirements: String::from("Five pages and a contact form."),
            total_cost: Money::from_major("total_cost", 75_000.0).unwrap(),
            timeline_weeks: 4,
            cost_breakdown: Some(breakdown),
            notes: None,
            recurring_cost: Money::from_major("recurring_cost", 2_500.0).unwrap(),
            recurring_period: RecurringPeriod::Monthly,
            recurring_description: Some(String::from("Hosting and support")),
        })),
        PORTAL,
    );

    assert_eq!(
        rendered.subject,
        "Your Project Quotation from PlanMorph Tech - Business Website"
    );
    assert!(rendered.body.contains("Total cost: KES 75,000.00"));
    assert!(rendered.body.contains("  Build: KES 50,000.00"));
    assert!(rendered.body.contains("Recurring cost: KES 2,500.00 (monthly)"));
}

#[test]
fn test_application_status_templates_differ_by_status() {
    let subject_for = |status: ApplicationStatus| {
        render(
            &to_jane(Template::ApplicationStatusChanged {
                application_id: 9,
                status,
                notes: None,
            }),
            PORTAL,
        )
        .subject
    };

    assert_eq!(subject_for(ApplicationStatus::Accepted), "Welcome to PlanMorph Tech!");
    assert_eq!(
        subject_for(ApplicationStatus::Rejected),
        "Thank You for Your Application - PlanMorph Tech"
    );
    assert_eq!(
        subject_for(ApplicationStatus::UnderReview),
        "Application Update - PlanMorph Tech"
    );
}

#[test]
fn test_person_without_name_gets_generic_greeting() {
    let rendered: Rendered = render(
        &Notification::new(
            Recipient::person("jane@x.com", None),
            Template::TicketResponse {
                ticket_number: TicketNumber::from_sequence(1).unwrap(),
                message: String::from("We are on it."),
            },
        ),
        PORTAL,
    );
    assert!(rendered.body.starts_with("Hello,"));
    assert!(rendered.body.contains("We are on it."));
}
