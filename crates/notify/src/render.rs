// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text rendering of notification templates.

use crate::message::{Notification, QuoteSummary, Recipient, Template};
use planmorph_domain::{ApplicationStatus, InterviewType, RecurringPeriod};
use std::fmt::Write;

/// Signature appended to client-facing messages.
const SIGNATURE: &str = "Best regards,\nPlanMorph Tech";

/// A rendered subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub body: String,
}

/// Renders a notification to a subject line and plain-text body.
///
/// # Arguments
///
/// * `notification` - The notification to render
/// * `portal_url` - Base URL of the public site, used for tracking links
#[must_use]
pub fn render(notification: &Notification, portal_url: &str) -> Rendered {
    let greeting: String = match &notification.recipient {
        Recipient::Person {
            name: Some(name), ..
        } => format!("Hi {name},"),
        Recipient::Person { name: None, .. } => String::from("Hello,"),
        Recipient::Staff => String::new(),
    };

    match &notification.template {
        Template::NewRequestAlert {
            request_id,
            client_name,
            client_email,
            client_phone,
            company_name,
            project_type,
            budget_range,
            requirements,
        } => Rendered {
            subject: format!("New Project Request: {project_type}"),
            body: format!(
                "New project request #{request_id}\n\n\
                 Client: {client_name}\n\
                 Email: {client_email}\n\
                 Phone: {client_phone}\n\
                 Company: {}\n\
                 Project type: {project_type}\n\
                 Budget: {}\n\n\
                 Requirements:\n{requirements}\n",
                company_name.as_deref().unwrap_or("-"),
                budget_range.as_deref().unwrap_or("Not specified"),
            ),
        },
        Template::RequestConfirmation {
            client_name,
            project_type,
        } => Rendered {
            subject: String::from("Thank You for Your Request - PlanMorph Tech"),
            body: format!(
                "Hi {client_name},\n\n\
                 We received your request for a {project_type}. Our team will \
                 review it and get back to you within 24 hours.\n\n{SIGNATURE}\n"
            ),
        },
        Template::Quotation(quote) => Rendered {
            subject: format!(
                "Your Project Quotation from PlanMorph Tech - {}",
                quote.project_type
            ),
            body: render_quote(&greeting, quote),
        },
        Template::TicketCreated {
            ticket_number,
            subject,
            category,
            sla_hours,
        } => Rendered {
            subject: format!("Support Ticket Created - {ticket_number}"),
            body: format!(
                "{greeting}\n\nYour support ticket has been created.\n\n\
                 Ticket Number: {ticket_number}\n\
                 Subject: {subject}\n\
                 Category: {category}\n\
                 Expected Response Time: {sla_hours} hours\n\n\
                 To track your ticket, visit: {portal_url}/support\n\n{SIGNATURE}\n"
            ),
        },
        Template::NewTicketAlert {
            ticket_number,
            client_name,
            client_email,
            subject,
            description,
            category,
            priority,
            plan,
        } => Rendered {
            subject: format!(
                "New Support Ticket: {ticket_number} - {}",
                priority.as_str().to_uppercase()
            ),
            body: format!(
                "New Support Ticket\n\n\
                 Ticket: {ticket_number}\n\
                 Client: {client_name}\n\
                 Email: {client_email}\n\
                 Subject: {subject}\n\
                 Category: {category}\n\
                 Priority: {priority}\n\
                 Plan: {plan}\n\n\
                 Description:\n{description}\n"
            ),
        },
        Template::TicketActivityAlert {
            ticket_number,
            client_name,
            action,
        } => Rendered {
            subject: format!("Ticket Update: {ticket_number}"),
            body: format!(
                "{action} on ticket {ticket_number}.\nClient: {}\n",
                client_name.as_deref().unwrap_or("unknown")
            ),
        },
        Template::TicketStatusUpdated {
            ticket_number,
            status,
            resolution_notes,
        } => {
            let mut body: String = format!(
                "{greeting}\n\nThe status of your ticket {ticket_number} is now: {status}.\n"
            );
            if let Some(notes) = resolution_notes {
                let _ = write!(body, "\nResolution notes:\n{notes}\n");
            }
            let _ = write!(
                body,
                "\nTo view your ticket, visit: {portal_url}/support\n\n{SIGNATURE}\n"
            );
            Rendered {
                subject: format!("Ticket Status Updated - {ticket_number}"),
                body,
            }
        }
        Template::TicketResponse {
            ticket_number,
            message,
        } => Rendered {
            subject: format!("New Response on Your Ticket - {ticket_number}"),
            body: format!(
                "{greeting}\n\nOur support team replied to your ticket {ticket_number}:\n\n\
                 {message}\n\n\
                 To reply, visit: {portal_url}/support\n\n{SIGNATURE}\n"
            ),
        },
        Template::ApplicationReceived {
            application_id,
            needs_assessment,
        } => {
            let next_step: &str = if *needs_assessment {
                "As a next step we will send you a short assessment task."
            } else {
                "Our team will review your portfolio and be in touch about an interview."
            };
            Rendered {
                subject: String::from("Application Received - PlanMorph Tech"),
                body: format!(
                    "{greeting}\n\nThank you for applying to PlanMorph Tech. \
                     Your application reference is #{application_id}.\n\n\
                     {next_step}\n\n{SIGNATURE}\n"
                ),
            }
        }
        Template::AssessmentAssigned {
            application_id,
            task_title,
            task_description,
            deadline,
        } => Rendered {
            subject: String::from("Assessment Task Assigned - PlanMorph Tech"),
            body: format!(
                "{greeting}\n\nWe have assigned you an assessment for application \
                 #{application_id}.\n\n\
                 Task: {task_title}\n\n{task_description}\n\n\
                 Deadline: {deadline}\n\n{SIGNATURE}\n"
            ),
        },
        Template::InterviewScheduled {
            interview_type,
            scheduled_at,
            duration_minutes,
            meeting_link,
            location,
        } => {
            let mut body: String = format!(
                "{greeting}\n\nYour {} interview is scheduled.\n\n\
                 When: {scheduled_at}\n\
                 Duration: {duration_minutes} minutes\n",
                interview_label(*interview_type)
            );
            if let Some(link) = meeting_link {
                let _ = writeln!(body, "Meeting link: {link}");
            }
            if let Some(place) = location {
                let _ = writeln!(body, "Location: {place}");
            }
            let _ = write!(body, "\n{SIGNATURE}\n");
            Rendered {
                subject: String::from("Interview Scheduled - PlanMorph Tech"),
                body,
            }
        }
        Template::ApplicationStatusChanged {
            application_id,
            status,
            notes,
        } => render_application_status(&greeting, *application_id, *status, notes.as_deref()),
        Template::PasswordReset {
            reset_token,
            expires_in_minutes,
        } => Rendered {
            subject: String::from("Password Reset Request - PlanMorph Tech"),
            body: format!(
                "A password reset was requested for your account.\n\n\
                 Reset link: {portal_url}/admin/reset-password?token={reset_token}\n\n\
                 The link expires in {expires_in_minutes} minutes. If you did not \
                 request a reset you can ignore this message.\n"
            ),
        },
    }
}

fn render_quote(greeting: &str, quote: &QuoteSummary) -> String {
    let mut body: String = format!(
        "{greeting}\n\nThank you for your interest in a {}. Here is our quotation.\n\n\
         Total cost: KES {}\n\
         Timeline: {} weeks\n",
        quote.project_type, quote.total_cost, quote.timeline_weeks
    );

    if let Some(breakdown) = quote.cost_breakdown.as_ref().filter(|b| !b.is_empty()) {
        body.push_str("\nCost breakdown:\n");
        for (label, amount) in breakdown.items() {
            let _ = writeln!(body, "  {label}: KES {amount}");
        }
    }

    if quote.recurring_period != RecurringPeriod::Never && quote.recurring_cost.cents() > 0 {
        let _ = write!(
            body,
            "\nRecurring cost: KES {} ({})\n",
            quote.recurring_cost, quote.recurring_period
        );
        if let Some(description) = &quote.recurring_description {
            let _ = writeln!(body, "{description}");
        }
    }

    if let Some(notes) = &quote.notes {
        let _ = write!(body, "\nNotes:\n{notes}\n");
    }

    let _ = write!(
        body,
        "\nYour requirements:\n{}\n\nReply to this email to accept or discuss the quote.\n\n{SIGNATURE}\n",
        quote.requirements
    );
    body
}

fn render_application_status(
    greeting: &str,
    application_id: i64,
    status: ApplicationStatus,
    notes: Option<&str>,
) -> Rendered {
    let (subject, message): (&str, String) = match status {
        ApplicationStatus::Accepted => (
            "Welcome to PlanMorph Tech!",
            String::from(
                "Congratulations! Your application has been accepted. \
                 We will contact you shortly about onboarding.",
            ),
        ),
        ApplicationStatus::Rejected => (
            "Thank You for Your Application - PlanMorph Tech",
            String::from(
                "Thank you for your interest in PlanMorph Tech. After careful \
                 review we will not be moving forward at this time.",
            ),
        ),
        other => (
            "Application Update - PlanMorph Tech",
            format!(
                "Your application #{application_id} is now: {}.",
                other.as_str().replace('_', " ")
            ),
        ),
    };

    let mut body: String = format!("{greeting}\n\n{message}\n");
    if let Some(notes) = notes {
        let _ = write!(body, "\n{notes}\n");
    }
    let _ = write!(body, "\n{SIGNATURE}\n");

    Rendered {
        subject: subject.to_string(),
        body,
    }
}

const fn interview_label(interview_type: InterviewType) -> &'static str {
    match interview_type {
        InterviewType::Video => "video",
        InterviewType::Phone => "phone",
        InterviewType::InPerson => "in-person",
    }
}
