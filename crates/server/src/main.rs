// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{get, patch, post},
};
use clap::Parser;
use planmorph_api::{AuthConfig, bootstrap_admin};
use planmorph_notify::{Dispatcher, LogNotifier, Notifier, SmtpConfig, SmtpNotifier};
use planmorph_persistence::Persistence;
use std::sync::Arc;
use time::Duration;
use tracing::{error, info, warn};

use crate::routes::{
    handle_assign_assessment, handle_change_client_plan, handle_client_message,
    handle_delete_quotation, handle_delete_request, handle_get_admin_ticket,
    handle_get_application, handle_get_public_ticket, handle_get_quotation, handle_get_request,
    handle_health, handle_issue_quotation, handle_list_all_quotations,
    handle_list_applications, handle_list_quotations, handle_list_requests, handle_list_tickets,
    handle_login, handle_logout, handle_register_admin, handle_request_password_reset,
    handle_reset_password, handle_respond_to_ticket, handle_schedule_interview,
    handle_submit_application, handle_submit_request, handle_submit_ticket,
    handle_ticket_stats, handle_update_application_status, handle_update_request,
    handle_update_ticket, handle_whoami,
};

/// How often expired sessions are purged.
const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// PlanMorph Server - HTTP API for project requests, support tickets and
/// talent applications
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "PLANMORPH_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "PLANMORPH_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PLANMORPH_PORT", default_value_t = 5000)]
    port: u16,

    /// Maximum pooled database connections for a file database
    #[arg(long, env = "PLANMORPH_POOL_SIZE", default_value_t = 8)]
    pool_size: u32,

    /// Mailbox that receives staff alerts
    #[arg(long, env = "PLANMORPH_ADMIN_EMAIL", default_value = "admin@localhost")]
    admin_email: String,

    /// SMTP relay host. Without it notifications are only logged.
    #[arg(long, env = "SMTP_HOST")]
    smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USERNAME")]
    smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    smtp_password: Option<String>,

    /// Sender address for outgoing mail
    #[arg(long, env = "MAIL_FROM", default_value = "PlanMorph <noreply@planmorph.software>")]
    mail_from: String,

    /// Email of the admin created at startup when none exists
    #[arg(long, env = "PLANMORPH_BOOTSTRAP_ADMIN_EMAIL")]
    bootstrap_admin_email: Option<String>,

    /// Password of the admin created at startup when none exists
    #[arg(long, env = "PLANMORPH_BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    bootstrap_admin_password: Option<String>,

    /// Lifetime of a login session, in hours (1 to 8760)
    #[arg(
        long,
        env = "PLANMORPH_SESSION_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=8760)
    )]
    session_hours: i64,

    /// Base URL used for links in notifications
    #[arg(
        long,
        env = "PLANMORPH_PORTAL_URL",
        default_value = "https://tech.planmorph.software"
    )]
    portal_url: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The pooled store.
    pub persistence: Persistence,
    /// Sends notifications after commits.
    pub dispatcher: Dispatcher,
    /// Session and password reset settings.
    pub auth: AuthConfig,
}

/// Builds the application router with all endpoints under `/api`.
fn build_router(app_state: AppState) -> Router {
    let auth: Router<AppState> = Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_whoami))
        .route("/verify", post(handle_whoami))
        .route("/register", post(handle_register_admin))
        .route("/request-reset", post(handle_request_password_reset))
        .route("/reset-password", post(handle_reset_password));

    let support: Router<AppState> = Router::new()
        .route("/submit", post(handle_submit_ticket))
        .route("/ticket/{ticket_number}", get(handle_get_public_ticket))
        .route("/ticket/{ticket_number}/message", post(handle_client_message))
        .route("/admin/tickets", get(handle_list_tickets))
        .route(
            "/admin/tickets/{id}",
            get(handle_get_admin_ticket).patch(handle_update_ticket),
        )
        .route("/admin/tickets/{id}/respond", post(handle_respond_to_ticket))
        .route("/admin/stats", get(handle_ticket_stats))
        .route("/admin/clients/{id}/plan", patch(handle_change_client_plan));

    let talent: Router<AppState> = Router::new()
        .route("/apply", post(handle_submit_application))
        .route("/applications", get(handle_list_applications))
        .route("/applications/{id}", get(handle_get_application))
        .route(
            "/applications/{id}/status",
            patch(handle_update_application_status),
        )
        .route(
            "/applications/{id}/assessment",
            post(handle_assign_assessment),
        )
        .route("/applications/{id}/interview", post(handle_schedule_interview));

    let api: Router<AppState> = Router::new()
        .route("/health", get(handle_health))
        .nest("/auth", auth)
        .route(
            "/requests",
            post(handle_submit_request).get(handle_list_requests),
        )
        .route(
            "/requests/{id}",
            get(handle_get_request)
                .put(handle_update_request)
                .delete(handle_delete_request),
        )
        .route(
            "/quotes",
            post(handle_issue_quotation).get(handle_list_all_quotations),
        )
        .route(
            "/quotes/{id}",
            get(handle_get_quotation).delete(handle_delete_quotation),
        )
        .route("/quotes/request/{request_id}", get(handle_list_quotations))
        .nest("/support", support)
        .nest("/talent", talent);

    Router::new().nest("/api", api).with_state(app_state)
}

/// Picks the notification transport from the configuration.
fn build_notifier(args: &Args) -> Result<Arc<dyn Notifier>, Box<dyn std::error::Error>> {
    let Some(host) = &args.smtp_host else {
        warn!("No SMTP host configured; notifications will only be logged");
        return Ok(Arc::new(LogNotifier::new(args.portal_url.clone())));
    };

    info!(host = %host, port = args.smtp_port, "Using SMTP transport");
    let notifier: SmtpNotifier = SmtpNotifier::new(&SmtpConfig {
        host: host.clone(),
        port: args.smtp_port,
        username: args.smtp_username.clone(),
        password: args.smtp_password.clone(),
        from: args.mail_from.clone(),
        portal_url: args.portal_url.clone(),
    })?;
    Ok(Arc::new(notifier))
}

/// Periodically deletes expired sessions.
fn spawn_session_sweeper(persistence: Persistence) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let store: Persistence = persistence.clone();
            match tokio::task::spawn_blocking(move || store.delete_expired_sessions()).await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => info!(removed, "Expired sessions removed"),
                Ok(Err(e)) => error!(error = %e, "Failed to remove expired sessions"),
                Err(e) => error!(error = %e, "Session sweep task failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing PlanMorph Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path, args.pool_size)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let auth: AuthConfig = AuthConfig {
        session_ttl: Duration::hours(args.session_hours),
        ..AuthConfig::default()
    };

    match (&args.bootstrap_admin_email, &args.bootstrap_admin_password) {
        (Some(email), Some(password)) => {
            match bootstrap_admin(&persistence, &auth, email, password)? {
                Some(admin_id) => info!(admin_id, "Bootstrap admin created"),
                None => info!("Admin accounts already exist; bootstrap skipped"),
            }
        }
        (None, None) => {}
        _ => warn!("Bootstrap admin needs both an email and a password; skipped"),
    }

    let dispatcher: Dispatcher = Dispatcher::new(build_notifier(&args)?, args.admin_email.clone());
    spawn_session_sweeper(persistence.clone());

    let app_state: AppState = AppState {
        persistence,
        dispatcher,
        auth,
    };
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
