//! Verification email job.
//!
//! In development mode (no SMTP settings) emails are logged instead of
//! sent. The account service never dispatches this itself; the signup
//! handler does, fire-and-forget.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Email body content (plain text)
    pub body: String,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Compose the signup verification email for an account
    pub fn verification(to: &str, nickname: &str, token: &str) -> Self {
        Self::new(
            to,
            "Verify your gopang account",
            format!(
                "Hello {nickname},\n\n\
                 Confirm your email address to finish signing up:\n\n\
                 /auth/verify?email={to}&token={token}\n\n\
                 If you did not create this account, ignore this message."
            ),
        )
    }
}

/// Email configuration from environment.
#[allow(dead_code)]
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@gopang.shop".to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

/// Process an email job.
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();

    tracing::info!(
        to = %job.to,
        from = %config.smtp_from,
        subject = %job.subject,
        "Processing email job"
    );

    if !config.is_configured() {
        // Development mode: log the email instead of sending
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            config.smtp_from,
            job.to,
            job.subject,
            job.body,
        );
        return Ok(());
    }

    // TODO: wire an SMTP transport (lettre) once delivery is needed.
    tracing::warn!(
        host = %config.smtp_host.as_deref().unwrap_or_default(),
        port = config.smtp_port,
        "SMTP configured but no transport is wired; email not sent"
    );

    Ok(())
}
