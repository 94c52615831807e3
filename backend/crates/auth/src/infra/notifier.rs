//! Activation Notifier Implementations
//!
//! Email dispatch belongs to a separate delivery service; the
//! implementations here log the event or, for tests, record the raw
//! token so the activation flow can be driven end to end.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::repository::ActivationNotifier;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Notifier that emits a structured log entry per notification.
///
/// The raw token is deliberately not logged.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl ActivationNotifier for LogNotifier {
    async fn send_activation(
        &self,
        email: &Email,
        _raw_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        tracing::info!(
            email = %email,
            expires_at = %expires_at,
            "Activation notification dispatched"
        );
        Ok(())
    }

    async fn send_welcome(&self, email: &Email) -> AuthResult<()> {
        tracing::info!(email = %email, "Welcome notification dispatched");
        Ok(())
    }
}

/// Notifier that captures raw activation tokens for inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last raw activation token sent to the given address
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

impl ActivationNotifier for RecordingNotifier {
    async fn send_activation(
        &self,
        email: &Email,
        raw_token: &str,
        _expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((email.as_str().to_string(), raw_token.to_string()));
        Ok(())
    }

    async fn send_welcome(&self, _email: &Email) -> AuthResult<()> {
        Ok(())
    }
}
