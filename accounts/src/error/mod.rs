use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reasons a device cannot be registered against an account.
///
/// The plain session operations on
/// [`AccountRecord`](crate::models::account::AccountRecord) never fail; they
/// report "not found" through their `bool` return. This type is only used by
/// the policy-aware paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("account is banned{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Banned { message: Option<String> },

    #[error("account expired at {expires_at}")]
    Expired { expires_at: DateTime<Utc> },

    #[error("device limit of {max_devices} active sessions reached")]
    DeviceLimitReached { max_devices: usize },

    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("invalid session id: {0}")]
    InvalidSessionId(String),
}

impl AccountError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Banned { .. } => "ACCOUNT_BANNED",
            AccountError::Expired { .. } => "ACCOUNT_EXPIRED",
            AccountError::DeviceLimitReached { .. } => "DEVICE_LIMIT_REACHED",
            AccountError::Validation(_) => "VALIDATION_ERROR",
            AccountError::InvalidSessionId(_) => "INVALID_SESSION_ID",
        }
    }
}

impl From<validator::ValidationErrors> for AccountError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        // field_errors() iterates a HashMap
        messages.sort();
        AccountError::Validation(messages)
    }
}

impl From<uuid::Error> for AccountError {
    fn from(err: uuid::Error) -> Self {
        AccountError::InvalidSessionId(err.to_string())
    }
}
