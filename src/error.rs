use std::fmt::Debug;

use serde_json::Value;

use crate::utils::error_chain_fmt;

/// Everything that can go wrong with a single api call.
///
/// Remote failures are split by status: 4xx means the request itself was at
/// fault (and the caller can do something about it), anything else >= 400 is
/// the service's problem. Nothing is retried.
#[derive(thiserror::Error)]
pub enum MailchimpError {
    /// Rejected locally; no request was sent
    #[error("Invalid API call method: {0}")]
    InvalidMethod(String),

    /// Rejected locally; the key is not of the form `<key>-<datacenter>`
    #[error("{0}")]
    InvalidApiKey(String),

    /// 400-499. `body` is the raw response text, since validation errors come
    /// with a detailed (but loosely structured) breakdown per field
    #[error("{message}")]
    BadRequest {
        status: u16,
        message: String,
        body: String,
    },

    /// 500+, or any other unsuccessful status outside 4xx
    #[error("{message}")]
    InternalError { status: u16, message: String },

    /// Transport failures, (de)serialization failures
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for MailchimpError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)?;
        Ok(())
    }
}

impl MailchimpError {
    /// Status of the failed response, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. } | Self::InternalError { status, .. } => Some(*status),
            Self::InvalidMethod(_) | Self::InvalidApiKey(_) | Self::UnexpectedError(_) => None,
        }
    }

    /// Distinguish "no such list/member" from other client errors without
    /// inspecting the message
    pub fn is_not_found(&self) -> bool { self.status() == Some(404) }

    /// Raw response text; only kept for client errors
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::BadRequest { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Turn a response into an error if its status is >= 400; otherwise do
/// nothing, and the decoded body can be handed back to the caller.
pub fn classify(
    status: u16,
    json: &Value,
    text: &str,
) -> Result<(), MailchimpError> {
    if status < 400 {
        return Ok(());
    }

    let info = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
    let message = format!("Mailchimp API error ({status}): {info}");

    match status {
        400..=499 => Err(MailchimpError::BadRequest {
            status,
            message,
            body: text.to_owned(),
        }),
        _ => Err(MailchimpError::InternalError { status, message }),
    }
}
