//! Error types shared by the coffee shop client and the ranking pipeline.
//!
//! Every failure a run can end with is a [`FinderError`]. Failures below the
//! HTTP layer (the request never produced a status code) are reported as an
//! [`InvokeError`] first and classified by whichever component issued the call.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single bounded HTTP call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// No complete response arrived before the bound expired.
    #[error("no response within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The request could not be delivered or the body could not be read.
    #[error("network error: {0}")]
    Network(String),
}

/// Terminal failure of a nearest-shops run.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The query coordinate was missing or not numeric.
    #[error("invalid query coordinate: {0}")]
    Input(String),

    /// The token endpoint was unreachable or answered with a non-success status.
    #[error("token request failed: {message}")]
    AuthService { message: String },

    /// The shop endpoint answered with a status that cannot be recovered from.
    #[error("{message} (status {status}{})", retry_note(.retried))]
    Api {
        status: u16,
        message: String,
        retried: bool,
    },

    /// The shop endpoint could not be reached at all.
    #[error("shop request failed: {message}")]
    Unreachable { message: String },

    /// A response body did not have the expected shape.
    #[error("unexpected {context} format: {message}")]
    Format { context: String, message: String },

    /// The configuration cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

fn retry_note(retried: &bool) -> &'static str {
    if *retried { ", after retrying" } else { "" }
}

impl FinderError {
    pub fn format(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Format {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Names the stage of the run that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::AuthService { .. } => "authentication",
            Self::Api { .. } | Self::Unreachable { .. } => "shop retrieval",
            Self::Format { .. } => "response format",
            Self::Config(_) | Self::Client(_) => "client setup",
        }
    }

    /// Returns the HTTP status carried by an [`FinderError::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
