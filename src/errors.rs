use reqwest::StatusCode;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

use crate::api::ApiClientError;
use crate::session::Step;

/// A non-success HTTP answer from the explorer.
#[derive(Debug, Error)]
pub struct RequestFailure {
    pub url: Url,
    pub status: StatusCode,
    pub msg: String,
}

impl RequestFailure {
    /// The query string is dropped from `url`, it carries the API key.
    pub fn new(mut url: Url, status: StatusCode, msg: impl Into<String>) -> Self {
        url.set_query(None);
        Self {
            url,
            status,
            msg: msg.into(),
        }
    }

    pub const fn error_code(&self) -> &'static str {
        "E002"
    }

    fn suggestions(&self) -> &'static [&'static str] {
        match self.status {
            StatusCode::NOT_FOUND => &[
                "Check that the URL is correct",
                "Verify that the selected network is the one the contract is deployed on",
            ],
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => &[
                "Check that the API key for this network is set",
                "Verify that the API key hasn't expired",
            ],
            StatusCode::TOO_MANY_REQUESTS => &[
                "Wait a moment before retrying",
                "Consider reducing request frequency",
            ],
            status if status.is_server_error() => &[
                "The explorer is having trouble, try again later",
                "Check the explorer status page",
            ],
            _ => &["Check your network connection", "Try submitting again"],
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[{}] Request to {} failed with status {}",
            self.error_code(),
            self.url,
            self.status
        )?;

        if !self.msg.is_empty() {
            writeln!(formatter, "Server response: {}", self.msg)?;
        }

        write!(formatter, "\nSuggestions:")?;
        for suggestion in self.suggestions() {
            write!(formatter, "\n  • {suggestion}")?;
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error("[E030] {field} can't be set while the session is at step {step}\n\nSuggestions:\n  • Complete the earlier steps first\n  • Use back to return to the step that owns this field")]
    OutOfOrder { field: &'static str, step: Step },

    #[error("[E031] Step {0} was reached with earlier details missing\n\nSuggestions:\n  • Go back and fill in the missing details\n  • Start over if the problem persists")]
    Incomplete(Step),

    #[error("[E032] No explorer is bound for the session\n\nSuggestions:\n  • Select a network before continuing")]
    NoExplorer,
}

impl SessionError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.error_code(),
            Self::OutOfOrder { .. } => "E030",
            Self::Incomplete(_) => "E031",
            Self::NoExplorer => "E032",
        }
    }
}
