use thiserror::Error;
use url::Url;

use crate::errors::RequestFailure;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("[E006] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://api.example.com/api\n  • Ensure the URL includes the protocol (http:// or https://)")]
    CannotBeBase(Url),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Failure(#[from] RequestFailure),

    #[error("[E007] Malformed response from {url}: {reason}\n\nSuggestions:\n  • Check that the API URL points at the explorer API\n  • Try again later")]
    MalformedResponse { url: Url, reason: String },

    #[error("[E009] Invalid URL format: {0}\n\nSuggestions:\n  • Check the URL format is correct\n  • Use absolute URLs with protocol (http:// or https://)")]
    UrlParse(#[from] url::ParseError),
}

impl ApiClientError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E006",
            Self::Reqwest(_) => "E999", // Network errors get generic code
            Self::Failure(f) => f.error_code(),
            Self::MalformedResponse { .. } => "E007",
            Self::UrlParse(_) => "E009",
        }
    }

    /// Wraps a transport error. The query string, which carries the API key,
    /// is dropped from the URL the error reports.
    pub(crate) fn transport(mut error: reqwest::Error) -> Self {
        if let Some(url) = error.url_mut() {
            url.set_query(None);
        }
        Self::Reqwest(error)
    }

    pub(crate) fn malformed(mut url: Url, reason: impl Into<String>) -> Self {
        url.set_query(None);
        Self::MalformedResponse {
            url,
            reason: reason.into(),
        }
    }
}
