//! Custom error types for translation operations

use thiserror::Error;

/// Ways a single translation call can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationFailure {
    /// Credential is empty or still the shipped placeholder
    #[error("API key not configured or is a placeholder")]
    MissingCredential,

    /// Transport-level failure (DNS, refused connection, timeout)
    #[error("Network error: {message}")]
    NetworkError {
        /// What the transport reported
        message: String,
    },

    /// Endpoint answered with a non-success status
    #[error("HTTP error: {status} {status_text}")]
    HttpError {
        /// Numeric status code
        status: u16,
        /// Reason phrase for the code
        status_text: String,
    },

    /// Body could not be interpreted as a translation
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Which part of the body was unusable
        message: String,
    },
}

impl TranslationFailure {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            TranslationFailure::MissingCredential => "missing_credential",
            TranslationFailure::NetworkError { .. } => "network_error",
            TranslationFailure::HttpError { .. } => "http_error",
            TranslationFailure::MalformedResponse { .. } => "malformed_response",
        }
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        // reqwest embeds the full URL in its Display output, and the URL
        // carries the credential and the text.
        let err = err.without_url();
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        TranslationFailure::NetworkError { message }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        TranslationFailure::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationFailure>;
