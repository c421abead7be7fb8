use thiserror::Error;

/// Classified failures for one draft-generation call. Every failure path out of
/// the orchestrator is one of these kinds; the `Display` text is the user-facing
/// message. Diagnostic payloads (`detail`, `raw`) are logged, never displayed.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("API key is missing. Set GEMINI_API_KEY or run `draft-newsletter key set <key>`.")]
    MissingCredential,

    #[error("{0}")]
    InvalidConfiguration(String),

    #[error(
        "The request timed out. This can happen with complex queries. \
         Please try simplifying your sources."
    )]
    RequestTimeout,

    #[error(
        "An API error occurred while generating the draft. \
         Please check your API key and network connection."
    )]
    BackendError { detail: String },

    #[error(
        "The AI returned an invalid data format. This can happen with complex requests. \
         Please try again or adjust your sources."
    )]
    MalformedResponse { raw: String },
}

/// Transport-level failure reported by a generation backend, before the
/// orchestrator classifies it. Timeouts are split out so the orchestrator can
/// map them to [`DraftError::RequestTimeout`].
#[derive(Debug, Error)]
pub enum BackendFailure {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}
