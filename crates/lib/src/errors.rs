use thiserror::Error;

/// The broad category an error belongs to.
///
/// Callers use this to decide how to talk to the user: configuration problems
/// need an operator, auth problems need a new credential, quota and network
/// problems go away by waiting and trying again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Auth,
    QuotaOrRateLimit,
    NotFound,
    Parse,
    Network,
    Validation,
}

/// Errors produced anywhere along the submission pipeline.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{service}: {message}")]
    Auth { service: String, message: String },

    #[error("{service}: {message}")]
    QuotaOrRateLimit { service: String, message: String },

    #[error("{service}: {message}")]
    NotFound { service: String, message: String },

    #[error("{service}: No text detected in the image")]
    NoTextDetected { service: String },

    #[error("{service}: Invalid response format: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("{service}: Failed to parse model output as JSON: {message}")]
    UnparseableModelOutput {
        service: String,
        message: String,
        raw: String,
    },

    #[error("Failed to connect to {service}. Please check your internet connection and try again.")]
    Network {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service}: HTTP {status}: {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Failed to build HTTP client: {0}")]
    ReqwestClientBuild(reqwest::Error),
}

impl SiteError {
    /// Classifies the error into the taxonomy used for user messaging.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiteError::Configuration(_) | SiteError::ReqwestClientBuild(_) => {
                ErrorKind::Configuration
            }
            SiteError::Auth { .. } => ErrorKind::Auth,
            SiteError::QuotaOrRateLimit { .. } => ErrorKind::QuotaOrRateLimit,
            SiteError::NotFound { .. } => ErrorKind::NotFound,
            SiteError::NoTextDetected { .. }
            | SiteError::MalformedResponse { .. }
            | SiteError::UnparseableModelOutput { .. } => ErrorKind::Parse,
            SiteError::Network { .. } => ErrorKind::Network,
            SiteError::Upstream { status, .. } if *status >= 500 => ErrorKind::Network,
            SiteError::Upstream { .. } => ErrorKind::Configuration,
            SiteError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Whether waiting and submitting again may succeed without any other change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::QuotaOrRateLimit | ErrorKind::Network
        )
    }

    /// A short hint telling the user what to do next.
    pub fn remediation(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => "Ask an operator to fix the service configuration.",
            ErrorKind::Auth => "Check or renew the API credential for this service.",
            ErrorKind::QuotaOrRateLimit => "Please wait a moment and try again.",
            ErrorKind::NotFound => "Verify the configured resource identifiers.",
            ErrorKind::Parse => "Try another photo, or enter the details manually.",
            ErrorKind::Network => "Check your internet connection and try again.",
            ErrorKind::Validation => "Correct the highlighted input and submit again.",
        }
    }

    pub fn network(service: &str, source: reqwest::Error) -> Self {
        SiteError::Network {
            service: service.to_string(),
            source,
        }
    }

    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        SiteError::MalformedResponse {
            service: service.to_string(),
            message: message.into(),
        }
    }
}
