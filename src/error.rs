use thiserror::Error;

use crate::resolver::Stage;

#[derive(Debug, Error)]
pub enum PodError {
    #[error("Invalid POD format: {0}. Expected format: ITxxxExxxxxxxx")]
    InvalidInput(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout: request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("API error ({code}): {message}")]
    ApiError {
        code: String,
        message: String,
        hint: Option<String>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP session already closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("POD resolution failed while {stage}: {source}")]
    Resolution {
        stage: Stage,
        #[source]
        source: Box<PodError>,
    },
}

impl PodError {
    /// Create an API error with an optional hint
    pub fn api_error(code: impl Into<String>, message: impl Into<String>, hint: Option<String>) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
            hint,
        }
    }

    /// Wrap a stage failure into the uniform resolution error
    pub fn resolution(stage: Stage, source: PodError) -> Self {
        Self::Resolution {
            stage,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through any resolution wrapper
    pub fn root_cause(&self) -> &PodError {
        match self {
            Self::Resolution { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the error is a resolution failure (as opposed to invalid input)
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    /// Whether the error is a lookup that matched nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::NotFound(_))
    }

    /// Check if the error is a transport-level failure
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Network(_) | Self::Timeout(_) | Self::HttpStatus { .. }
        )
    }

    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::InvalidInput(_) => Some(
                "A POD code is 'IT', three digits, 'E' and eight digits, e.g. IT001E12345678".to_string(),
            ),
            Self::MissingArgument(_) => Some("Usage: gse-pod <POD>, e.g. gse-pod IT001E12345678".to_string()),
            Self::ApiError { hint, .. } => hint.clone(),
            Self::Network(_) | Self::HttpStatus { .. } => {
                Some("Check your internet connection and try again.".to_string())
            }
            Self::Timeout(_) => Some(
                "The GSE service is slow to answer. Raise the limit with --timeout or 'gse-pod config set gse.timeout 60'.".to_string(),
            ),
            Self::NotFound(_) => Some(
                "The GSE service has no record for this code. Check the POD printed on your bill.".to_string(),
            ),
            Self::Resolution { source, .. } => source.hint(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PodError>;
