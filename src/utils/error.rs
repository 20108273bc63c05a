use thiserror::Error;

#[derive(Error, Debug)]
pub enum GistError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Document store returned {status} for {url}")]
    FetchError { url: String, status: u16 },

    #[error("Gist not found: {id}")]
    PostNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GistError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GistError::ConfigError { .. }
            | GistError::ConfigValidationError { .. }
            | GistError::InvalidConfigValueError { .. }
            | GistError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GistError::HttpError(_) | GistError::FetchError { .. } => ErrorCategory::Network,
            GistError::IoError(_) | GistError::ZipError(_) => ErrorCategory::Storage,
            GistError::CsvError(_)
            | GistError::SerializationError(_)
            | GistError::PostNotFound { .. }
            | GistError::ValidationError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GistError::PostNotFound { .. } | GistError::ValidationError { .. } => {
                ErrorSeverity::Low
            }
            GistError::HttpError(_) | GistError::FetchError { .. } => ErrorSeverity::Medium,
            GistError::CsvError(_)
            | GistError::SerializationError(_)
            | GistError::ConfigError { .. }
            | GistError::ConfigValidationError { .. }
            | GistError::InvalidConfigValueError { .. }
            | GistError::MissingConfigError { .. } => ErrorSeverity::High,
            GistError::IoError(_) | GistError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GistError::HttpError(_) => {
                "Check network connectivity and that the document store URL is reachable".to_string()
            }
            GistError::FetchError { status, .. } if *status == 401 || *status == 403 => {
                "The document store rejected the request; check its read rules".to_string()
            }
            GistError::FetchError { .. } => {
                "Verify the endpoint points at the database root (no trailing .json)".to_string()
            }
            GistError::IoError(_) | GistError::ZipError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            GistError::SerializationError(_) | GistError::CsvError(_) => {
                "The snapshot is not a valid blogPosts/postViews export".to_string()
            }
            GistError::PostNotFound { id } => {
                format!("List available ids in index.json; '{}' does not exist", id)
            }
            GistError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file or command line", field)
            }
            GistError::ConfigError { .. }
            | GistError::ConfigValidationError { .. }
            | GistError::InvalidConfigValueError { .. } => {
                "Review the configuration file against the documented sections".to_string()
            }
            GistError::ValidationError { .. } => "Fix the highlighted fields and retry".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GistError::PostNotFound { .. } => "Gist not found".to_string(),
            GistError::HttpError(_) | GistError::FetchError { .. } => {
                "Error loading content from the document store".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GistError>;
