use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Units document error: {message}")]
    DocumentError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that ended with this severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl RankError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RankError::ConfigValidationError { .. }
            | RankError::InvalidConfigValueError { .. }
            | RankError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RankError::DocumentError { .. }
            | RankError::SerializationError(_)
            | RankError::ValidationError { .. } => ErrorCategory::Input,
            RankError::ProcessingError { .. } | RankError::CsvError(_) => {
                ErrorCategory::Processing
            }
            RankError::ZipError(_) | RankError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RankError::ValidationError { .. } => ErrorSeverity::Medium,
            RankError::IoError(_) | RankError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags or the TOML configuration file"
            }
            ErrorCategory::Input => {
                "Make sure the units file is valid JSON with a units collection or a years map"
            }
            ErrorCategory::Processing => "Re-run with --verbose to see which unit failed",
            ErrorCategory::Output => {
                "Check that the output path exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RankError::IoError(e) => format!("Could not read or write a file: {}", e),
            RankError::SerializationError(e) => format!("The units file is not valid JSON: {}", e),
            RankError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
