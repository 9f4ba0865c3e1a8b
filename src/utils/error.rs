use crate::domain::model::Role;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("Insufficient fields: got {dimensions} dimension(s) and {metrics} metric(s), need at least 3 and 1")]
    InsufficientFields { dimensions: usize, metrics: usize },

    #[error("Field '{id}' is declared as {declared} but sits in the {expected} position")]
    MisorderedField {
        id: String,
        expected: Role,
        declared: Role,
    },

    #[error("Field '{id}' is bound to both {first} and {second}")]
    DuplicateField { id: String, first: Role, second: Role },

    #[error("Invalid field for {role}: {reason}")]
    InvalidField { role: Role, reason: String },

    #[error("Required role {0} is not bound")]
    MissingRole(Role),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Feed error: {message}")]
    FeedError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Binding,
    Configuration,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatementError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientFields { .. }
            | Self::MisorderedField { .. }
            | Self::DuplicateField { .. }
            | Self::InvalidField { .. }
            | Self::MissingRole(_) => ErrorCategory::Binding,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::SerializationError(_) | Self::FeedError { .. } => {
                ErrorCategory::Input
            }
            Self::IoError(_) | Self::RenderError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Binding problems surface as an empty state, not a failed run.
            ErrorCategory::Binding => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn is_binding_error(&self) -> bool {
        self.category() == ErrorCategory::Binding
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InsufficientFields { .. } => {
                "Not enough fields are bound to build a statement.".to_string()
            }
            Self::MisorderedField { id, expected, .. } => {
                format!("Field '{}' is in the wrong position (expected {}).", id, expected)
            }
            Self::DuplicateField { id, .. } => format!("Field '{}' is bound more than once.", id),
            Self::InvalidField { role, .. } => format!("The field bound to {} is invalid.", role),
            Self::MissingRole(role) => format!("No field is bound to {}.", role),
            Self::CsvError(_) => "The CSV input could not be read.".to_string(),
            Self::IoError(_) => "A file could not be read or written.".to_string(),
            Self::SerializationError(_) => "The JSON input is malformed.".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, .. } => {
                format!("Configuration field '{}' is invalid.", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}': {}", field, reason)
            }
            Self::FeedError { message } => format!("Input problem: {}", message),
            Self::RenderError { message } => format!("Output problem: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Binding => {
                "Bind contact, due date and link as the first three dimensions and the amount as the first metric"
            }
            ErrorCategory::Configuration => "Check the TOML configuration file and command line flags",
            ErrorCategory::Input => "Check that the input file exists and matches the expected format",
            ErrorCategory::Output => "Check that the output destination is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, StatementError>;
