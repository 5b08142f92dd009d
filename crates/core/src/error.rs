/// Errors raised when caller-supplied input fails a required-field, type or range check.
///
/// Every variant except [`ValidationError::NotAnObject`] names the offending field so the API
/// layer can report it back to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },
    #[error("Invalid type for field {field}: expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
    #[error("Field {field} must not be negative")]
    Negative { field: String },
    #[error("Field {field} is out of range: {reason}")]
    OutOfRange { field: String, reason: String },
    #[error("payload must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }

    pub fn negative(field: impl Into<String>) -> Self {
        Self::Negative {
            field: field.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The name of the field that failed validation, if the error concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidType { field, .. }
            | Self::Negative { field }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::NotAnObject => None,
        }
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
