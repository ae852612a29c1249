//! Error types for prescheduling operations.

/// Result type for prescheduling operations
pub type PreschedResult<T> = Result<T, PreschedError>;

/// Error type for prescheduling operations
///
/// The scheduling algorithms themselves never fail; these errors come from
/// loading inputs, building configuration and shaping the visibility grid.
#[derive(Debug, thiserror::Error)]
pub enum PreschedError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Grid error: {0}")]
    GridError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<String> for PreschedError {
    fn from(s: String) -> Self {
        PreschedError::InvalidInput(s)
    }
}

impl From<&str> for PreschedError {
    fn from(s: &str) -> Self {
        PreschedError::InvalidInput(s.to_string())
    }
}

impl From<std::io::Error> for PreschedError {
    fn from(e: std::io::Error) -> Self {
        PreschedError::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = PreschedError::GridError("column 'mjd' is empty".to_string());
        assert_eq!(err.to_string(), "Grid error: column 'mjd' is empty");
    }

    #[test]
    fn test_from_str_is_invalid_input() {
        let err: PreschedError = "bad".into();
        assert!(matches!(err, PreschedError::InvalidInput(_)));
    }
}
