//! Error types for objkopy

use thiserror::Error;

/// Boxed underlying cause carried by wrapped errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for copy operations
#[derive(Debug, Error)]
pub enum CopyError {
    /// The object to copy was absent
    #[error("Source object is absent")]
    NullSource,

    /// The caller-supplied destination was absent
    #[error("Destination object is absent")]
    NullDestination,

    /// A batch copy was asked to copy nothing
    #[error("Nothing to copy: {0}")]
    EmptyInput(String),

    /// Destination type has no usable default form
    #[error("Cannot instantiate {type_name}: {reason}")]
    Uninstantiable {
        type_name: &'static str,
        reason: String,
    },

    /// Serialization backend round-trip failed
    #[error("Serialization failed: {message}")]
    Serialization {
        message: String,
        #[source]
        source: BoxError,
    },

    /// A value could not be assigned to a field of the given type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Copying one field failed; the whole copy is aborted
    #[error("Failed to copy field '{field}' into {type_name}")]
    Field {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: Box<CopyError>,
    },

    /// A descriptor named a field the type does not expose
    #[error("Field '{field}' is not declared by {type_name}")]
    UnknownField {
        type_name: &'static str,
        field: &'static str,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`CopyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullSource,
    NullDestination,
    EmptyInput,
    Uninstantiable,
    SerializationFailure,
    Assignment,
    Config,
    Io,
}

impl CopyError {
    /// Create an Uninstantiable error
    pub fn uninstantiable(type_name: &'static str, reason: impl Into<String>) -> Self {
        CopyError::Uninstantiable {
            type_name,
            reason: reason.into(),
        }
    }

    /// Create a Serialization error wrapping the backend's cause
    pub fn serialization(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CopyError::Serialization {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Wrap this error as the cause of a failed field copy
    pub fn in_field(self, type_name: &'static str, field: &'static str) -> Self {
        CopyError::Field {
            type_name,
            field,
            source: Box::new(self),
        }
    }

    /// Kind of this error; field errors report the kind of their cause
    pub fn kind(&self) -> ErrorKind {
        match self {
            CopyError::NullSource => ErrorKind::NullSource,
            CopyError::NullDestination => ErrorKind::NullDestination,
            CopyError::EmptyInput(_) => ErrorKind::EmptyInput,
            CopyError::Uninstantiable { .. } => ErrorKind::Uninstantiable,
            CopyError::Serialization { .. } => ErrorKind::SerializationFailure,
            CopyError::TypeMismatch { .. } | CopyError::UnknownField { .. } => {
                ErrorKind::Assignment
            }
            CopyError::Field { source, .. } => source.kind(),
            CopyError::Config(_) => ErrorKind::Config,
            CopyError::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this error comes from how the engine was called
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NullSource | ErrorKind::NullDestination | ErrorKind::EmptyInput
        )
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, CopyError::Config(_))
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        if source.is_some() {
            output.push_str("\nCaused by:");
        }
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for copy operations
pub type Result<T> = std::result::Result<T, CopyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind as IoErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(IoErrorKind::NotFound, "config not found");
        let error: CopyError = io_error.into();

        assert!(matches!(error, CopyError::Io(_)));
        assert!(error.to_string().contains("IO error"));
        assert_eq!(error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_usage_errors() {
        assert!(CopyError::NullSource.is_usage_error());
        assert!(CopyError::NullDestination.is_usage_error());
        assert!(CopyError::EmptyInput("no elements".to_string()).is_usage_error());
        assert!(!CopyError::Config("bad".to_string()).is_usage_error());
    }

    #[test]
    fn test_uninstantiable_message() {
        let error = CopyError::uninstantiable("Session", "no default constructor");
        assert!(error.to_string().contains("Session"));
        assert!(error.to_string().contains("no default constructor"));
        assert_eq!(error.kind(), ErrorKind::Uninstantiable);
    }

    #[test]
    fn test_field_error_delegates_kind() {
        let inner = CopyError::TypeMismatch {
            expected: "i32",
            found: "text",
        };
        let error = inner.in_field("Foo", "count");

        assert_eq!(error.kind(), ErrorKind::Assignment);
        assert!(error.to_string().contains("count"));
        assert!(error.to_string().contains("Foo"));
    }

    #[test]
    fn test_serialization_error_keeps_cause() {
        let cause = serde_json::from_str::<i32>("not json").unwrap_err();
        let error = CopyError::serialization("failed to decode i32", cause);

        assert_eq!(error.kind(), ErrorKind::SerializationFailure);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_format_detailed_walks_chain() {
        let cause = serde_json::from_str::<i32>("[").unwrap_err();
        let error = CopyError::serialization("failed to decode i32", cause).in_field("Foo", "bar");
        let detailed = error.format_detailed();

        assert!(detailed.starts_with("Error: Failed to copy field 'bar'"));
        assert!(detailed.contains("Caused by:\n  1: Serialization failed"));
        assert!(detailed.contains("\n  2: "));
        assert_eq!(detailed.matches("Caused by:").count(), 1);
    }

    #[test]
    fn test_format_detailed_without_cause() {
        let detailed = CopyError::NullSource.format_detailed();
        assert!(!detailed.contains("Caused by:"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner_function() -> Result<()> {
            Err(CopyError::Config("test error".to_string()))
        }

        fn outer_function() -> Result<()> {
            inner_function()?;
            Ok(())
        }

        let result = outer_function();
        assert!(matches!(result.unwrap_err(), CopyError::Config(_)));
    }
}
