//! Built-in failure kinds.
//!
//! These are ordinary [`FailureKind`](crate::FailureKind) implementors; the
//! runtime gives them no special treatment beyond [`InvalidOperation`]
//! standing in for intercepted native panics.

use crate::value::{IntoValue, Value};
use crate::FailureKind;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(". {}", message)
    }
}

fn cause_suffix(cause: &Option<Cause>) -> String {
    match cause {
        Some(c) => format!(", cause: {}", c),
        None => String::new(),
    }
}

/// A required argument was absent.
#[derive(Debug, Clone, PartialEq, thiserror::Error, FailureKind)]
#[error("NullArgument: parameter '{param}' cannot be null{}", message_suffix(.message))]
pub struct NullArgument {
    pub param: String,
    pub message: String,
}

impl NullArgument {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// An argument fell outside its accepted range.
#[derive(Debug, Clone, PartialEq, thiserror::Error, FailureKind)]
#[error(
    "OutOfRange: parameter '{param}' with value '{value}' is out of range{}",
    message_suffix(.message)
)]
pub struct OutOfRange {
    pub param: String,
    pub value: Value,
    pub message: String,
}

impl OutOfRange {
    pub fn new(param: impl Into<String>, value: impl IntoValue, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            value: value.into_value(),
            message: message.into(),
        }
    }
}

/// An operation was invalid in the current state.
///
/// Also the kind given to intercepted native panics, carrying the panic
/// payload's text.
#[derive(Debug, Clone, PartialEq, thiserror::Error, FailureKind)]
#[error("InvalidOperation: {message}")]
pub struct InvalidOperation {
    pub message: String,
}

impl InvalidOperation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A file could not be read, written or found.
#[derive(Debug, thiserror::Error, FailureKind)]
#[error("FileError: {message} (file: {filename}{})", cause_suffix(.cause))]
pub struct FileError {
    pub filename: String,
    pub message: String,
    #[source]
    pub cause: Option<Cause>,
}

impl FileError {
    pub fn new(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the native error that caused this failure.
    pub fn caused_by(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// A remote endpoint failed or was unreachable.
#[derive(Debug, thiserror::Error, FailureKind)]
#[error("NetworkError: {message} (endpoint: {endpoint}{})", cause_suffix(.cause))]
pub struct NetworkError {
    /// URL, host:port, or status line.
    pub endpoint: String,
    pub message: String,
    #[source]
    pub cause: Option<Cause>,
}

impl NetworkError {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the native error that caused this failure.
    pub fn caused_by(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_null_argument_render() {
        let k = NullArgument::new("user", "");
        assert_eq!(k.render(), "NullArgument: parameter 'user' cannot be null");
        let k = NullArgument::new("user", "login requires a user");
        assert_eq!(
            k.render(),
            "NullArgument: parameter 'user' cannot be null. login requires a user"
        );
        assert_eq!(k.kind_name(), "NullArgument");
    }

    #[test]
    fn test_out_of_range_render() {
        let k = OutOfRange::new("index", 10, "max is 5");
        assert_eq!(
            k.render(),
            "OutOfRange: parameter 'index' with value '10' is out of range. max is 5"
        );
        assert_eq!(k.value, 10i64);
    }

    #[test]
    fn test_file_error_cause() {
        let k = FileError::new("config.toml", "cannot open");
        assert_eq!(k.render(), "FileError: cannot open (file: config.toml)");
        assert!(k.source().is_none());

        let k = k.caused_by(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert_eq!(
            k.render(),
            "FileError: cannot open (file: config.toml, cause: no such file)"
        );
        assert!(k.source().is_some());
    }

    #[test]
    fn test_network_error_render() {
        let k = NetworkError::new("https://api.example.com", "timeout");
        assert_eq!(
            k.render(),
            "NetworkError: timeout (endpoint: https://api.example.com)"
        );
        assert_eq!(k.kind_name(), "NetworkError");
    }

    #[test]
    fn test_render_is_stable() {
        let k = InvalidOperation::new("not connected");
        assert_eq!(k.render(), k.render());
        assert_eq!(k.kind_name(), k.kind_name());
    }
}
