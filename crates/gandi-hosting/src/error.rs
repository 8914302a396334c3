//! Hosting error types

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the transport that carries RPC calls to the remote API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Hosting errors
///
/// Every failing operation returns one of these variants. None of them is
/// retried internally; they abort whatever workflow produced them.
#[derive(Error, Debug)]
pub enum HostingError {
    /// A required field is missing or an enumeration value is out of range
    #[error("{operation}: {resource}.{field}: {reason}")]
    Validation {
        operation: &'static str,
        resource: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Two resources taking part in the same operation live in different regions
    #[error(
        "{operation}: region mismatch between {left} (region {left_region}) and {right} (region {right_region})"
    )]
    RegionMismatch {
        operation: &'static str,
        left: &'static str,
        left_region: String,
        right: &'static str,
        right_region: String,
    },

    /// A value could not be translated between its domain and wire forms
    #[error("Cannot parse {what}: {value}")]
    Parse { what: String, value: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A remote operation reached a terminal status other than DONE
    #[error("Operation {op_id} failed with status {status}")]
    OperationFailed { op_id: i64, status: String },

    #[error("Operation {op_id} still {status} after {waited:?}")]
    OperationTimeout {
        op_id: i64,
        status: String,
        waited: Duration,
    },

    #[error("Waiting for operation {op_id} was cancelled")]
    Cancelled { op_id: i64 },

    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HostingError {
    /// A mandatory field was left empty
    pub fn missing(operation: &'static str, resource: &'static str, field: &'static str) -> Self {
        Self::Validation {
            operation,
            resource,
            field,
            reason: "required but not provided".to_string(),
        }
    }

    /// A field holds a value outside of its accepted range
    pub fn invalid(
        operation: &'static str,
        resource: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            operation,
            resource,
            field,
            reason: reason.into(),
        }
    }

    pub fn parse(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            value: value.into(),
        }
    }

    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    /// True when the error was raised locally, before anything was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::RegionMismatch { .. } | Self::Parse { .. }
        )
    }
}

impl From<serde_json::Error> for HostingError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("wire response", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HostingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(HostingError::missing("CreateVM", "VMSpec", "RegionID").is_precondition());
        assert!(HostingError::parse("VM.ID", "abc").is_precondition());
        assert!(
            !HostingError::OperationFailed {
                op_id: 1,
                status: "ERROR".to_string()
            }
            .is_precondition()
        );
        assert!(!HostingError::from(TransportError::Connection("refused".into())).is_precondition());
    }

    #[test]
    fn test_error_messages() {
        let err = HostingError::RegionMismatch {
            operation: "AttachDisk",
            left: "VM",
            left_region: "3".to_string(),
            right: "Disk",
            right_region: "4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "AttachDisk: region mismatch between VM (region 3) and Disk (region 4)"
        );

        let err = HostingError::OperationFailed {
            op_id: 1337,
            status: "ERROR".to_string(),
        };
        assert_eq!(err.to_string(), "Operation 1337 failed with status ERROR");
    }
}
