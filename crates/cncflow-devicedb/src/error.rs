//! Error types for the device database crate.
//!
//! Store errors cover lookup and persistence; profile errors cover form
//! validation.

use std::io;
use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// No record with this ID exists.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A record with this ID already exists.
    #[error("Record already exists: {0}")]
    RecordAlreadyExists(String),

    /// Failed to load records from storage.
    #[error("Failed to load records: {0}")]
    LoadError(String),

    /// Failed to save records to storage.
    #[error("Failed to save records: {0}")]
    SaveError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A form validation error occurred.
    #[error("Validation error: {0}")]
    Validation(#[from] ProfileError),
}

/// Errors raised while validating an update form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The form has not been edited since it was opened.
    #[error("No changes to submit")]
    Pristine,
}

/// Result type alias for record store operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type alias for form validation.
pub type ProfileResult<T> = Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::RecordNotFound("machine-001".to_string());
        assert_eq!(err.to_string(), "Record not found: machine-001");

        let err = DeviceError::SaveError("disk full".to_string());
        assert_eq!(err.to_string(), "Failed to save records: disk full");
    }

    #[test]
    fn test_profile_error_display() {
        let err = ProfileError::MissingField("name".to_string());
        assert_eq!(err.to_string(), "Missing required field: name");
        assert_eq!(ProfileError::Pristine.to_string(), "No changes to submit");
    }

    #[test]
    fn test_error_conversion() {
        let device_err: DeviceError = ProfileError::MissingField("name".to_string()).into();
        assert!(matches!(device_err, DeviceError::Validation(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let device_err: DeviceError = io_err.into();
        assert!(matches!(device_err, DeviceError::IoError(_)));
    }
}
