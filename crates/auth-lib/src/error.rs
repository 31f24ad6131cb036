// crates/auth-lib/src/error.rs

//! Central error type for the authentication engine.
//!
//! Only hard failures live here: caller programming errors and environment
//! breakage. Expected authentication outcomes (unknown identity, ambiguous
//! identity, wrong credential) are never errors; they are returned as
//! [`credauth_common::AuthResult`] values so callers can render uniform,
//! non-leaking messaging.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Cost or salt out of bounds, missing authenticate inputs, or an
    /// identity record violating the store contract. Fatal to the call and
    /// never retried.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The bcrypt primitive returned malformed output. Indicates platform
    /// breakage, not user error.
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    /// Identity store backend failure
    #[error("Identity store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AuthError::HashingFailure(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_auth_error_display() {
        let config_error = AuthError::InvalidConfig("cost out of range".to_string());
        assert_eq!(
            config_error.to_string(),
            "Invalid configuration: cost out of range"
        );

        let io_error = AuthError::Io(IoError::new(ErrorKind::NotFound, "file not found"));
        assert!(io_error.to_string().contains("IO error"));

        let store_error = AuthError::Store("backend unavailable".to_string());
        assert_eq!(
            store_error.to_string(),
            "Identity store error: backend unavailable"
        );
    }

    #[test]
    fn test_error_from_impls() {
        let io_err = IoError::new(ErrorKind::PermissionDenied, "permission denied");
        let auth_err: AuthError = io_err.into();
        assert!(matches!(auth_err, AuthError::Io(_)));

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let auth_err: AuthError = json_err.into();
        assert!(matches!(auth_err, AuthError::Json(_)));
    }
}
