//! Auth layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`AuthError::Io`] | `AUTH_IO` | Yes |
//! | [`AuthError::Serialization`] | `AUTH_SERIALIZATION` | No |
//! | [`AuthError::DirectoryCreation`] | `AUTH_DIRECTORY_CREATION` | No |

use std::path::PathBuf;
use thiserror::Error;
use workdesk_types::ErrorCode;

/// Errors raised by session storage.
///
/// An absent or expired session is not an error: [`SessionStore::load`]
/// reports it as `Ok(None)` so callers fail closed into the login
/// redirect instead of surfacing a message.
///
/// [`SessionStore::load`]: crate::SessionStore::load
#[derive(Debug, Error)]
pub enum AuthError {
    /// I/O failure while reading or writing the session entry.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted entry could not be (de)serialized.
    #[error("session entry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage directory could not be created.
    #[error("failed to create session directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AuthError {
    pub(crate) fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "AUTH_IO",
            Self::Serialization(_) => "AUTH_SERIALIZATION",
            Self::DirectoryCreation { .. } => "AUTH_DIRECTORY_CREATION",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Serialization(_) => false,
            Self::DirectoryCreation { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::assert_error_codes;

    fn all_variants() -> Vec<AuthError> {
        vec![
            AuthError::Io(std::io::Error::other("x")),
            AuthError::Serialization(serde_json::from_str::<i32>("x").unwrap_err()),
            AuthError::directory_creation("/tmp/x", std::io::Error::other("x")),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "AUTH_");
    }

    #[test]
    fn io_is_recoverable() {
        assert!(AuthError::Io(std::io::Error::other("x")).is_recoverable());
        assert!(!AuthError::directory_creation("/x", std::io::Error::other("x")).is_recoverable());
    }
}
