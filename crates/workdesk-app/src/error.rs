//! Application layer errors.
//!
//! The app layer composes the auth, API and notify layers, so its
//! error is a sum over theirs. Codes and recoverability delegate to
//! the wrapped error; the `APP_` prefix marks the layer the failure
//! surfaced from.

use thiserror::Error;
use workdesk_api::ApiError;
use workdesk_auth::AuthError;
use workdesk_notify::NotifyError;
use workdesk_types::ErrorCode;

/// Failure in one of the composed client layers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session storage failed.
    #[error("session storage failed: {0}")]
    Auth(#[from] AuthError),

    /// An API call failed.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    /// The realtime connection failed.
    #[error("realtime connection failed: {0}")]
    Notify(#[from] NotifyError),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "APP_AUTH",
            Self::Api(_) => "APP_API",
            Self::Notify(_) => "APP_NOTIFY",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Auth(err) => err.is_recoverable(),
            Self::Api(err) => err.is_recoverable(),
            Self::Notify(err) => err.is_recoverable(),
        }
    }
}
