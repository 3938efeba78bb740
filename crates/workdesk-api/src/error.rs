//! API layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ApiError::Unauthorized`] | `API_UNAUTHORIZED` | Yes (re-login) |
//! | [`ApiError::Validation`] | `API_VALIDATION` | No |
//! | [`ApiError::Status`] | `API_STATUS` | No |
//! | [`ApiError::Network`] | `API_NETWORK` | Yes |
//! | [`ApiError::Decode`] | `API_DECODE` | No |
//!
//! Per the client's error policy there is no automatic retry anywhere;
//! recoverability only informs what the console tells the user.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use workdesk_types::ErrorCode;

/// Field-keyed validation messages from an HTTP 422 response.
///
/// The backend reports Laravel-style bodies:
///
/// ```json
/// { "message": "...", "errors": { "name": ["The name field is required."] } }
/// ```
///
/// Screens render each entry next to the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Returns the messages for one field, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Returns whether any field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Error taxonomy consumed by every screen.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: the session is expired or invalid.
    ///
    /// The caller must clear the persisted session and redirect to
    /// login; recoverable in the sense that logging back in fixes it.
    #[error("session expired or invalid")]
    Unauthorized,

    /// HTTP 422: structured per-field validation messages.
    #[error("validation failed: {errors}")]
    Validation {
        /// Field-keyed messages as returned by the API.
        errors: ValidationErrors,
    },

    /// Any other non-success status.
    #[error("unexpected HTTP status {code}")]
    Status {
        /// The HTTP status code.
        code: u16,
    },

    /// Transport-level failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("response decode error: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Splits a `reqwest::Error` into transport vs body-shape failure.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err)
        } else {
            Self::Network(err)
        }
    }
}

impl ErrorCode for ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "API_UNAUTHORIZED",
            Self::Validation { .. } => "API_VALIDATION",
            Self::Status { .. } => "API_STATUS",
            Self::Network(_) => "API_NETWORK",
            Self::Decode(_) => "API_DECODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Validation { .. } => false,
            Self::Status { .. } => false,
            Self::Network(_) => true,
            Self::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::assert_error_code;

    #[test]
    fn validation_errors_parse_laravel_shape() {
        let json = r#"{"name": ["The name field is required."], "pn": ["Invalid."]}"#;
        let errors: ValidationErrors = serde_json::from_str(json).expect("deserialize");

        assert_eq!(
            errors.field("name"),
            Some(&["The name field is required.".to_string()][..])
        );
        assert!(errors.field("missing").is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn validation_errors_display_joins_fields() {
        let json = r#"{"name": ["required"], "pn": ["invalid"]}"#;
        let errors: ValidationErrors = serde_json::from_str(json).expect("deserialize");
        assert_eq!(errors.to_string(), "name: required; pn: invalid");
    }

    #[test]
    fn codes_are_valid() {
        assert_error_code(&ApiError::Unauthorized, "API_");
        assert_error_code(
            &ApiError::Validation {
                errors: ValidationErrors::default(),
            },
            "API_",
        );
        assert_error_code(&ApiError::Status { code: 500 }, "API_");
    }

    #[test]
    fn unauthorized_is_recoverable_validation_is_not() {
        assert!(ApiError::Unauthorized.is_recoverable());
        assert!(!ApiError::Validation {
            errors: ValidationErrors::default()
        }
        .is_recoverable());
        assert!(!ApiError::Status { code: 500 }.is_recoverable());
    }
}
