//! Unified error interface for Workdesk.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so the
//! console can log and branch on stable machine-readable codes instead
//! of display strings.
//!
//! # Code Convention
//!
//! - UPPER_SNAKE_CASE, prefixed by domain: `AUTH_`, `API_`, `NOTIFY_`,
//!   `APP_`
//! - Stable once defined (codes are an API contract)
//!
//! # Recoverability
//!
//! An error is recoverable when retrying, or a user action (such as
//! logging back in), may succeed. Validation failures and authorization
//! denials are not recoverable by retry.
//!
//! # Example
//!
//! ```
//! use workdesk_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Timeout,
//!     BadShape,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "API_TIMEOUT",
//!             Self::BadShape => "API_DECODE",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(FetchError::Timeout.code(), "API_TIMEOUT");
//! assert!(FetchError::Timeout.is_recoverable());
//! ```

/// Machine-readable error code contract.
pub trait ErrorCode {
    /// Returns the stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying (or a corrective user action) may
    /// succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows workspace conventions.
///
/// # Panics
///
/// Panics with a descriptive message when the code is empty, lacks the
/// expected prefix or is not UPPER_SNAKE_CASE. Intended for tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Validates every variant of an error enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn trait_reports_code_and_recoverability() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_helpers_accept_valid_codes() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&TestError::Transient, "OTHER_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("API_TIMEOUT"));
        assert!(is_upper_snake_case("A_1"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("api_timeout"));
        assert!(!is_upper_snake_case("_API"));
        assert!(!is_upper_snake_case("API__X"));
    }
}
