//! Error codes shared by every error enum that reaches an HTTP response.

/// Grepable error code plus a retry hint.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
