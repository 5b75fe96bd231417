//! Error handling traits for algorithm implementations

use super::types::{Error, Result};

/// Extension trait for results coming from primitive providers
///
/// Provider crates report failures with their own error types. These helpers
/// fold them into [`Error`] without carrying the provider's message, which may
/// describe input contents.
pub trait ResultExt<T, E>: Sized {
    /// Replace any error with one built by `f`
    fn wrap_err<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> Error;

    /// Replace any error with [`Error::OperationFailed`]
    fn or_operation_failed(self, context: &'static str) -> Result<T>;

    /// Replace any error with [`Error::InvalidKeyData`]
    fn or_invalid_key(self, context: &'static str, message: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for core::result::Result<T, E> {
    fn wrap_err<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> Error,
    {
        self.map_err(|_| f())
    }

    fn or_operation_failed(self, context: &'static str) -> Result<T> {
        self.map_err(|_| Error::OperationFailed { context })
    }

    fn or_invalid_key(self, context: &'static str, message: &'static str) -> Result<T> {
        self.map_err(|_| Error::InvalidKeyData { context, message })
    }
}
