//! Error type definitions for dispatcher and algorithm operations

use thiserror::Error as ThisError;

/// Primary error type for every webcrypt operation
///
/// The first five variants are raised by the dispatcher's policy layer. The
/// remaining variants are produced by algorithm implementations and are passed
/// through the dispatcher unchanged.
///
/// Messages carried by the data variants are fixed strings written by the
/// implementation. They name the offending field or parameter, never the
/// caller-supplied value.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Internal contract violation, e.g. a key used under a different algorithm
    #[error("unexpected error: {context}")]
    Unexpected { context: &'static str },

    /// Export of a key whose `extractable` flag is false
    #[error("key is not extractable")]
    KeyNotExtractable,

    /// A secret or private key was created without any usages
    #[error("usages cannot be empty when creating a key")]
    CreateKeyEmptyUsages,

    /// The algorithm, format or operation combination is not implemented
    #[error("{operation} is not supported")]
    NotSupported { operation: &'static str },

    /// The key's usage mask does not permit the requested operation
    #[error("key usage {usage} is not allowed")]
    UsageNotAllowed { usage: &'static str },

    /// Malformed key material or key interchange document
    #[error("invalid key data: {context}: {message}")]
    InvalidKeyData {
        context: &'static str,
        message: &'static str,
    },

    /// Bad algorithm parameters
    #[error("invalid parameter: {context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: &'static str,
    },

    /// Input of the wrong length
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The underlying primitive failed, e.g. an authentication tag mismatch
    #[error("operation failed: {context}")]
    OperationFailed { context: &'static str },
}

/// Closed classification of [`Error`] values
///
/// Callers use this to tell programming misuse (`UsageNotAllowed`,
/// `Unexpected`) from environment limits (`NotSupported`) and from bad input
/// (`Data`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unexpected,
    KeyNotExtractable,
    CreateKeyEmptyUsages,
    NotSupported,
    UsageNotAllowed,
    Data,
    Operation,
}

/// Result type for webcrypt operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::NotSupported`] error
    pub const fn not_supported(operation: &'static str) -> Self {
        Self::NotSupported { operation }
    }

    /// Shorthand for a [`Error::InvalidParameter`] error
    pub const fn param(context: &'static str, message: &'static str) -> Self {
        Self::InvalidParameter { context, message }
    }

    /// Shorthand for a [`Error::InvalidKeyData`] error
    pub const fn key_data(context: &'static str, message: &'static str) -> Self {
        Self::InvalidKeyData { context, message }
    }

    /// Returns the closed kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unexpected { .. } => ErrorKind::Unexpected,
            Self::KeyNotExtractable => ErrorKind::KeyNotExtractable,
            Self::CreateKeyEmptyUsages => ErrorKind::CreateKeyEmptyUsages,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
            Self::UsageNotAllowed { .. } => ErrorKind::UsageNotAllowed,
            Self::InvalidKeyData { .. }
            | Self::InvalidParameter { .. }
            | Self::InvalidLength { .. } => ErrorKind::Data,
            Self::OperationFailed { .. } => ErrorKind::Operation,
        }
    }

    /// Whether the error was caused by the caller's request rather than the
    /// environment
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::NotSupported | ErrorKind::Operation | ErrorKind::CreateKeyEmptyUsages
        )
    }
}
