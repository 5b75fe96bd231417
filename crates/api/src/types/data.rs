//! Borrowed byte views passed into operations

use core::ops::Deref;

/// Immutable, non-owning view over operation input
///
/// The lifetime ties the view to the caller's buffer, so a view can never
/// outlive the data it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CryptoData<'a> {
    bytes: &'a [u8],
}

impl<'a> CryptoData<'a> {
    /// Wrap a byte slice
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The viewed bytes
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of bytes in the view
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the view is empty
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Deref for CryptoData<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes
    }
}

impl AsRef<[u8]> for CryptoData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for CryptoData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for CryptoData<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for CryptoData<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for CryptoData<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}
