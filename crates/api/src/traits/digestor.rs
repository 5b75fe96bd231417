//! Streaming hash interface

use crate::error::Result;

/// Incremental hash bound to one digest algorithm
///
/// Feed data with [`Digestor::update`] any number of times, then call
/// [`Digestor::finish`] once. Calls after `finish` fail.
pub trait Digestor: Send {
    /// Absorb more input
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Produce the digest of everything absorbed so far
    fn finish(&mut self) -> Result<Vec<u8>>;
}
