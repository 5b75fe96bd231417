//! Validation utilities shared by algorithm implementations

use super::{Error, Result};

/// Validate a parameter condition
#[inline(always)]
pub fn parameter(condition: bool, context: &'static str, message: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::param(context, message));
    }
    Ok(())
}

/// Validate a key data condition
#[inline(always)]
pub fn key_data(condition: bool, context: &'static str, message: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::key_data(context, message));
    }
    Ok(())
}

/// Validate an exact length
#[inline(always)]
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidLength {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate a minimum length
#[inline(always)]
pub fn min_length(context: &'static str, actual: usize, min: usize) -> Result<()> {
    if actual < min {
        return Err(Error::InvalidLength {
            context,
            expected: min,
            actual,
        });
    }
    Ok(())
}

/// Validate that a bit length is a whole, non-zero number of bytes
///
/// Returns the length in bytes.
#[inline]
pub fn whole_bytes(context: &'static str, length_bits: u32) -> Result<usize> {
    parameter(length_bits != 0, context, "length must not be zero")?;
    parameter(
        length_bits % 8 == 0,
        context,
        "length must be a multiple of 8 bits",
    )?;
    Ok((length_bits / 8) as usize)
}
