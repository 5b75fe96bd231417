//! One-time crypto platform initialization
//!
//! The first caller probes the operating system's entropy source. Later
//! callers, including concurrent ones, observe the stored outcome.

use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rand::RngCore;
use webcrypt_api::{Error, Result};

static PLATFORM: OnceCell<bool> = OnceCell::new();

/// Initialize the platform if this has not happened yet
///
/// Idempotent; the probe runs at most once per process.
pub fn init() -> Result<()> {
    let ready = *PLATFORM.get_or_init(|| {
        let mut probe = [0u8; 16];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => {
                tracing::info!("crypto platform initialized");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "entropy source unavailable");
                false
            }
        }
    });

    if ready {
        Ok(())
    } else {
        Err(Error::OperationFailed { context: "platform initialization" })
    }
}

/// Whether [`init`] has run
pub fn is_initialized() -> bool {
    PLATFORM.get().is_some()
}
