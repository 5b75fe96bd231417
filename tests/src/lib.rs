//! Test fixtures for webcrypt
//!
//! Shared by the integration tests under `tests/`.


use once_cell::sync::OnceCell;

pub use counting::{Call, CallCounts, CountingImplementation, FakeMaterial};

static TRACING: OnceCell<()> = OnceCell::new();

/// Route `tracing` output through the test harness's captured writer
///
/// `RUST_LOG` overrides the default `debug` filter.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Decode a hex test vector
///
/// # Panics
///
/// Panics on malformed hex; vectors are fixed test data.
pub fn unhex(vector: &str) -> Vec<u8> {
    match hex::decode(vector) {
        Ok(bytes) => bytes,
        Err(err) => panic!("malformed test vector {vector:?}: {err}"),
    }
}
