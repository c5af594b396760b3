//! Tracing initialization for binaries and tests.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes structured logging for a binary.
///
/// The default filter shows `info` and above for the given service and the
/// core crate; override with the `RUST_LOG` environment variable.
pub fn init_tracing(service: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{service}=info,brewline=info"))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// Guards the global subscriber installation for test binaries.
static TEST_TRACING: Once = Once::new();

/// Initializes tracing once for the whole test binary.
///
/// Tests share a process, so the global subscriber must only be installed
/// once; later calls are no-ops.
pub fn init_test_tracing() {
    TEST_TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .init();
    });
}
