#![cfg(any(test, feature = "test-env"))]

use ctor::ctor;

// Initialize a tracing subscriber for test builds so `RUST_LOG=debug` makes
// cache hits/misses and rotation steps visible while debugging a failure.
// `try_init` because integration test binaries may race to install one.
#[ctor]
fn init_test_env() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
