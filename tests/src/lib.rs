//! IoC Testing Framework
//!
//! Fixtures and mock backends for exercising the container end to end
//! without hand-wiring accessors in every test.

pub mod backend;

pub use backend::{FailingBackend, RecordingBackend};
pub use fixtures::{Vector, movable_contract, register_accessors, ship};

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn` so test output stays quiet.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Assert that a scope holds exactly `n` entries.
#[macro_export]
macro_rules! assert_scope_len {
    ($scope:expr, $expected:expr) => {
        let len = $scope.len();
        assert_eq!(
            len,
            $expected,
            "Expected scope {} to hold {} entries, but it holds {}: {:?}",
            $scope.id(),
            $expected,
            len,
            $scope.keys()
        );
    };
}

/// Assert that resolving `key` fails with `DependencyNotFound` for that key.
#[macro_export]
macro_rules! assert_not_found {
    ($container:expr, $key:expr) => {
        match $container.resolve($key, &[]) {
            Err(err) => assert!(
                err.is_not_found($key),
                "Expected '{}' to be missing, got error: {err}",
                $key
            ),
            Ok(_) => panic!("Expected '{}' to be missing, but it resolved", $key),
        }
    };
}
