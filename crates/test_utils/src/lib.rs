//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! surveillance workflow test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for forms, people, and org trees
//! - `builders`: Builder patterns for test data construction
//! - `adapters`: In-memory implementations of the domain ports

pub mod adapters;
pub mod builders;
pub mod fixtures;

pub use adapters::*;
pub use builders::*;
pub use fixtures::*;

use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
});

/// Initializes a tracing subscriber once for the whole test binary
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
