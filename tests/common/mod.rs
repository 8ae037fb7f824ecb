//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use hm_core::comments::HmComment;
use std::path::PathBuf;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Load the comment dump in `tests/fixtures/comments.json`.
///
/// Reply layout:
///
/// ```text
/// c1 ── c2 ┬─ c4
///          └─ c5 ── c6
/// c3
/// ```
#[allow(dead_code)]
pub fn load_fixture_comments() -> Vec<HmComment> {
    let content = std::fs::read_to_string(fixture_path("comments.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}
