#![allow(dead_code)]

use std::path::PathBuf;

pub use taskchain_test_utils::builders;
pub use taskchain_test_utils::{init_tracing, with_timeout};

/// Path to a sample config under `demos/`.
pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}
