#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn resource(name: &str) -> PathBuf {
    let project_root = env::var("CARGO_MANIFEST_DIR").unwrap();
    PathBuf::from(project_root).join("tests/resources").join(name)
}

/// Fresh scratch directory, removed when dropped
pub fn scratch() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Copy a fixture into `dir` under `name`
pub fn install(dir: &Path, resource_name: &str, name: &str) -> PathBuf {
    let dst = dir.join(name);
    fs::copy(resource(resource_name), &dst).unwrap();
    dst
}

pub fn assert_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len(), "{:?} vs {:?}", a, b);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-5, "{} vs {}", x, y);
    }
}
