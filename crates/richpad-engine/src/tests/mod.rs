//! Shared helpers for unit tests

use std::path::PathBuf;

use tempfile::TempDir;

use crate::keys::{Key, KeyPress};

pub fn create_test_store_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("storage.json")
}

/// Key presses that type `text`
pub fn key_presses(text: &str) -> Vec<KeyPress> {
    text.chars().map(|c| KeyPress::plain(Key::Char(c))).collect()
}
