//! Test utilities for clangenv unit tests.
//!
//! This module is only compiled for tests. It builds fake LLVM
//! installations on disk so resolution and composition can run against a
//! real directory tree.
//!
//! # Example
//!
//! ```rust,ignore
//! use clangenv::test_support::ToolchainFixture;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ToolchainFixture::complete().with_runtime("libclang_rt.asan-x86_64.so");
//!     let tools = resolve(&fixture.root(), &fixture.layout(), true).unwrap();
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;

/// Write an executable shell script.
#[cfg(unix)]
pub fn write_script(path: &std::path::Path, body: &str) {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}
