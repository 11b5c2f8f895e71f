//! clangenv - build environments from a prebuilt LLVM/Clang toolchain
//!
//! This crate provides the library side of clangenv: the option catalog
//! shared with the LLVM package, option synchronisation, toolchain
//! resolution and composition of compiler and linker flags.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for clangenv unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It builds fake toolchain installations on disk.
#[cfg(test)]
pub mod test_support;

pub use builder::{FlagBundle, ToolchainLayout, ToolchainRoot};
pub use core::{OptionSet, OptionValue, PackageRef, Settings};
pub use ops::{configure, ConfigureOptions, Configured};
pub use util::config::Config;
