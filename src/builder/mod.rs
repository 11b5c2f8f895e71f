//! Toolchain environment construction.
//!
//! Resolves the tools of an LLVM installation and composes the flags and
//! environment a consuming build runs with.

pub mod env;
pub mod flags;
pub mod toolchain;

pub use env::{EnvMap, EnvValue};
pub use flags::{compose, ComposeOptions, FlagBundle, InheritedFlags};
pub use toolchain::{resolve, ToolMap, ToolName, ToolchainLayout, ToolchainRoot};
