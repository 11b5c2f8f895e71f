//! Core data structures.
//!
//! Options and their catalog, build settings and package identity.

pub mod catalog;
pub mod options;
pub mod package_id;
pub mod package_ref;
pub mod sanitizer;
pub mod settings;

pub use catalog::{OptionKind, OptionScope, OptionSpec};
pub use options::{OptionSet, OptionValue};
pub use package_id::package_id;
pub use package_ref::PackageRef;
pub use sanitizer::{SanitizerFlavor, SanitizerMode};
pub use settings::{CompilerFamily, CppRuntime, Settings};
