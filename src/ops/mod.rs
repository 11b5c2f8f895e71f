//! High-level operations.
//!
//! This module contains the implementation of clangenv commands.

pub mod configure;
pub mod probe;
pub mod synchronize;

pub use configure::{configure, prepare, ConfigureOptions, Configured, Prepared};
pub use probe::{probe, probe_flags};
pub use synchronize::{synchronize, verify_consistency};
