//! `clangenv probe` command
//!
//! Runs a probe executable in the exported environment.

use anyhow::Result;

use super::load_options;
use crate::cli::{ConfigArgs, ProbeArgs};
use clangenv::ops::{configure, probe};

pub fn execute(args: ProbeArgs, config: &ConfigArgs) -> Result<()> {
    let configured = configure(&load_options(config)?)?;
    let sanitized = !configured.settings.sanitizer.is_none();

    probe(
        &args.binary,
        &configured.bundle,
        &configured.root,
        &configured.layout,
        sanitized,
        args.source.as_deref(),
    )?;

    println!("probe {} passed", args.binary.display());
    Ok(())
}
