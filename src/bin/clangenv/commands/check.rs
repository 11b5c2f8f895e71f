//! `clangenv check` command

use anyhow::Result;

use super::load_options;
use crate::cli::ConfigArgs;
use clangenv::ops::configure;

pub fn execute(config: &ConfigArgs) -> Result<()> {
    let configured = configure(&load_options(config)?)?;

    println!(
        "ok: {} at {} ({} tools, clang {})",
        configured.package,
        configured.root,
        configured.tools.len(),
        configured.layout.clang_version
    );

    Ok(())
}
