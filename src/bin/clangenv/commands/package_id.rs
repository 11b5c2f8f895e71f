//! `clangenv package-id` command

use anyhow::Result;

use super::load_options;
use crate::cli::ConfigArgs;
use clangenv::core::package_id;
use clangenv::ops::prepare;

pub fn execute(config: &ConfigArgs) -> Result<()> {
    let prepared = prepare(&load_options(config)?)?;
    println!("{}", package_id(&prepared.options, &prepared.settings));
    Ok(())
}
