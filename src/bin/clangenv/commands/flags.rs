//! `clangenv flags` command

use anyhow::Result;

use super::load_options;
use crate::cli::{ConfigArgs, FlagsArgs};
use clangenv::ops::configure;

pub fn execute(args: FlagsArgs, config: &ConfigArgs) -> Result<()> {
    let configured = configure(&load_options(config)?)?;
    let bundle = &configured.bundle;

    if args.compile {
        println!("{}", bundle.compile_flags());
        return Ok(());
    }
    if args.link {
        println!("{}", bundle.link_flags());
        return Ok(());
    }

    println!("# Compile flags for `{}`:", configured.package);
    for flag in &bundle.cxxflags {
        println!("  {}", flag);
    }
    println!();

    println!("# Link flags for `{}`:", configured.package);
    for flag in &bundle.ldflags {
        println!("  {}", flag);
    }
    for dir in &bundle.lib_dirs {
        println!("  -L{}", dir.display());
    }
    for lib in &bundle.libs {
        println!("  -l{}", lib);
    }

    Ok(())
}
