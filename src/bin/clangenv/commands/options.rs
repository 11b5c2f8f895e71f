//! `clangenv options` command

use anyhow::Result;

use super::load_options;
use crate::cli::{ConfigArgs, OptionsArgs};
use clangenv::core::catalog::{self, OptionDefault, OptionScope};
use clangenv::ops::prepare;

pub fn execute(args: OptionsArgs, config: &ConfigArgs) -> Result<()> {
    if args.defaults {
        print_catalog();
        return Ok(());
    }

    let prepared = prepare(&load_options(config)?)?;

    println!("# Options:");
    for (key, value) in prepared.options.iter() {
        println!("  {}={}", key, value);
    }
    println!();

    println!("# Options of `{}`:", prepared.package);
    for (key, value) in prepared.dependency_options.iter() {
        println!("  {}:{}={}", prepared.package.name, key, value);
    }

    Ok(())
}

fn print_catalog() {
    for spec in catalog::all() {
        let scope = match spec.scope {
            OptionScope::Mirrored => "mirrored",
            OptionScope::WrapperOnly => "wrapper",
            OptionScope::Passthrough => "passthrough",
        };
        let default = match spec.default {
            OptionDefault::Bool(true) => "True".to_string(),
            OptionDefault::Bool(false) => "False".to_string(),
            OptionDefault::Text(s) => s.to_string(),
            OptionDefault::None => "-".to_string(),
        };
        println!(
            "{:<28} {:<12} {:<8} [{}]  {}",
            spec.key, scope, default, spec.kind, spec.help
        );
    }
}
