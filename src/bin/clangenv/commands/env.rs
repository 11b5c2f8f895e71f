//! `clangenv env` command

use anyhow::Result;
use serde_json::{json, Map, Value};

use super::load_options;
use crate::cli::{ConfigArgs, EnvArgs, OutputFormat};
use clangenv::ops::{configure, Configured};

pub fn execute(args: EnvArgs, config: &ConfigArgs) -> Result<()> {
    let configured = configure(&load_options(config)?)?;
    let env = &configured.bundle.env;

    match args.format {
        OutputFormat::Shell => print!("{}", env.to_shell()),
        OutputFormat::Text => {
            for (key, value) in env.render() {
                println!("{}={}", key, value);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&configured))?),
    }

    Ok(())
}

fn to_json(configured: &Configured) -> Value {
    let bundle = &configured.bundle;
    let env: Map<String, Value> = bundle
        .env
        .render()
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    json!({
        "package": configured.package.to_string(),
        "package_id": configured.package_id,
        "root": configured.root.to_string(),
        "clang_version": configured.layout.clang_version.to_string(),
        "env": env,
        "include_dirs": bundle.include_dirs,
        "lib_dirs": bundle.lib_dirs,
        "libs": bundle.libs,
        "shared_link_flags": bundle.shared_link_flags,
        "exe_link_flags": bundle.exe_link_flags,
        "preload": bundle.preload,
    })
}
