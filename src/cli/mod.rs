//! Command-line interface module.
//!
//! | Command    | Module      |
//! |------------|-------------|
//! | `encode`   | `encode`    |
//! | `convert`  | `convert`   |
//! | `validate` | `validate`  |
//! | `list`     | `list`      |
//! | `check`    | `check`     |
//! | `counter`  | `counter`   |

mod args;
mod check;
mod convert;
mod counter;
mod encode;
mod list;
mod validate;

pub use args::{Cli, Commands, EncodeArgs, PathArgs, TargetForm};

use anyhow::Result;
use serde::Serialize;

use crate::registry::Registry;

/// Dispatch a parsed command line against a loaded registry.
pub fn run(cli: &Cli, registry: &Registry) -> Result<()> {
    let json = cli.json;
    match &cli.command {
        Commands::Encode { args } => encode::run_encode(args, registry, json),
        Commands::Convert { addresses, to } => {
            convert::run_convert(addresses, to.map(Into::into), registry, json)
        }
        Commands::Validate { path } => validate::run_validate(path, registry, json),
        Commands::List { layer, category } => {
            list::run_list(layer.as_deref(), category.as_deref(), registry, json)
        }
        Commands::Check => check::run_check(registry, json),
        Commands::Counter { path, reset } => counter::run_counter(path, *reset, registry, json),
    }
}

/// Pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
