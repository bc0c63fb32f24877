//! `nna validate`

use anyhow::Result;
use owo_colors::OwoColorize;

use super::{PathArgs, print_json};
use crate::registry::Registry;

pub fn run_validate(path: &PathArgs, registry: &Registry, json: bool) -> Result<()> {
    let resolved = registry.validate(&path.layer, &path.category, &path.subcategory)?;

    if json {
        return print_json(&resolved);
    }

    println!(
        "{}  {}  {}",
        resolved.hfn_prefix().bold(),
        resolved.mfa_prefix(),
        resolved.subcategory.name.dimmed()
    );
    if let Some(alias) = &resolved.alias_of {
        println!("{} {}", "alias of".dimmed(), alias);
    }
    Ok(())
}
