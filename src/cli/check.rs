//! `nna check`

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use super::print_json;
use crate::log;
use crate::registry::Registry;
use crate::utils::plural_count;

pub fn run_check(registry: &Registry, json: bool) -> Result<()> {
    let report = registry.taxonomy().check();

    if json {
        print_json(&report)?;
    } else {
        log!(
            "check";
            "catalog {}: {}, {}, {}, {}",
            report.version,
            plural_count(report.categories, "category"),
            plural_count(report.paths, "path"),
            plural_count(report.overrides, "override"),
            plural_count(report.aliases, "alias")
        );
        for problem in &report.problems {
            println!("{} {}", "→".red(), problem);
        }
    }

    if !report.is_clean() {
        bail!("catalog check found {}", plural_count(report.problems.len(), "problem"));
    }
    if !json {
        log!("check"; "no problems found");
    }
    Ok(())
}
