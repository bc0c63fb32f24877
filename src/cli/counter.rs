//! `nna counter`

use anyhow::Result;
use serde::Serialize;

use super::{PathArgs, print_json};
use crate::config::{StoreKind, cfg};
use crate::debug;
use crate::registry::Registry;
use crate::sequence::PathKey;

#[derive(Debug, Serialize)]
struct CounterStatus {
    path: PathKey,
    current: u32,
}

pub fn run_counter(path: &PathArgs, reset: bool, registry: &Registry, json: bool) -> Result<()> {
    let resolved = registry.validate(&path.layer, &path.category, &path.subcategory)?;
    let allocator = registry.allocator();

    let config = cfg();
    if config.sequence.store == StoreKind::File {
        debug!("counter"; "store at {}", config.root_relative(&config.sequence.dir).display());
    }

    if reset {
        allocator.reset(&resolved)?;
    }

    let status = CounterStatus {
        path: PathKey::new(&resolved),
        current: allocator.current(&resolved)?,
    };

    if json {
        print_json(&status)
    } else {
        println!("{} {}", status.path, status.current);
        Ok(())
    }
}
