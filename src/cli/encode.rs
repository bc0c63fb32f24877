//! `nna encode`

use anyhow::{Context, Result};

use super::{EncodeArgs, print_json};
use crate::address::{Sequential, Suffix};
use crate::registry::Registry;

pub fn run_encode(args: &EncodeArgs, registry: &Registry, json: bool) -> Result<()> {
    let sequential = args
        .sequential
        .as_deref()
        .map(Sequential::parse)
        .transpose()?;

    let suffix = match &args.ext {
        Some(ext) => Some(Suffix::extension(ext)?),
        None if !args.components.is_empty() => Some(Suffix::components(&args.components)?),
        None => None,
    };

    let path = &args.path;
    let pair = registry
        .encode(&path.layer, &path.category, &path.subcategory, sequential, suffix)
        .with_context(|| {
            format!("cannot encode {}.{}.{}", path.layer, path.category, path.subcategory)
        })?;

    if json {
        print_json(&pair)
    } else {
        println!("{}", pair.hfn);
        println!("{}", pair.mfa);
        Ok(())
    }
}
