//! `nna convert`

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::address::{AddressCodec, AddressForm};
use crate::log;
use crate::registry::Registry;

#[derive(Debug, Serialize)]
struct Conversion<'a> {
    input: &'a str,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<AddressForm>,
}

pub fn run_convert(
    addresses: &[String],
    to: Option<AddressForm>,
    registry: &Registry,
    json: bool,
) -> Result<()> {
    let taxonomy = registry.taxonomy();
    let codec = taxonomy.codec();

    let results: Vec<Conversion<'_>> = addresses
        .iter()
        .map(|input| {
            let target = to.or_else(|| AddressCodec::detect(input).map(AddressForm::opposite));
            let output = match target {
                Some(form) => codec.convert(input, form),
                None => {
                    log!("convert"; "`{}` is neither HFN nor MFA, left unchanged", input);
                    input.clone()
                }
            };
            Conversion {
                input,
                output,
                form: target,
            }
        })
        .collect();

    if json {
        return print_json(&results);
    }
    for result in &results {
        println!("{}", result.output);
    }
    Ok(())
}
