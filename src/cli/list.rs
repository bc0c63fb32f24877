//! `nna list`

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::print_json;
use crate::registry::Registry;
use crate::taxonomy::{EntrySource, Layer, Taxonomy};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row {
    code: String,
    numeric_code: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<EntrySource>,
}

pub fn run_list(
    layer: Option<&str>,
    category: Option<&str>,
    registry: &Registry,
    json: bool,
) -> Result<()> {
    let taxonomy = registry.taxonomy();
    let rows = match (layer, category) {
        (None, _) => layer_rows(&taxonomy),
        (Some(layer), None) => category_rows(&taxonomy, layer)?,
        (Some(layer), Some(category)) => subcategory_rows(&taxonomy, layer, category)?,
    };

    if json {
        return print_json(&rows);
    }
    for row in &rows {
        let extra = match (row.children, row.source) {
            (Some(n), _) => format!("({n})"),
            (None, Some(EntrySource::Override)) => "override".to_string(),
            _ => String::new(),
        };
        println!(
            "{:<4} {:>3}  {}  {}",
            row.code.bold(),
            row.numeric_code,
            row.name,
            extra.dimmed()
        );
    }
    Ok(())
}

fn layer_rows(taxonomy: &Taxonomy) -> Vec<Row> {
    taxonomy
        .tree()
        .layers()
        .iter()
        .map(|l| Row {
            code: l.layer.code().to_string(),
            numeric_code: l.layer.numeric().to_string(),
            name: l.name.clone(),
            children: Some(l.categories().len()),
            source: None,
        })
        .collect()
}

fn category_rows(taxonomy: &Taxonomy, layer: &str) -> Result<Vec<Row>> {
    let layer = Layer::parse(layer)?;
    let categories = taxonomy.tree().get_categories(layer)?;
    Ok(categories
        .iter()
        .map(|c| Row {
            code: c.code().to_string(),
            numeric_code: c.numeric_code().to_string(),
            name: c.item.name.clone(),
            children: Some(taxonomy.effective_subcategories(layer, c).len()),
            source: None,
        })
        .collect())
}

fn subcategory_rows(taxonomy: &Taxonomy, layer: &str, category: &str) -> Result<Vec<Row>> {
    let layer = Layer::parse(layer)?;
    Ok(taxonomy
        .subcategories(layer, category)?
        .into_iter()
        .map(|s| Row {
            code: s.code.to_string(),
            numeric_code: s.numeric_code.to_string(),
            name: s.name,
            children: None,
            source: Some(s.source),
        })
        .collect())
}
