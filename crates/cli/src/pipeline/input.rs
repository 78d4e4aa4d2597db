//! JSON-lines item input.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::Item;

/// Read one item per non-blank line.
pub async fn load_items(path: &Path) -> Result<Vec<Item>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    parse_items(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_items(text: &str) -> Result<Vec<Item>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid item on line {}", index + 1))
        })
        .collect()
}
