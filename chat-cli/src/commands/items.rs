//! List marketplace items with their description sections.

use anyhow::Result;
use chat_client::{load_catalog, CatalogSource};
use chat_core::{parse_sections, DEFAULT_DELIMITER};
use chat_types::Item;

use super::connect;
use crate::config::ChatConfig;

/// Run the items command.
pub async fn run(config: &ChatConfig) -> Result<()> {
    let catalog = load_catalog(&connect(config)?).await;

    if catalog.source == CatalogSource::Samples {
        println!("(backend listings unavailable, showing samples)");
        println!();
    }
    for item in &catalog.items {
        println!("{}", render_item(item));
    }

    Ok(())
}

/// One listing: a header line, then one line per description section.
fn render_item(item: &Item) -> String {
    let mut header = format!("{}  {}  {}", item.id, item.name, format_yen(item.price));
    if item.sold_out {
        header.push_str("  [SOLD OUT]");
    }
    if item.is_certified() {
        header.push_str("  [certified]");
    }

    let mut out = header;
    for section in parse_sections(&item.description, DEFAULT_DELIMITER) {
        out.push('\n');
        match section.label {
            Some(label) => out.push_str(&format!("    {}: {}", label, section.body)),
            None => out.push_str(&format!("    {}", section.body)),
        }
    }
    out
}

/// Format a yen amount with thousands separators.
fn format_yen(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("¥{}", grouped)
}
