pub mod item;

use std::path::Path;

use anyhow::{bail, Context, Result};
use compact_str::CompactString;

pub use self::item::{Item, ItemField};

/// Maximum number of editable rows.
pub const MAX_ROWS: usize = 50;
/// Maximum characters kept in an item name.
pub const MAX_NAME_LEN: usize = 50;

/// The editable item list behind the chart. Keeps the user's ordering;
/// layout works on `valid_items()` and never reorders this list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Demo data plus one blank row ready for input.
    pub fn sample() -> Self {
        Self::new(vec![
            Item::new("A", 3.0, -0.02),
            Item::new("B", 3.0, 0.05),
            Item::new("C", 6.0, 0.015),
            Item::new("D", 2.0, -0.01),
            Item::new("E", 3.0, 0.01),
            Item::blank(),
        ])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a blank row. Returns false once `MAX_ROWS` is reached.
    pub fn add_row(&mut self) -> bool {
        if self.items.len() >= MAX_ROWS {
            tracing::warn!("Row limit {} reached, not adding", MAX_ROWS);
            return false;
        }
        self.items.push(Item::blank());
        true
    }

    /// Remove a row. The last remaining row cannot be removed.
    pub fn remove_row(&mut self, idx: usize) -> bool {
        if idx >= self.items.len() || self.items.len() <= 1 {
            return false;
        }
        self.items.remove(idx);
        true
    }

    pub fn set_name(&mut self, idx: usize, name: &str) -> bool {
        let Some(item) = self.items.get_mut(idx) else {
            return false;
        };
        item.name = name.chars().take(MAX_NAME_LEN).collect::<CompactString>();
        true
    }

    pub fn set_weight(&mut self, idx: usize, weight: f64) -> bool {
        let Some(item) = self.items.get_mut(idx) else {
            return false;
        };
        item.weight = weight;
        true
    }

    pub fn set_value(&mut self, idx: usize, value: f64) -> bool {
        let Some(item) = self.items.get_mut(idx) else {
            return false;
        };
        item.value = value;
        true
    }

    /// Set a field from text input. Empty numeric input clears to 0.
    pub fn set_field(&mut self, idx: usize, field: ItemField, text: &str) -> Result<()> {
        if idx >= self.items.len() {
            bail!("row {} out of range (have {})", idx, self.items.len());
        }
        match field {
            ItemField::Name => {
                self.set_name(idx, text);
            }
            ItemField::Weight => {
                let weight = parse_number(text).context("weight must be a number")?;
                self.set_weight(idx, weight);
            }
            ItemField::Value => {
                let value = parse_number(text).context("value must be a number")?;
                self.set_value(idx, value);
            }
        }
        Ok(())
    }

    /// Rows that take part in the layout, in the user's order.
    pub fn valid_items(&self) -> Vec<Item> {
        self.items.iter().filter(|i| i.is_valid()).cloned().collect()
    }
}

fn parse_number(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    let n: f64 = text.parse()?;
    if !n.is_finite() {
        bail!("{} is not finite", text);
    }
    Ok(n)
}

/// Parse a JSON array of `{ "name", "weight", "value" }` records.
pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(json).context("invalid item list")?;
    if items.len() > MAX_ROWS {
        tracing::warn!("{} items loaded, editor limit is {}", items.len(), MAX_ROWS);
    }
    Ok(items)
}

/// Load items from a JSON file.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let items = parse_items(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}
