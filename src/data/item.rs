use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One weighted entry of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Label shown in the rectangle (may repeat across items)
    pub name: CompactString,
    /// Relative size; must be > 0 to be laid out
    pub weight: f64,
    /// Signed ratio shown as a percentage, e.g. 0.015 → "1.50%"
    pub value: f64,
}

impl Item {
    pub fn new(name: impl Into<CompactString>, weight: f64, value: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            value,
        }
    }

    /// Blank row as added by the editor.
    pub fn blank() -> Self {
        Self::new("", 0.0, 0.0)
    }

    /// Whether this row takes part in the layout: a name, a positive finite
    /// weight and a non-zero value.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self.weight.is_finite()
            && self.weight > 0.0
            && self.value.is_finite()
            && self.value != 0.0
    }
}

/// Editable fields of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Weight,
    Value,
}

impl ItemField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Some(ItemField::Name),
            "weight" | "w" => Some(ItemField::Weight),
            "value" | "v" => Some(ItemField::Value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_filter() {
        assert!(Item::new("A", 3.0, -0.02).is_valid());
        assert!(!Item::blank().is_valid());
        assert!(!Item::new("  ", 3.0, 0.1).is_valid());
        assert!(!Item::new("A", 0.0, 0.1).is_valid());
        assert!(!Item::new("A", -1.0, 0.1).is_valid());
        assert!(!Item::new("A", 1.0, 0.0).is_valid());
        assert!(!Item::new("A", f64::NAN, 0.1).is_valid());
    }

    #[test]
    fn field_names() {
        assert_eq!(ItemField::parse("Weight"), Some(ItemField::Weight));
        assert_eq!(ItemField::parse("v"), Some(ItemField::Value));
        assert_eq!(ItemField::parse("colour"), None);
    }
}
