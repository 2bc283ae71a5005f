pub mod canvas;
pub mod colors;
pub mod text;

use crate::data::Item;
use crate::layout::Layout;

/// Per-row summary in render order, e.g.
/// `row 1  6/6  A 3 (-2.00%), B 3 (5.00%)`.
pub fn listing(layout: &Layout, items: &[Item]) -> String {
    let mut out = String::new();
    let mut rects = layout.rects.iter().peekable();
    for row in 0..layout.rows {
        let mut load = 0.0;
        let mut entries = Vec::new();
        while let Some(rect) = rects.next_if(|r| r.row == row) {
            let item = &items[rect.item];
            load += item.weight;
            entries.push(format!(
                "{} {} ({})",
                item.name,
                item.weight,
                text::format_percent(item.value)
            ));
        }
        let entries = if entries.is_empty() {
            "(empty)".to_string()
        } else {
            entries.join(", ")
        };
        out.push_str(&format!("row {}  {}/{}  {}\n", row, load, layout.capacity, entries));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};

    #[test]
    fn listing_follows_row_major_order() {
        let items = vec![
            Item::new("A", 3.0, -0.02),
            Item::new("B", 3.0, 0.05),
            Item::new("C", 6.0, 0.015),
        ];
        let layout = compute_layout(&items, 3, &LayoutConfig::default()).unwrap();
        let text = listing(&layout, &items);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "row 0  6/6  C 6 (1.50%)");
        assert_eq!(lines[1], "row 1  6/6  A 3 (-2.00%), B 3 (5.00%)");
        assert_eq!(lines[2], "row 2  0/6  (empty)");
    }
}
