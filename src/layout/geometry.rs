use std::collections::HashMap;

use crate::data::Item;

use super::packer::PackedLayout;
use super::{Layout, LayoutRect};

/// Share of a row's width taken by one item.
pub fn width_fraction(weight: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    weight / capacity
}

/// Share of the chart's height taken by one row.
pub fn height_fraction(rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    1.0 / rows as f64
}

/// Turn packed rows into chart-relative rectangles, in row-major order.
pub fn map(items: &[Item], packed: &PackedLayout) -> Layout {
    let rows = packed.rows.len();
    let capacity = packed.capacity.value();
    let h = height_fraction(rows);

    let mut rects = Vec::with_capacity(packed.item_count());
    let mut item_to_rect = HashMap::with_capacity(rects.capacity());

    for (row, bucket) in packed.rows.iter().enumerate() {
        let y = row as f64 * h;
        let mut x = 0.0;
        for &item in &bucket.items {
            let w = width_fraction(items[item].weight, capacity);
            item_to_rect.insert(item, rects.len());
            rects.push(LayoutRect { item, row, x, y, w, h });
            x += w;
        }
    }

    Layout {
        rects,
        item_to_rect,
        capacity,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::capacity::{Capacity, WeightScale};
    use crate::layout::packer::pack;

    #[test]
    fn fractions() {
        assert_eq!(width_fraction(3.0, 6.0), 0.5);
        assert_eq!(height_fraction(4), 0.25);
        assert_eq!(width_fraction(1.0, 0.0), 0.0);
    }

    #[test]
    fn rects_tile_rows_left_to_right() {
        let items = vec![
            Item::new("A", 3.0, -0.02),
            Item::new("B", 3.0, 0.05),
            Item::new("C", 6.0, 0.015),
        ];
        let capacity = Capacity {
            units: 6,
            scale: WeightScale::UNIT,
        };
        let packed = pack(&items, capacity, 2).unwrap();
        let layout = map(&items, &packed);

        assert_eq!(layout.rects.len(), 3);
        let c = layout.rect_for(2).unwrap();
        assert_eq!((c.x, c.y, c.w, c.h), (0.0, 0.0, 1.0, 0.5));
        let a = layout.rect_for(0).unwrap();
        assert_eq!((a.x, a.y, a.w), (0.0, 0.5, 0.5));
        let b = layout.rect_for(1).unwrap();
        assert_eq!((b.x, b.y, b.w), (0.5, 0.5, 0.5));
    }
}
