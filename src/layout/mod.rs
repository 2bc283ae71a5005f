pub mod capacity;
pub mod error;
pub mod geometry;
pub mod packer;

use std::collections::HashMap;

use crate::data::Item;

pub use self::capacity::{Capacity, WeightScale};
pub use self::error::{InvalidInput, LayoutError};
pub use self::packer::{PackedLayout, PackedRow};

/// A positioned rectangle in the row-packed treemap.
/// Coordinates are fractions of the whole chart (0.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    /// Index into the item slice the layout was computed from
    pub item: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LayoutRect {
    /// Scale to a concrete viewport: `[x0, y0, x1, y1]`.
    pub fn to_viewport(&self, width: f64, height: f64) -> [f64; 4] {
        [
            self.x * width,
            self.y * height,
            (self.x + self.w) * width,
            (self.y + self.h) * height,
        ]
    }
}

/// The full layout result (rects + fast lookup).
#[derive(Debug, Clone)]
pub struct Layout {
    /// One rect per item, row-major
    pub rects: Vec<LayoutRect>,
    /// item index → index into `rects`
    pub item_to_rect: HashMap<usize, usize>,
    /// Shared row capacity in weight units (0 when there are no items)
    pub capacity: f64,
    pub rows: usize,
}

impl Layout {
    pub fn rect_for(&self, item: usize) -> Option<&LayoutRect> {
        self.item_to_rect.get(&item).map(|&i| &self.rects[i])
    }
}

/// Largest row count any layout call accepts. Every row is a bucket in the
/// packed result, so the count bounds what one relayout allocates.
pub const MAX_LAYOUT_ROWS: usize = 10_000;

/// Configuration for the capacity search.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Decimal digits kept when rescaling fractional weights to search units
    pub weight_precision: u32,
    /// Hard cap on capacity trials (keeps the UI thread from stalling)
    pub max_search_steps: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            weight_precision: 3,
            max_search_steps: 1_000_000,
        }
    }
}

/// Solve, pack and map in one pass.
///
/// The descending-weight order is computed once and shared by the solver
/// and the packer; `items` is never reordered.
pub fn compute_layout(items: &[Item], rows: usize, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    if rows == 0 {
        return Err(InvalidInput::ZeroRows.into());
    }
    if rows > MAX_LAYOUT_ROWS {
        return Err(InvalidInput::TooManyRows {
            rows,
            max: MAX_LAYOUT_ROWS,
        }
        .into());
    }
    if items.is_empty() {
        tracing::debug!("No items, producing {} empty rows", rows);
        return Ok(geometry::map(items, &PackedLayout::empty(rows)));
    }

    let order = packer::descending_order(items);
    let weights: Vec<f64> = order.iter().map(|&i| items[i].weight).collect();

    let capacity = capacity::solve(&weights, rows, config).map_err(|e| -> LayoutError {
        match e {
            // Report positions in the caller's slice, not the sorted copy.
            LayoutError::InvalidInput(InvalidInput::NonPositiveWeight { index, weight }) => {
                InvalidInput::NonPositiveWeight {
                    index: order[index],
                    weight,
                }
                .into()
            }
            LayoutError::InvalidInput(InvalidInput::WeightOutOfRange { index, weight }) => {
                InvalidInput::WeightOutOfRange {
                    index: order[index],
                    weight,
                }
                .into()
            }
            other => other,
        }
    })?;

    let packed = packer::pack(items, capacity, rows)?;
    let layout = geometry::map(items, &packed);

    tracing::debug!(
        "Laid out {} items in {} rows at capacity {}",
        items.len(),
        rows,
        layout.capacity
    );

    Ok(layout)
}
