use crate::data::Item;

use super::capacity::Capacity;
use super::error::{InvalidInput, LayoutError};
use super::MAX_LAYOUT_ROWS;

/// One row bucket: indices into the caller's item slice, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedRow {
    pub items: Vec<usize>,
    /// Sum of placed weights, in capacity units.
    pub load: u64,
}

impl PackedRow {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Items grouped into exactly `rows` buckets under one shared capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLayout {
    pub capacity: Capacity,
    pub rows: Vec<PackedRow>,
}

impl PackedLayout {
    /// `rows` empty buckets, used when there is nothing to place.
    pub fn empty(rows: usize) -> Self {
        Self {
            capacity: Capacity::ZERO,
            rows: vec![PackedRow::default(); rows],
        }
    }

    /// Render order: every item of row 0, then row 1, and so on.
    pub fn row_major(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, bucket)| bucket.items.iter().map(move |&item| (row, item)))
    }

    pub fn item_count(&self) -> usize {
        self.rows.iter().map(|r| r.items.len()).sum()
    }
}

/// Indices of `items` sorted by weight, heaviest first. The sort is stable,
/// so equal weights keep their input order. `items` itself is left alone.
pub fn descending_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].weight.total_cmp(&items[a].weight));
    order
}

/// First-fit-decreasing placement of `items` into `rows` buckets.
///
/// `capacity` must come from the solver run on the same descending order;
/// an item that fits nowhere is reported as `PackingInconsistency`.
pub fn pack(items: &[Item], capacity: Capacity, rows: usize) -> Result<PackedLayout, LayoutError> {
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
        return Ok(PackedLayout::empty(rows));
    }

    let mut buckets = vec![PackedRow::default(); rows];

    for index in descending_order(items) {
        let weight = items[index].weight;
        let units = capacity
            .scale
            .to_units(weight)
            .ok_or(InvalidInput::NonPositiveWeight { index, weight })?;

        let slot = buckets
            .iter_mut()
            .find(|row| row.load.checked_add(units).is_some_and(|l| l <= capacity.units));

        match slot {
            Some(row) => {
                row.load += units;
                row.items.push(index);
            }
            None => {
                tracing::error!(
                    "Packing fell out of sync with solver: item {} (weight {}) under capacity {}",
                    index,
                    weight,
                    capacity.value()
                );
                return Err(LayoutError::PackingInconsistency {
                    index,
                    weight,
                    capacity: capacity.value(),
                });
            }
        }
    }

    tracing::trace!(
        "Packed {} items into {} rows, loads {:?}",
        items.len(),
        rows,
        buckets.iter().map(|r| r.load).collect::<Vec<_>>()
    );

    Ok(PackedLayout {
        capacity,
        rows: buckets,
    })
}
