use thiserror::Error;

/// Rejected layout input. The data layer filters invalid rows before layout,
/// so reaching one of these means a caller skipped `Dataset::valid_items`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("row count must be at least 1")]
    ZeroRows,

    #[error("row count {rows} exceeds the limit of {max}")]
    TooManyRows { rows: usize, max: usize },

    #[error("no items to lay out")]
    NoItems,

    #[error("item {index} has non-positive weight {weight}")]
    NonPositiveWeight { index: usize, weight: f64 },

    #[error("item {index} weight {weight} cannot be represented at the configured precision")]
    WeightOutOfRange { index: usize, weight: f64 },

    #[error("total weight is too large to search at the configured precision")]
    TotalOutOfRange,
}

/// Errors raised by the capacity solver and the row packer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid layout input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The packer could not place an item under a capacity the solver
    /// certified. Solver and packer disagree on ordering or arithmetic.
    #[error("item {index} (weight {weight}) fits no row under certified capacity {capacity}")]
    PackingInconsistency {
        index: usize,
        weight: f64,
        capacity: f64,
    },

    #[error("capacity search stopped after {steps} trials at capacity {last_trial}")]
    SearchExhausted { steps: u64, last_trial: f64 },
}
