use crate::data::{Dataset, Item, ItemField};
use crate::layout::{self, Layout, LayoutConfig, LayoutError, MAX_LAYOUT_ROWS};

/// Top-level chart state: the editable data, the row stepper and the
/// cached layout derived from them.
pub struct App {
    pub dataset: Dataset,
    rows: usize,
    pub layout_config: LayoutConfig,

    /// Items the current layout was computed from (rect indices point here)
    pub laid_out: Vec<Item>,
    pub layout: Option<Layout>,
    pub last_error: Option<LayoutError>,
    pub needs_relayout: bool,
}

impl App {
    pub fn new(dataset: Dataset, rows: usize, layout_config: LayoutConfig) -> Self {
        Self {
            dataset,
            rows: rows.clamp(1, MAX_LAYOUT_ROWS),
            layout_config,
            laid_out: Vec::new(),
            layout: None,
            last_error: None,
            needs_relayout: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns false when already at `MAX_LAYOUT_ROWS`.
    pub fn increment_rows(&mut self) -> bool {
        if self.rows >= MAX_LAYOUT_ROWS {
            return false;
        }
        self.rows += 1;
        self.needs_relayout = true;
        true
    }

    /// Returns false when already at one row.
    pub fn decrement_rows(&mut self) -> bool {
        if self.rows <= 1 {
            return false;
        }
        self.rows -= 1;
        self.needs_relayout = true;
        true
    }

    pub fn set_rows(&mut self, rows: usize) -> bool {
        if rows == 0 || rows > MAX_LAYOUT_ROWS {
            return false;
        }
        if rows != self.rows {
            self.rows = rows;
            self.needs_relayout = true;
        }
        true
    }

    pub fn add_row(&mut self) -> bool {
        let added = self.dataset.add_row();
        self.needs_relayout |= added;
        added
    }

    pub fn remove_row(&mut self, idx: usize) -> bool {
        let removed = self.dataset.remove_row(idx);
        self.needs_relayout |= removed;
        removed
    }

    pub fn edit(&mut self, idx: usize, field: ItemField, text: &str) -> anyhow::Result<()> {
        self.dataset.set_field(idx, field, text)?;
        self.needs_relayout = true;
        Ok(())
    }

    /// Recompute the layout from scratch if anything changed.
    /// With no valid items the layout is cleared and nothing is drawn.
    pub fn relayout(&mut self) {
        if !self.needs_relayout {
            return;
        }
        self.needs_relayout = false;
        self.laid_out = self.dataset.valid_items();

        if self.laid_out.is_empty() {
            tracing::info!("No valid items, clearing layout");
            self.layout = None;
            self.last_error = None;
            return;
        }

        tracing::info!(
            "Computing layout for {} items ({} rows in editor), rows={}",
            self.laid_out.len(),
            self.dataset.len(),
            self.rows
        );

        match layout::compute_layout(&self.laid_out, self.rows, &self.layout_config) {
            Ok(computed) => {
                tracing::info!(
                    "Layout computed: {} rectangles, capacity {}",
                    computed.rects.len(),
                    computed.capacity
                );
                self.layout = Some(computed);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Layout failed: {}", e);
                self.layout = None;
                self.last_error = Some(e);
            }
        }
    }
}
