use crate::data::Item;
use crate::layout::{Layout, LayoutRect};
use crate::render::colors::{self, AppColor, ColorSettings};
use crate::render::text::{format_percent, truncate_label};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub bg: Option<AppColor>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', bg: None }
    }
}

/// Character grid the treemap is rasterized into.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn write_str(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let cx = x + i;
            if cx >= self.width || y >= self.height {
                break;
            }
            self.cells[y * self.width + cx].ch = ch;
        }
    }

    /// One string per line, no escapes.
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }

    pub fn to_plain_string(&self) -> String {
        self.lines().join("\n")
    }

    /// Lines with 24-bit ANSI colors, reset at every line end.
    pub fn to_ansi_string(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 4);
        for (y, row) in self.cells.chunks(self.width.max(1)).take(self.height).enumerate() {
            if y > 0 {
                out.push('\n');
            }
            let mut current: Option<AppColor> = None;
            for cell in row {
                if cell.bg != current {
                    match cell.bg {
                        Some(bg) => {
                            out.push_str(&bg.ansi_bg());
                            out.push_str(bg.contrast_fg());
                        }
                        None => out.push_str("\x1b[0m"),
                    }
                    current = cell.bg;
                }
                out.push(cell.ch);
            }
            out.push_str("\x1b[0m");
        }
        out
    }
}

/// Cell bounds of a rect: `[x0, y0, x1, y1)`, edges rounded so neighbours
/// share boundaries without gaps.
pub fn cell_bounds(rect: &LayoutRect, width: usize, height: usize) -> [usize; 4] {
    let [x0, y0, x1, y1] = rect.to_viewport(width as f64, height as f64);
    let clamp_x = |v: f64| (v.round().max(0.0) as usize).min(width);
    let clamp_y = |v: f64| (v.round().max(0.0) as usize).min(height);
    [clamp_x(x0), clamp_y(y0), clamp_x(x1), clamp_y(y1)]
}

/// Rasterize a layout into a `width` × `height` grid.
///
/// With `color` each tile is filled with its value color and labelled from
/// its top-left cell. Without it tiles are outlined with `|` and `-` so the
/// plain text stays readable.
pub fn rasterize(
    layout: &Layout,
    items: &[Item],
    width: usize,
    height: usize,
    color: bool,
    settings: &ColorSettings,
) -> Canvas {
    let mut canvas = Canvas::new(width, height);

    for rect in &layout.rects {
        let Some(item) = items.get(rect.item) else {
            tracing::warn!("Layout rect points at missing item {}", rect.item);
            continue;
        };
        let [x0, y0, x1, y1] = cell_bounds(rect, width, height);
        if x1 <= x0 || y1 <= y0 {
            tracing::debug!("Item '{}' too small to draw at {}x{}", item.name, width, height);
            continue;
        }

        let bg = color.then(|| colors::value_color(item.value, settings));
        for y in y0..y1 {
            for x in x0..x1 {
                canvas.set(x, y, Cell { ch: ' ', bg });
            }
        }

        let (label_x, mut label_y) = if color {
            (x0, y0)
        } else {
            for x in x0..x1 {
                canvas.set(x, y0, Cell { ch: '-', bg });
            }
            for y in y0..y1 {
                canvas.set(x0, y, Cell { ch: '|', bg });
            }
            (x0 + 1, y0 + 1)
        };

        let room = x1.saturating_sub(label_x);
        for line in [item.name.to_string(), format_percent(item.value)] {
            if label_y >= y1 {
                break;
            }
            let text = truncate_label(&line, room);
            if text.is_empty() {
                break;
            }
            canvas.write_str(label_x, label_y, &text);
            label_y += 1;
        }
    }

    canvas
}
