/// Display a ratio as a percentage with two decimals: 0.015 → "1.50%".
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Fit a label into `max_chars` cells, ending in "..." when cut.
/// Returns an empty string when not even an ellipsis fits.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    let count = label.chars().count();
    if count <= max_chars {
        return label.to_string();
    }
    if max_chars < 3 {
        return String::new();
    }
    if max_chars == 3 {
        return "...".to_string();
    }
    let truncated: String = label.chars().take(max_chars - 3).collect();
    format!("{}...", truncated)
}
