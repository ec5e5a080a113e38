use unicode_width::UnicodeWidthStr;

/// Format a percentage with one decimal, e.g. "43.3%"
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// Pad `s` with spaces to `width` terminal columns. Emoji and other wide
/// glyphs count as two columns.
pub fn pad_display(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Render a run of day markers: ● completed, ○ not completed.
pub fn day_dots(days: &[bool]) -> String {
    days.iter()
        .map(|done| if *done { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}
