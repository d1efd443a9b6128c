//! Shared formatting utilities for the StationWatch views.

use scraper::Html;

/// Format a player count for a chart axis label.
///
/// Whole numbers below a thousand print as-is; hub-wide totals shorten
/// to "1.5K" so the axis gutter stays narrow. Averages keep one decimal.
pub fn format_axis_value(value: f64) -> String {
    if value >= 1_000.0 {
        let thousands = value / 1_000.0;
        if thousands.fract() == 0.0 {
            format!("{:.0}K", thousands)
        } else {
            format!("{:.1}K", thousands)
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Strip markup from a hub status line, leaving plain text.
///
/// Hub entries embed HTML fragments (links, bold, font tags) in their
/// status strings. The desktop UI renders text only, so tags are dropped
/// and whitespace collapsed.
pub fn clean_status(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let text = fragment.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first character of a label ("extended" -> "Extended").
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
