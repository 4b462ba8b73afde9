//! Shared utility functions.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Color used whenever a configured color cannot be understood.
pub const FALLBACK_COLOR: u32 = 0x009B_59B6;

static NAMED_COLORS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("red", 0xFF0000),
        ("blue", 0x0000FF),
        ("green", 0x00FF00),
        ("yellow", 0xFFFF00),
        ("purple", 0x9B59B6),
        ("pink", 0xFF69B4),
        ("orange", 0xFFA500),
        ("cyan", 0x00FFFF),
        ("lime", 0x32CD32),
        ("gold", 0xFFD700),
        ("white", 0xFFFFFF),
        ("black", 0x000000),
        ("grey", 0x808080),
        ("gray", 0x808080),
        ("magenta", 0xFF00FF),
        ("brown", 0xA52A2A),
        ("navy", 0x000080),
        ("teal", 0x008080),
        ("silver", 0xC0C0C0),
        ("maroon", 0x800000),
        ("olive", 0x808000),
        ("aqua", 0x00FFFF),
        ("coral", 0xFF7F50),
        ("crimson", 0xDC143C),
        ("indigo", 0x4B0082),
        ("violet", 0xEE82EE),
        ("turquoise", 0x40E0D0),
        ("salmon", 0xFA8072),
        ("khaki", 0xF0E68C),
        ("lavender", 0xE6E6FA),
    ])
});

/// Parses a color name, `#RRGGBB`, `0xRRGGBB` or bare `RRGGBB`.
///
/// Returns `None` when the input is none of those.
#[must_use]
pub fn try_parse_color(input: &str) -> Option<u32> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if let Some(value) = NAMED_COLORS.get(normalized.as_str()) {
        return Some(*value);
    }

    let hex = normalized
        .strip_prefix('#')
        .or_else(|| normalized.strip_prefix("0x"))
        .unwrap_or(&normalized);

    if hex.len() == 6 {
        u32::from_str_radix(hex, 16).ok()
    } else {
        None
    }
}

/// Parses a configured color, falling back to [`FALLBACK_COLOR`].
#[must_use]
pub fn parse_color(input: &str) -> u32 {
    try_parse_color(input).unwrap_or_else(|| {
        tracing::warn!("Unrecognized color '{}', using fallback", input);
        FALLBACK_COLOR
    })
}

/// Formats a timestamp for display.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Renders Discord timestamp markup (`<t:unix:style>`), shown in each reader's local time.
#[must_use]
pub fn discord_timestamp(timestamp: DateTime<Utc>, style: char) -> String {
    format!("<t:{}:{}>", timestamp.timestamp(), style)
}

/// Truncates a string to a maximum number of characters with ellipsis.
#[must_use]
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
