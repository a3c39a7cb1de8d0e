//! Urgency presentation mapping for the result view.
//!
//! A pure, total mapping from the bounded urgency scale to a severity score
//! (drives the gauge fill) and a display color. `None` is the defensive arm
//! for a response whose urgency never made it through parsing — it should be
//! unreachable in practice, but it must render as neutral, never panic.

use ratatui::style::Color;

use crate::schemas::UrgencyLevel;

/// Static reminder rendered alongside every disclaimer, independent of the
/// service response.
pub const EMERGENCY_REMINDER: &str = "This AI-generated assessment is for informational \
purposes only. Always consult a qualified healthcare professional for diagnosis and \
treatment. If you are experiencing a medical emergency, call emergency services immediately.";

/// Fixed severity score on the 0–100 gauge.
pub fn severity_score(level: Option<UrgencyLevel>) -> u16 {
    match level {
        Some(UrgencyLevel::Low) => 25,
        Some(UrgencyLevel::Moderate) => 50,
        Some(UrgencyLevel::High) => 75,
        Some(UrgencyLevel::Critical) => 100,
        None => 0,
    }
}

/// Fixed display color as a hex literal.
pub fn display_hex(level: Option<UrgencyLevel>) -> &'static str {
    match level {
        Some(UrgencyLevel::Low) => "#16a34a",
        Some(UrgencyLevel::Moderate) => "#ca8a04",
        Some(UrgencyLevel::High) => "#ea580c",
        Some(UrgencyLevel::Critical) => "#dc2626",
        None => "#9ca3af",
    }
}

/// The same table as [`display_hex`], as a terminal color.
pub fn display_color(level: Option<UrgencyLevel>) -> Color {
    match level {
        Some(UrgencyLevel::Low) => Color::Rgb(0x16, 0xa3, 0x4a),
        Some(UrgencyLevel::Moderate) => Color::Rgb(0xca, 0x8a, 0x04),
        Some(UrgencyLevel::High) => Color::Rgb(0xea, 0x58, 0x0c),
        Some(UrgencyLevel::Critical) => Color::Rgb(0xdc, 0x26, 0x26),
        None => Color::Rgb(0x9c, 0xa3, 0xaf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_fixed_and_total() {
        let table = [
            (UrgencyLevel::Low, 25, "#16a34a"),
            (UrgencyLevel::Moderate, 50, "#ca8a04"),
            (UrgencyLevel::High, 75, "#ea580c"),
            (UrgencyLevel::Critical, 100, "#dc2626"),
        ];
        for (level, score, hex) in table {
            assert_eq!(severity_score(Some(level)), score);
            assert_eq!(display_hex(Some(level)), hex);
        }
    }

    #[test]
    fn unrecognized_urgency_is_neutral() {
        assert_eq!(severity_score(None), 0);
        assert_eq!(display_hex(None), "#9ca3af");
        assert_eq!(display_color(None), Color::Rgb(0x9c, 0xa3, 0xaf));
    }

    #[test]
    fn hex_and_terminal_colors_agree() {
        for level in [
            Some(UrgencyLevel::Low),
            Some(UrgencyLevel::Moderate),
            Some(UrgencyLevel::High),
            Some(UrgencyLevel::Critical),
            None,
        ] {
            let hex = display_hex(level);
            let r = u8::from_str_radix(&hex[1..3], 16).unwrap();
            let g = u8::from_str_radix(&hex[3..5], 16).unwrap();
            let b = u8::from_str_radix(&hex[5..7], 16).unwrap();
            assert_eq!(display_color(level), Color::Rgb(r, g, b));
        }
    }
}
