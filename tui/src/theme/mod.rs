//! Theme and Colors
//!
//! Keypad palette: light gray function keys, orange operators, dark gray
//! digits. A pending operator inverts to white with orange text.

use ratatui::style::{Color, Modifier, Style};

use calculator_core::ButtonCategory;

// ============================================================================
// Key Palette
// ============================================================================

/// AC, +/-, %
pub const FUNCTION_KEY: Color = Color::Rgb(165, 165, 165);

/// Text on function keys
pub const FUNCTION_KEY_TEXT: Color = Color::Rgb(0, 0, 0);

/// Operators and equals - system orange
pub const OPERATOR_KEY: Color = Color::Rgb(255, 159, 10);

/// Digits and the decimal point
pub const DIGIT_KEY: Color = Color::Rgb(51, 51, 51);

/// Text on operator and digit keys
pub const KEY_TEXT: Color = Color::Rgb(255, 255, 255);

/// Background of an operator key while its operation is pending
pub const SELECTED_OPERATOR: Color = Color::Rgb(255, 255, 255);

// ============================================================================
// UI Colors
// ============================================================================

/// Main display text
pub const DISPLAY_TEXT: Color = Color::Rgb(255, 255, 255);

/// Expression line and status bar
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error sentinel
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Style for a key of the given category
#[must_use]
pub fn key_style(category: ButtonCategory, selected: bool) -> Style {
    match (category, selected) {
        (ButtonCategory::Operator, true) => Style::default()
            .bg(SELECTED_OPERATOR)
            .fg(OPERATOR_KEY)
            .add_modifier(Modifier::BOLD),
        (ButtonCategory::Operator, false) => Style::default().bg(OPERATOR_KEY).fg(KEY_TEXT),
        (ButtonCategory::NeutralFunction, _) => {
            Style::default().bg(FUNCTION_KEY).fg(FUNCTION_KEY_TEXT)
        }
        (ButtonCategory::DigitOrPoint, _) => Style::default().bg(DIGIT_KEY).fg(KEY_TEXT),
    }
}

/// Style for the main display
#[must_use]
pub fn display_style(is_error: bool) -> Style {
    let color = if is_error { ERROR_RED } else { DISPLAY_TEXT };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_operator_inverts() {
        let normal = key_style(ButtonCategory::Operator, false);
        let selected = key_style(ButtonCategory::Operator, true);
        assert_eq!(normal.bg, Some(OPERATOR_KEY));
        assert_eq!(selected.bg, Some(SELECTED_OPERATOR));
        assert_eq!(selected.fg, Some(OPERATOR_KEY));
    }

    #[test]
    fn test_selection_ignored_for_digits() {
        assert_eq!(
            key_style(ButtonCategory::DigitOrPoint, true),
            key_style(ButtonCategory::DigitOrPoint, false)
        );
    }

    #[test]
    fn test_error_display_is_red() {
        assert_eq!(display_style(true).fg, Some(ERROR_RED));
        assert_eq!(display_style(false).fg, Some(DISPLAY_TEXT));
    }
}
