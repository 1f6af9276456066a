//! DisplayPanel Widget
//!
//! Right-aligned result display with an optional dim expression line
//! above it. Text wider than the panel keeps its rightmost characters,
//! prefixed with an ellipsis.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{display_style, DIM_GRAY};

/// Display area of the calculator
pub struct DisplayPanel<'a> {
    display: &'a str,
    expression: Option<&'a str>,
    is_error: bool,
}

impl<'a> DisplayPanel<'a> {
    /// Panel showing `display` on its bottom row
    pub fn new(display: &'a str) -> Self {
        Self {
            display,
            expression: None,
            is_error: false,
        }
    }

    /// Dim line drawn above the display
    pub fn expression(mut self, expression: Option<&'a str>) -> Self {
        self.expression = expression;
        self
    }

    /// Draw the display in the error style
    pub fn error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }
}

impl Widget for DisplayPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let display_y = area.bottom() - 1;
        write_right_aligned(buf, area, display_y, self.display, display_style(self.is_error));

        if let Some(expression) = self.expression {
            if area.height >= 2 {
                write_right_aligned(
                    buf,
                    area,
                    display_y - 1,
                    expression,
                    Style::default().fg(DIM_GRAY),
                );
            }
        }
    }
}

/// Fit `text` into `width` columns, keeping the tail
pub fn fit_tail(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail.push(c);
    }
    std::iter::once('…').chain(tail.into_iter().rev()).collect()
}

fn write_right_aligned(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let fitted = fit_tail(text, usize::from(area.width));
    let width = u16::try_from(fitted.width()).unwrap_or(area.width);
    let x = area.right().saturating_sub(width);
    buf.set_string(x, y, &fitted, style);
}
