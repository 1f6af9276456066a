//! Keypad Widget
//!
//! Lays the catalog's buttons out on a grid, draws them, and maps mouse
//! positions back to buttons.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use calculator_core::{ButtonCatalog, ButtonIdentity, OperationKind};

use crate::theme::key_style;

/// Number of keypad rows
pub const KEYPAD_ROWS: u16 = 5;

/// A button and the screen area it occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyRect {
    /// The button
    pub button: ButtonIdentity,
    /// Screen area (gap excluded)
    pub area: Rect,
}

/// Screen placement of every keypad button
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeypadLayout {
    area: Rect,
    keys: Vec<KeyRect>,
}

impl KeypadLayout {
    /// Lay the keypad out inside `area`
    ///
    /// Keys are separated by a one-cell gap when there is room for it.
    pub fn new(area: Rect) -> Self {
        let col_width = area.width / ButtonCatalog::COLUMNS;
        let row_height = area.height / KEYPAD_ROWS;

        if col_width == 0 || row_height == 0 {
            return Self {
                area,
                keys: Vec::new(),
            };
        }

        let h_gap = u16::from(col_width > 2);
        let v_gap = u16::from(row_height > 2);

        let keys = ButtonCatalog::placements()
            .into_iter()
            .map(|(button, row, column, span)| KeyRect {
                button,
                area: Rect::new(
                    area.x + column * col_width,
                    area.y + row * row_height,
                    (span * col_width).saturating_sub(h_gap),
                    row_height.saturating_sub(v_gap),
                ),
            })
            .collect();

        Self { area, keys }
    }

    /// The area this layout was computed for
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Every placed key
    pub fn keys(&self) -> &[KeyRect] {
        &self.keys
    }

    /// Screen area of `button`
    pub fn rect_for(&self, button: ButtonIdentity) -> Option<Rect> {
        self.keys
            .iter()
            .find(|k| k.button == button)
            .map(|k| k.area)
    }

    /// Button under the given cell, if any
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ButtonIdentity> {
        self.keys
            .iter()
            .find(|k| {
                x >= k.area.x && x < k.area.right() && y >= k.area.y && y < k.area.bottom()
            })
            .map(|k| k.button)
    }
}

/// Renders a [`KeypadLayout`]
pub struct Keypad<'a> {
    layout: &'a KeypadLayout,
    pending: Option<OperationKind>,
    highlight_pending: bool,
}

impl<'a> Keypad<'a> {
    /// Keypad drawn over `layout`, nothing selected
    pub fn new(layout: &'a KeypadLayout) -> Self {
        Self {
            layout,
            pending: None,
            highlight_pending: true,
        }
    }

    /// Operation whose key should be drawn selected
    pub fn pending(mut self, pending: Option<OperationKind>) -> Self {
        self.pending = pending;
        self
    }

    /// Whether the pending operation's key is drawn selected
    pub fn highlight_pending(mut self, highlight: bool) -> Self {
        self.highlight_pending = highlight;
        self
    }

    fn is_selected(&self, button: ButtonIdentity) -> bool {
        self.highlight_pending
            && button.highlights_when_pending()
            && self.pending.is_some()
            && button.to_operation() == self.pending
    }
}

impl Widget for Keypad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for key in self.layout.keys() {
            let rect = key.area.intersection(area);
            if rect.is_empty() {
                continue;
            }

            let style = key_style(key.button.category(), self.is_selected(key.button));
            buf.set_style(rect, style);

            let label = key.button.label();
            let label_width = u16::try_from(label.width()).unwrap_or(u16::MAX);
            let x = rect.x + rect.width.saturating_sub(label_width) / 2;
            let y = rect.y + rect.height.saturating_sub(1) / 2;
            buf.set_string(x, y, label, style);
        }
    }
}
