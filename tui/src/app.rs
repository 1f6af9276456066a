//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - CalculatorEngine for all calculator state
//! - DisplayState for rendering
//!
//! # Flow
//!
//! 1. Converts terminal events to `ButtonIdentity` presses
//! 2. Hands each press to the engine
//! 3. The engine's observer marks the display dirty
//! 4. The display re-reads the engine and the frame is redrawn

use std::io;

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::{Frame, Terminal};

use calculator_core::{ButtonIdentity, CalculatorConfigFile, CalculatorEngine};

use crate::display::DisplayState;
use crate::theme::DIM_GRAY;
use crate::widgets::keypad::KEYPAD_ROWS;
use crate::widgets::{DisplayPanel, Keypad, KeypadLayout};

/// Display panel height (expression line, result line, spacer)
const DISPLAY_HEIGHT: u16 = 3;

/// Smallest terminal the keypad can be drawn in
const MIN_SIZE: (u16, u16) = (16, 10);

/// Minimum keypad height in rows
const KEYPAD_MIN_HEIGHT: u16 = KEYPAD_ROWS;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Engine Integration ===
    /// The calculator engine
    engine: CalculatorEngine,
    /// Display state derived from engine snapshots
    display: DisplayState,

    // === UI State ===
    /// Keypad placement from the last frame (for mouse hit testing)
    keypad: KeypadLayout,
    /// Highlight the pending operator key
    highlight_pending: bool,
    /// Show the expression line
    show_expression: bool,
    /// Terminal size
    size: (u16, u16),
}

impl App {
    /// Create a new App for a terminal of the given size
    pub fn new(config: &CalculatorConfigFile, size: (u16, u16)) -> Self {
        let mut engine = CalculatorEngine::new(config.engine_config());
        let display = DisplayState::attach(&mut engine);
        let keypad = KeypadLayout::new(Self::regions(Rect::new(0, 0, size.0, size.1)).1);

        tracing::debug!(
            width = size.0,
            height = size.1,
            source = %config.source(),
            "App created"
        );

        Self {
            running: true,
            engine,
            display,
            keypad,
            highlight_pending: config.highlight_pending,
            show_expression: config.show_expression,
            size,
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let Some(event) = event_stream.next().await else {
                tracing::debug!("Terminal event stream closed");
                break;
            };

            match event? {
                // Only handle Press events (not Release or Repeat)
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(w, h) => self.handle_resize(w, h),
                _ => {}
            }

            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') => self.running = false,

            KeyCode::Enter => self.press(ButtonIdentity::Equals),
            KeyCode::Delete | KeyCode::Backspace => self.press(ButtonIdentity::AllClear),

            KeyCode::Char(c) => {
                if let Some(button) = ButtonIdentity::from_key(c) {
                    self.press(button);
                }
            }

            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(button) = self.keypad.hit_test(mouse.column, mouse.row) {
                self.press(button);
            }
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.keypad = KeypadLayout::new(Self::regions(Rect::new(0, 0, width, height)).1);
    }

    /// Press a button on the engine and pick up the resulting state
    pub fn press(&mut self, button: ButtonIdentity) {
        self.engine.handle(button);
        self.display.sync(&self.engine);
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if area.width < MIN_SIZE.0 || area.height < MIN_SIZE.1 {
            frame.render_widget(
                ratatui::widgets::Paragraph::new("Terminal too small")
                    .style(Style::default().fg(DIM_GRAY)),
                area,
            );
            return;
        }

        let (display_area, keypad_area, status_area) = Self::regions(area);
        if self.keypad.area() != keypad_area {
            self.keypad = KeypadLayout::new(keypad_area);
        }

        let expression = if self.show_expression {
            self.display.expression()
        } else {
            None
        };
        frame.render_widget(
            DisplayPanel::new(self.display.text())
                .expression(expression)
                .error(self.display.is_error()),
            display_area,
        );

        frame.render_widget(
            Keypad::new(&self.keypad)
                .pending(self.display.snapshot().pending_operation)
                .highlight_pending(self.highlight_pending),
            keypad_area,
        );

        let status = format!(
            " {} | c: AC  n: +/-  Enter: = | Esc to quit",
            self.display.status()
        );
        frame.render_widget(
            ratatui::widgets::Paragraph::new(status).style(Style::default().fg(DIM_GRAY)),
            status_area,
        );
    }

    /// Split the screen into display, keypad and status regions
    fn regions(area: Rect) -> (Rect, Rect, Rect) {
        let [display, keypad, status] = Layout::vertical([
            Constraint::Length(DISPLAY_HEIGHT),
            Constraint::Min(KEYPAD_MIN_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

        // Keep the display clear of the spacer row
        let display = Rect {
            height: display.height.saturating_sub(1),
            ..display
        };
        (display, keypad, status)
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Keypad placement from the last frame
    pub fn keypad(&self) -> &KeypadLayout {
        &self.keypad
    }

    /// Terminal size
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

/// Print the final display after the TUI closes, so results can be piped
pub fn print_result(app: &App) -> io::Result<()> {
    use std::io::Write;

    writeln!(io::stdout().lock(), "{}", app.display().text())
}
