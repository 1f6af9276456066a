//! Custom widgets for the calculator surface

pub mod display_panel;
pub mod keypad;

pub use display_panel::DisplayPanel;
pub use keypad::{KeyRect, Keypad, KeypadLayout};
