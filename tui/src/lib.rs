//! Calculator TUI - Terminal keypad for the calculator engine
//!
//! This crate is the calculator's UI surface. It owns no calculator logic:
//! terminal keys and mouse clicks become `ButtonIdentity` presses, and the
//! display is redrawn from whatever the engine reports.
//!
//! # Architecture
//!
//! - **App**: Event loop, key/mouse mapping, frame layout
//! - **Display**: Engine snapshot kept in sync through an observer
//! - **Widgets**: Keypad grid and right-aligned display panel
//! - **Headless**: Key-string evaluation without a terminal

pub mod app;
pub mod display;
pub mod headless;
pub mod theme;
pub mod widgets;

pub use app::App;
