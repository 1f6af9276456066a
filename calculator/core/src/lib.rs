//! Calculator Core - Headless Calculator Engine
//!
//! This crate holds the calculator's input, state and evaluation logic,
//! completely independent of any UI framework. A surface (the terminal UI,
//! a test harness, a script) forwards button presses and renders whatever
//! display text the engine reports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 UI Surface                   │
//! │   keypad / keyboard / scripted key string    │
//! └───────┬──────────────────────────▲───────────┘
//!         │ handle(ButtonIdentity)   │ observer fires,
//!         │                          │ surface re-reads display
//! ┌───────▼──────────────────────────┴───────────┐
//! │              CalculatorEngine                │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────────┐  │
//! │  │ Operand  │ │ Pending  │ │ Repeat-equals│  │
//! │  │ buffers  │ │operation │ │   memory     │  │
//! │  └──────────┘ └──────────┘ └──────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use calculator_core::{ButtonIdentity, CalculatorEngine};
//!
//! let mut engine = CalculatorEngine::default();
//! for key in "7+3+2=".chars() {
//!     if let Some(button) = ButtonIdentity::from_key(key) {
//!         engine.handle(button);
//!     }
//! }
//! assert_eq!(engine.current_display(), "12");
//! ```
//!
//! # Module Overview
//!
//! - [`buttons`]: Button identities and keypad metadata
//! - [`operation`]: The four arithmetic operations
//! - [`operand`]: Operand buffers and result formatting
//! - [`observers`]: Synchronous change notification
//! - [`engine`]: The calculator state machine
//! - [`config`]: TOML/environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buttons;
pub mod config;
pub mod engine;
pub mod observers;
pub mod operand;
pub mod operation;

// Re-exports for convenience
pub use buttons::{ButtonCatalog, ButtonCategory, ButtonIdentity, Digit};
pub use engine::{CalculatorEngine, EngineConfig, EngineSnapshot, DEFAULT_ERROR_TEXT};
pub use observers::{ObserverId, ObserverRegistry};
pub use operand::{Operand, OperandBuffer, OperandSlot};
pub use operation::OperationKind;

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, CalculatorConfigFile,
    CalculatorToml, ConfigError, ConfigOverrides, ConfigSource,
};
