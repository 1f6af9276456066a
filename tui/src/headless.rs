//! Headless Evaluation
//!
//! Drives the engine from a key string without a terminal, for scripting
//! and CI. Keys use the same mapping as the interactive keypad; whitespace
//! is ignored.
//!
//! ```text
//! calc-tui --eval "7+3+2="        # prints 12
//! calc-tui --eval "8/0=" --json   # prints an EngineSnapshot as JSON
//! ```

use std::cell::Cell;
use std::rc::Rc;

use anyhow::bail;
use serde::Serialize;

use calculator_core::{ButtonIdentity, CalculatorEngine, EngineConfig, EngineSnapshot};

/// Outcome of a headless run
#[derive(Clone, Debug, Serialize)]
pub struct EvalReport {
    /// Buttons pressed
    pub presses: usize,
    /// Observer notifications received
    pub notifications: usize,
    /// Final engine state
    pub snapshot: EngineSnapshot,
}

/// Translate a key string into button presses
///
/// # Errors
///
/// Fails on the first character with no button mapping.
pub fn parse_keys(keys: &str) -> anyhow::Result<Vec<ButtonIdentity>> {
    let mut buttons = Vec::with_capacity(keys.len());
    for (position, key) in keys.chars().enumerate() {
        if key.is_whitespace() {
            continue;
        }
        match ButtonIdentity::from_key(key) {
            Some(button) => buttons.push(button),
            None => bail!("no calculator button for key {key:?} at position {position}"),
        }
    }
    Ok(buttons)
}

/// Press every key in `keys` on a fresh engine
///
/// # Errors
///
/// Fails if `keys` contains a character with no button mapping; nothing is
/// pressed in that case.
pub fn evaluate(keys: &str, config: EngineConfig) -> anyhow::Result<EvalReport> {
    let buttons = parse_keys(keys)?;

    let mut engine = CalculatorEngine::new(config);
    let notifications = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&notifications);
    engine.subscribe(move || counter.set(counter.get() + 1));

    engine.handle_all(buttons.iter().copied());
    tracing::debug!(presses = buttons.len(), display = %engine.current_display(), "Headless run complete");

    Ok(EvalReport {
        presses: buttons.len(),
        notifications: notifications.get(),
        snapshot: engine.snapshot(),
    })
}
