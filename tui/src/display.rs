//! Display State
//!
//! What the surface currently shows, refreshed from the engine whenever the
//! engine's observer fires.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it renders what the engine reports and never
//! interprets calculator state itself. The observer only raises a flag; the
//! engine is still mutably borrowed while observers run, so the surface
//! re-reads it after `handle` returns.

use std::cell::Cell;
use std::rc::Rc;

use calculator_core::{CalculatorEngine, EngineSnapshot, ObserverId, OperandSlot};

/// Rendered state of the calculator
#[derive(Debug)]
pub struct DisplayState {
    /// Last snapshot read from the engine
    snapshot: EngineSnapshot,
    /// Raised by the engine observer, cleared on sync
    dirty: Rc<Cell<bool>>,
    /// Number of syncs performed
    syncs: u64,
    /// Registration with the engine
    observer: Option<ObserverId>,
}

impl DisplayState {
    /// Create display state mirroring `engine` and subscribe to its changes
    pub fn attach(engine: &mut CalculatorEngine) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let observer = engine.subscribe(move || flag.set(true));

        Self {
            snapshot: engine.snapshot(),
            dirty,
            syncs: 0,
            observer: Some(observer),
        }
    }

    /// Stop receiving notifications from `engine`
    pub fn detach(&mut self, engine: &mut CalculatorEngine) {
        if let Some(id) = self.observer.take() {
            engine.unsubscribe(id);
        }
    }

    /// Whether the engine has changed since the last sync
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Re-read the engine if it notified; returns whether anything was read
    pub fn sync(&mut self, engine: &CalculatorEngine) -> bool {
        if !self.dirty.replace(false) {
            return false;
        }
        self.snapshot = engine.snapshot();
        self.syncs += 1;
        tracing::trace!(display = %self.snapshot.display, "Display synced");
        true
    }

    /// Main display text
    pub fn text(&self) -> &str {
        &self.snapshot.display
    }

    /// Expression line, when one applies
    pub fn expression(&self) -> Option<&str> {
        self.snapshot.expression.as_deref()
    }

    /// Whether the engine is in its error state
    pub fn is_error(&self) -> bool {
        self.snapshot.is_error
    }

    /// The full snapshot
    pub fn snapshot(&self) -> &EngineSnapshot {
        &self.snapshot
    }

    /// Number of syncs performed
    pub fn sync_count(&self) -> u64 {
        self.syncs
    }

    /// Short description for the status bar
    pub fn status(&self) -> &'static str {
        if self.snapshot.is_error {
            return "Error - press c to clear";
        }
        match (self.snapshot.active_slot, self.snapshot.pending_operation) {
            (OperandSlot::Second, Some(_)) => "Entering second operand",
            _ => "Ready",
        }
    }
}
