//! Calculator Engine - The State Machine
//!
//! The engine owns every piece of calculator state: the two operand buffers,
//! which one is being edited, the pending operation, and the memory used to
//! repeat the last evaluation when Equals is pressed again.
//!
//! # Design Philosophy
//!
//! The engine is surface-agnostic. A surface forwards button presses through
//! [`CalculatorEngine::handle`] and re-reads [`CalculatorEngine::current_display`]
//! (or [`CalculatorEngine::snapshot`]) whenever an observer fires. Every press
//! is handled to completion, observers included, before `handle` returns.
//!
//! # Error State
//!
//! Division by zero, results that overflow to infinity, and integer results
//! outside the `i64` range put the engine into an error state. The display
//! shows the configured sentinel and every button except AllClear is ignored
//! until AllClear is pressed.

use serde::{Deserialize, Serialize};

use crate::buttons::{ButtonIdentity, Digit};
use crate::observers::{ObserverId, ObserverRegistry};
use crate::operand::{
    format_result, Operand, OperandBuffer, OperandSlot, ResultFault, EMPTY_DISPLAY,
};
use crate::operation::OperationKind;

/// Default sentinel shown in the error state
pub const DEFAULT_ERROR_TEXT: &str = "Error";

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Display text while in the error state
    pub error_text: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_text: DEFAULT_ERROR_TEXT.to_string(),
        }
    }
}

/// Point-in-time view of the engine for rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Text for the main display
    pub display: String,
    /// `"<first> <op>"` while the second operand is being entered
    pub expression: Option<String>,
    /// Operation awaiting its second operand
    pub pending_operation: Option<OperationKind>,
    /// Which operand is receiving edits
    pub active_slot: OperandSlot,
    /// Whether the engine is in the error state
    pub is_error: bool,
}

/// The calculator state machine
#[derive(Debug)]
pub struct CalculatorEngine {
    /// Configuration
    config: EngineConfig,
    /// Operand receiving digit input
    active_slot: OperandSlot,
    /// First operand (and running result)
    first: OperandBuffer,
    /// Second operand
    second: OperandBuffer,
    /// Operation selected but not yet applied
    pending_operation: Option<OperationKind>,
    /// Operand replayed by a repeated Equals
    last_operand: Option<Operand>,
    /// Operation replayed by a repeated Equals
    last_operation: Option<OperationKind>,
    /// Text currently shown
    display: String,
    /// Set while in the error state
    fault: Option<ResultFault>,
    /// Change listeners
    observers: ObserverRegistry,
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CalculatorEngine {
    /// Create an engine in the all-clear configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            active_slot: OperandSlot::First,
            first: OperandBuffer::Empty,
            second: OperandBuffer::Empty,
            pending_operation: None,
            last_operand: None,
            last_operation: None,
            display: EMPTY_DISPLAY.to_string(),
            fault: None,
            observers: ObserverRegistry::new(),
        }
    }

    /// Handle a single button press
    ///
    /// Updates state and the display text, then notifies every observer
    /// before returning.
    pub fn handle(&mut self, button: ButtonIdentity) {
        if self.fault.is_some() && button != ButtonIdentity::AllClear {
            tracing::debug!(button = %button, "Ignoring button while in error state");
        } else {
            match button {
                ButtonIdentity::AllClear => self.all_clear(),
                ButtonIdentity::ToggleSign => self.toggle_sign(),
                ButtonIdentity::Percent => self.percent(),
                ButtonIdentity::Divide => self.select_operation(OperationKind::Divide),
                ButtonIdentity::Multiply => self.select_operation(OperationKind::Multiply),
                ButtonIdentity::Subtract => self.select_operation(OperationKind::Subtract),
                ButtonIdentity::Add => self.select_operation(OperationKind::Add),
                ButtonIdentity::Equals => self.equals(),
                ButtonIdentity::Digit(digit) => self.push_digit(digit),
                ButtonIdentity::DecimalPoint => self.push_point(),
            }
        }

        self.refresh_display();
        tracing::debug!(
            button = %button,
            display = %self.display,
            slot = ?self.active_slot,
            pending = ?self.pending_operation,
            "Button handled"
        );
        self.observers.notify_all();
    }

    /// Handle a sequence of presses in order
    pub fn handle_all<I>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = ButtonIdentity>,
    {
        for button in buttons {
            self.handle(button);
        }
    }

    /// Text currently shown on the display
    #[must_use]
    pub fn current_display(&self) -> &str {
        &self.display
    }

    /// Register an observer invoked once per [`handle`](Self::handle) call
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        self.observers.register(observer)
    }

    /// Remove an observer; returns whether it was registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Number of registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.count()
    }

    /// Capture the state a surface needs to render
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            display: self.display.clone(),
            expression: self.expression(),
            pending_operation: self.pending_operation,
            active_slot: self.active_slot,
            is_error: self.is_error(),
        }
    }

    /// Which operand is receiving edits
    #[must_use]
    pub fn active_slot(&self) -> OperandSlot {
        self.active_slot
    }

    /// Operation awaiting its second operand
    #[must_use]
    pub fn pending_operation(&self) -> Option<OperationKind> {
        self.pending_operation
    }

    /// First operand buffer
    #[must_use]
    pub fn first_operand(&self) -> &OperandBuffer {
        &self.first
    }

    /// Second operand buffer
    #[must_use]
    pub fn second_operand(&self) -> &OperandBuffer {
        &self.second
    }

    /// The buffer currently receiving edits
    #[must_use]
    pub fn active_operand(&self) -> &OperandBuffer {
        match self.active_slot {
            OperandSlot::First => &self.first,
            OperandSlot::Second => &self.second,
        }
    }

    /// Operation and operand a repeated Equals would replay
    #[must_use]
    pub fn last_committed(&self) -> (Option<OperationKind>, Option<&Operand>) {
        (self.last_operation, self.last_operand.as_ref())
    }

    /// Whether the engine is in the error state
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.fault.is_some()
    }

    /// Engine configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Button behaviors
    // ========================================================================

    fn all_clear(&mut self) {
        self.active_slot = OperandSlot::First;
        self.first = OperandBuffer::Empty;
        self.second = OperandBuffer::Empty;
        self.pending_operation = None;
        self.last_operand = None;
        self.last_operation = None;
        self.fault = None;
    }

    fn push_digit(&mut self, digit: Digit) {
        let buffer = self.active_buffer_mut();
        match buffer.operand_mut() {
            Some(operand) => operand.push_digit(digit),
            None => *buffer = Operand::from_digit(digit).into(),
        }
        self.remember_active_operand();
    }

    fn push_point(&mut self) {
        let buffer = self.active_buffer_mut();
        if buffer.has_decimal_point() {
            return;
        }
        match buffer.operand_mut() {
            Some(operand) => operand.push_point(),
            None => *buffer = Operand::leading_point().into(),
        }
        self.remember_active_operand();
    }

    fn toggle_sign(&mut self) {
        let Some(operand) = self.active_buffer_mut().operand_mut() else {
            return;
        };
        operand.toggle_sign();
        self.remember_active_operand();
    }

    fn percent(&mut self) {
        let Some(outcome) = self.active_operand().operand().map(Operand::percent) else {
            return;
        };
        match outcome {
            Ok(result) => {
                *self.active_buffer_mut() = result.into();
                self.remember_active_operand();
            }
            Err(fault) => self.enter_fault(fault),
        }
    }

    fn select_operation(&mut self, operation: OperationKind) {
        match self.active_slot {
            OperandSlot::First => {
                if self.first.is_empty() {
                    self.first = Operand::zero().into();
                }
                self.second = OperandBuffer::Empty;
                self.pending_operation = Some(operation);
                self.active_slot = OperandSlot::Second;
            }
            OperandSlot::Second => {
                let outcome = match (
                    self.pending_operation,
                    self.first.operand(),
                    self.second.operand(),
                ) {
                    (Some(pending), Some(a), Some(b)) => Some(evaluate(pending, a, b)),
                    _ => None,
                };

                match outcome {
                    Some(Ok(result)) => {
                        self.second = OperandBuffer::Empty;
                        self.first = result.into();
                        self.pending_operation = Some(operation);
                    }
                    Some(Err(fault)) => self.enter_fault(fault),
                    None => self.pending_operation = Some(operation),
                }
            }
        }
    }

    fn equals(&mut self) {
        if let Some(pending) = self.pending_operation {
            let (Some(a), Some(b)) = (self.first.operand(), self.second.operand()) else {
                tracing::debug!(pending = %pending, "Equals without a second operand");
                return;
            };
            let consumed = b.clone();
            match evaluate(pending, a, b) {
                Ok(result) => {
                    self.second = OperandBuffer::Empty;
                    self.pending_operation = None;
                    self.first = result.into();
                    self.last_operation = Some(pending);
                    self.last_operand = Some(consumed);
                    self.active_slot = OperandSlot::First;
                }
                Err(fault) => self.enter_fault(fault),
            }
        } else if let (Some(operation), Some(operand)) =
            (self.last_operation, self.last_operand.as_ref())
        {
            let zero = Operand::zero();
            let a = self.first.operand().unwrap_or(&zero);
            match evaluate(operation, a, operand) {
                Ok(result) => self.first = result.into(),
                Err(fault) => self.enter_fault(fault),
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn active_buffer_mut(&mut self) -> &mut OperandBuffer {
        match self.active_slot {
            OperandSlot::First => &mut self.first,
            OperandSlot::Second => &mut self.second,
        }
    }

    fn remember_active_operand(&mut self) {
        self.last_operand = self.active_operand().operand().cloned();
    }

    fn enter_fault(&mut self, fault: ResultFault) {
        let dividing_by_zero = self.pending_operation == Some(OperationKind::Divide)
            && self.second.operand().is_some_and(|b| b.value() == 0.0);
        tracing::warn!(
            fault = ?fault,
            division_by_zero = dividing_by_zero,
            "Arithmetic fault; AllClear required"
        );
        self.fault = Some(fault);
    }

    fn expression(&self) -> Option<String> {
        match (self.active_slot, self.pending_operation) {
            (OperandSlot::Second, Some(operation)) if !self.is_error() => Some(format!(
                "{} {}",
                self.first.display_text(),
                operation.symbol()
            )),
            _ => None,
        }
    }

    fn refresh_display(&mut self) {
        self.display = if self.fault.is_some() {
            self.config.error_text.clone()
        } else {
            self.active_operand().display_text().to_string()
        };
    }
}

/// Apply `operation` to two operands and format the result
///
/// Decimal formatting is used when either operand carries a decimal point.
fn evaluate(
    operation: OperationKind,
    a: &Operand,
    b: &Operand,
) -> Result<Operand, ResultFault> {
    let decimal = a.has_decimal_point() || b.has_decimal_point();
    format_result(operation.apply(a.value(), b.value()), decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn d(value: u8) -> ButtonIdentity {
        ButtonIdentity::digit(value).unwrap()
    }

    fn press(engine: &mut CalculatorEngine, buttons: &[ButtonIdentity]) {
        engine.handle_all(buttons.iter().copied());
    }

    #[test]
    fn test_initial_state() {
        let engine = CalculatorEngine::default();
        assert_eq!(engine.current_display(), "0");
        assert_eq!(engine.active_slot(), OperandSlot::First);
        assert!(engine.first_operand().is_empty());
        assert!(engine.second_operand().is_empty());
        assert_eq!(engine.pending_operation(), None);
        assert!(!engine.is_error());
    }

    #[test]
    fn test_digits_concatenate() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(1), d(2), d(3)]);
        assert_eq!(engine.current_display(), "123");
        assert_eq!(engine.first_operand().display_text(), "123");
    }

    #[test]
    fn test_digit_updates_last_committed_operand() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(4), d(2)]);
        let (operation, operand) = engine.last_committed();
        assert_eq!(operation, None);
        assert_eq!(operand.map(Operand::text), Some("42"));
    }

    #[test]
    fn test_decimal_point_on_empty_buffer() {
        let mut engine = CalculatorEngine::default();
        engine.handle(ButtonIdentity::DecimalPoint);
        assert_eq!(engine.current_display(), "0.");
        assert!(engine.first_operand().has_decimal_point());
        engine.handle(d(5));
        assert_eq!(engine.current_display(), "0.5");
    }

    #[test]
    fn test_decimal_point_idempotent() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(3), ButtonIdentity::DecimalPoint]);
        let once = engine.current_display().to_string();
        engine.handle(ButtonIdentity::DecimalPoint);
        assert_eq!(engine.current_display(), once);
        press(&mut engine, &[d(1), ButtonIdentity::DecimalPoint, d(4)]);
        assert_eq!(engine.current_display(), "3.14");
    }

    #[test]
    fn test_toggle_sign() {
        let mut engine = CalculatorEngine::default();
        engine.handle(ButtonIdentity::ToggleSign);
        assert_eq!(engine.current_display(), "0");
        assert!(engine.first_operand().is_empty());

        press(&mut engine, &[d(8), ButtonIdentity::ToggleSign]);
        assert_eq!(engine.current_display(), "-8");
        assert_eq!(engine.last_committed().1.map(Operand::text), Some("-8"));

        engine.handle(ButtonIdentity::ToggleSign);
        assert_eq!(engine.current_display(), "8");
    }

    #[test]
    fn test_percent() {
        let mut engine = CalculatorEngine::default();
        engine.handle(ButtonIdentity::Percent);
        assert!(engine.first_operand().is_empty());

        press(&mut engine, &[d(5), d(0), ButtonIdentity::Percent]);
        assert_eq!(engine.current_display(), "0.5");
        assert!(engine.first_operand().has_decimal_point());
    }

    #[test]
    fn test_percent_integral_result() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(3), d(0), d(0), ButtonIdentity::Percent]);
        assert_eq!(engine.current_display(), "3");
        assert!(!engine.first_operand().has_decimal_point());
    }

    #[test]
    fn test_percent_on_second_operand() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(2), d(0), d(0), ButtonIdentity::Add, d(5), d(0), ButtonIdentity::Percent],
        );
        assert_eq!(engine.current_display(), "0.5");
        assert!(engine.second_operand().has_decimal_point());
        assert!(!engine.first_operand().has_decimal_point());

        engine.handle(ButtonIdentity::Equals);
        assert_eq!(engine.current_display(), "200.5");
    }

    #[test]
    fn test_percent_out_of_range_enters_error_state() {
        let mut engine = CalculatorEngine::default();
        for c in "1234567890123456789012345".chars() {
            engine.handle(ButtonIdentity::from_key(c).unwrap());
        }
        engine.handle(ButtonIdentity::Percent);
        assert!(engine.is_error());
        assert_eq!(engine.current_display(), DEFAULT_ERROR_TEXT);
    }

    #[test]
    fn test_percent_overflow_enters_error_state() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(9); 310]);
        engine.handle(ButtonIdentity::Percent);
        assert_eq!(engine.current_display(), DEFAULT_ERROR_TEXT);

        press(&mut engine, &[d(5), ButtonIdentity::Add, d(1), ButtonIdentity::Equals]);
        assert_eq!(engine.current_display(), DEFAULT_ERROR_TEXT);

        engine.handle(ButtonIdentity::AllClear);
        assert_eq!(engine.current_display(), "0");
    }

    #[test]
    fn test_operation_switches_slot() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(7), ButtonIdentity::Add]);
        assert_eq!(engine.active_slot(), OperandSlot::Second);
        assert_eq!(engine.pending_operation(), Some(OperationKind::Add));
        assert!(engine.second_operand().is_empty());
        assert_eq!(engine.current_display(), "0");
        assert_eq!(engine.snapshot().expression.as_deref(), Some("7 +"));
    }

    #[test]
    fn test_operation_replaced_before_second_operand() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(6), ButtonIdentity::Add, ButtonIdentity::Multiply],
        );
        assert_eq!(engine.pending_operation(), Some(OperationKind::Multiply));
        press(&mut engine, &[d(2), ButtonIdentity::Equals]);
        assert_eq!(engine.current_display(), "12");
    }

    #[test]
    fn test_operation_on_empty_first_operand_uses_zero() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[ButtonIdentity::Subtract, d(4), ButtonIdentity::Equals],
        );
        assert_eq!(engine.current_display(), "-4");
    }

    #[test]
    fn test_chained_operations() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[
                d(7),
                ButtonIdentity::Add,
                d(3),
                ButtonIdentity::Add,
                d(2),
                ButtonIdentity::Equals,
            ],
        );
        assert_eq!(engine.current_display(), "12");
        assert_eq!(engine.active_slot(), OperandSlot::First);
        assert_eq!(engine.pending_operation(), None);
    }

    #[test]
    fn test_chain_keeps_intermediate_result_in_first_operand() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(7), ButtonIdentity::Add, d(3), ButtonIdentity::Multiply],
        );
        assert_eq!(engine.first_operand().display_text(), "10");
        assert!(engine.second_operand().is_empty());
        assert_eq!(engine.active_slot(), OperandSlot::Second);
        assert_eq!(engine.pending_operation(), Some(OperationKind::Multiply));
    }

    #[test]
    fn test_repeat_equals() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[
                d(5),
                ButtonIdentity::Add,
                d(2),
                ButtonIdentity::Equals,
            ],
        );
        assert_eq!(engine.current_display(), "7");
        engine.handle(ButtonIdentity::Equals);
        assert_eq!(engine.current_display(), "9");
        engine.handle(ButtonIdentity::Equals);
        assert_eq!(engine.current_display(), "11");
    }

    #[test]
    fn test_equals_without_operation_is_noop() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(5), ButtonIdentity::Equals]);
        assert_eq!(engine.current_display(), "5");
    }

    #[test]
    fn test_equals_without_second_operand_is_noop() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(5), ButtonIdentity::Add, ButtonIdentity::Equals]);
        assert_eq!(engine.pending_operation(), Some(OperationKind::Add));
        assert_eq!(engine.active_slot(), OperandSlot::Second);
    }

    #[test]
    fn test_integer_division_truncates() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(7), ButtonIdentity::Divide, d(2), ButtonIdentity::Equals],
        );
        assert_eq!(engine.current_display(), "3");
    }

    #[test]
    fn test_decimal_operand_gives_decimal_result() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[
                d(7),
                ButtonIdentity::DecimalPoint,
                ButtonIdentity::Divide,
                d(2),
                ButtonIdentity::Equals,
            ],
        );
        assert_eq!(engine.current_display(), "3.5");
        assert!(engine.first_operand().has_decimal_point());
    }

    #[test]
    fn test_division_by_zero_enters_error_state() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(8), ButtonIdentity::Divide, d(0), ButtonIdentity::Equals],
        );
        assert_eq!(engine.current_display(), DEFAULT_ERROR_TEXT);
        assert!(engine.is_error());

        press(&mut engine, &[d(1), ButtonIdentity::Add, ButtonIdentity::Equals]);
        assert_eq!(engine.current_display(), DEFAULT_ERROR_TEXT);

        engine.handle(ButtonIdentity::AllClear);
        assert_eq!(engine.current_display(), "0");
        assert!(!engine.is_error());

        press(
            &mut engine,
            &[d(2), ButtonIdentity::Add, d(2), ButtonIdentity::Equals],
        );
        assert_eq!(engine.current_display(), "4");
    }

    #[test]
    fn test_division_by_zero_in_chain() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[d(8), ButtonIdentity::Divide, d(0), ButtonIdentity::Add],
        );
        assert!(engine.is_error());
        assert_eq!(engine.snapshot().expression, None);
    }

    #[test]
    fn test_custom_error_text() {
        let mut engine = CalculatorEngine::new(EngineConfig {
            error_text: "Not a number".to_string(),
        });
        press(
            &mut engine,
            &[d(0), ButtonIdentity::Divide, d(0), ButtonIdentity::Equals],
        );
        assert_eq!(engine.current_display(), "Not a number");
    }

    #[test]
    fn test_all_clear_resets_everything() {
        let mut engine = CalculatorEngine::default();
        press(
            &mut engine,
            &[
                d(5),
                ButtonIdentity::Add,
                d(2),
                ButtonIdentity::Equals,
                ButtonIdentity::AllClear,
            ],
        );
        assert_eq!(engine.current_display(), "0");
        assert_eq!(engine.last_committed(), (None, None));
        engine.handle(ButtonIdentity::Equals);
        assert_eq!(engine.current_display(), "0");
    }

    #[test]
    fn test_observer_notified_once_per_press() {
        let mut engine = CalculatorEngine::default();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        engine.subscribe(move || seen.set(seen.get() + 1));

        press(&mut engine, &[d(1), ButtonIdentity::ToggleSign, ButtonIdentity::Percent]);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut engine = CalculatorEngine::default();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = engine.subscribe(move || seen.set(seen.get() + 1));

        engine.handle(d(1));
        assert!(engine.unsubscribe(id));
        engine.handle(d(2));
        assert_eq!(count.get(), 1);
        assert_eq!(engine.observer_count(), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = CalculatorEngine::default();
        press(&mut engine, &[d(9), ButtonIdentity::Multiply]);
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["display"], "0");
        assert_eq!(json["expression"], "9 x");
        assert_eq!(json["pending_operation"], "Multiply");
        assert_eq!(json["active_slot"], "Second");
        assert_eq!(json["is_error"], false);
    }
}
