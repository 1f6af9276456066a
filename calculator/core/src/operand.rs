//! Operand Buffers
//!
//! Text buffers for the two numbers a calculation consumes. A buffer is
//! either [`OperandBuffer::Empty`] (nothing typed yet) or holds an
//! [`Operand`]: the literal text the user built plus whether a decimal point
//! has been committed to it.
//!
//! The text is kept as typed ("05", "0.", "-3") and only parsed into a
//! number when an operation consumes it.

use serde::{Deserialize, Serialize};

use crate::buttons::Digit;

/// Text shown for an empty buffer
pub const EMPTY_DISPLAY: &str = "0";

/// Which of the two operands is receiving edits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandSlot {
    /// Entering the first operand
    #[default]
    First,
    /// Entering the second operand
    Second,
}

/// A typed operand
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    text: String,
    has_decimal_point: bool,
}

impl Operand {
    /// Operand consisting of a single digit
    #[must_use]
    pub fn from_digit(digit: Digit) -> Self {
        Self {
            text: digit.as_char().to_string(),
            has_decimal_point: false,
        }
    }

    /// The operand produced by pressing the decimal point on an empty buffer
    #[must_use]
    pub fn leading_point() -> Self {
        Self {
            text: "0.".to_string(),
            has_decimal_point: true,
        }
    }

    /// The zero operand
    #[must_use]
    pub fn zero() -> Self {
        Self {
            text: EMPTY_DISPLAY.to_string(),
            has_decimal_point: false,
        }
    }

    /// Current text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether a decimal point has been committed
    #[must_use]
    pub fn has_decimal_point(&self) -> bool {
        self.has_decimal_point
    }

    /// Whether the text carries a leading minus sign
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.text.starts_with('-')
    }

    /// Append a digit
    pub fn push_digit(&mut self, digit: Digit) {
        self.text.push(digit.as_char());
    }

    /// Append a decimal point; no-op if one is already present
    pub fn push_point(&mut self) {
        if self.has_decimal_point {
            return;
        }
        self.text.push('.');
        self.has_decimal_point = true;
    }

    /// Add or remove the leading minus sign
    pub fn toggle_sign(&mut self) {
        if self.is_negative() {
            self.text.remove(0);
        } else {
            self.text.insert(0, '-');
        }
    }

    /// Numeric value of the text
    ///
    /// # Panics
    ///
    /// Panics if the text is not a number. Buffers only hold digits, one
    /// point and a leading sign.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self.text.parse::<f64>() {
            Ok(value) => value,
            Err(e) => panic!("operand buffer holds non-numeric text {:?}: {e}", self.text),
        }
    }

    /// This operand divided by 100
    ///
    /// Integral results are rendered without a decimal point (and the flag is
    /// cleared); fractional results are rendered as decimals with the flag set.
    ///
    /// # Errors
    ///
    /// Returns a [`ResultFault`] under the same rules as [`format_result`].
    pub fn percent(&self) -> Result<Self, ResultFault> {
        let value = self.value() / 100.0;
        format_result(value, value.fract() != 0.0)
    }

    /// Build an operand from formatted result text
    fn from_text(text: String) -> Self {
        let has_decimal_point = text.contains('.');
        Self {
            text,
            has_decimal_point,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// An operand buffer that may not have been started yet
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandBuffer {
    /// Nothing typed yet
    #[default]
    Empty,
    /// Something typed
    Entered(Operand),
}

impl OperandBuffer {
    /// The operand, if one has been entered
    #[must_use]
    pub fn operand(&self) -> Option<&Operand> {
        match self {
            Self::Empty => None,
            Self::Entered(operand) => Some(operand),
        }
    }

    /// Mutable access to the operand, if one has been entered
    pub fn operand_mut(&mut self) -> Option<&mut Operand> {
        match self {
            Self::Empty => None,
            Self::Entered(operand) => Some(operand),
        }
    }

    /// Whether nothing has been typed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the buffer carries a committed decimal point
    #[must_use]
    pub fn has_decimal_point(&self) -> bool {
        self.operand().is_some_and(Operand::has_decimal_point)
    }

    /// Text to display for this buffer ("0" when empty)
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.operand().map_or(EMPTY_DISPLAY, Operand::text)
    }
}

impl From<Operand> for OperandBuffer {
    fn from(operand: Operand) -> Self {
        Self::Entered(operand)
    }
}

/// Reasons a computed value cannot be shown as an operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultFault {
    /// Infinity or NaN (division by zero, overflow)
    NotFinite,
    /// Integer rendering would not fit in an `i64`
    OutOfRange,
}

/// Format a computed value as an operand
///
/// With `decimal` unset the value is truncated toward zero and rendered as an
/// integer. With `decimal` set it is rendered as the shortest decimal text
/// that round-trips.
///
/// # Errors
///
/// Returns a [`ResultFault`] for non-finite values, or for integer renderings
/// outside the `i64` range.
pub fn format_result(value: f64, decimal: bool) -> Result<Operand, ResultFault> {
    if !value.is_finite() {
        return Err(ResultFault::NotFinite);
    }
    if decimal {
        return Ok(Operand::from_text(decimal_text(value)));
    }

    let truncated = value.trunc();
    #[allow(clippy::cast_precision_loss)]
    let (min, max) = (i64::MIN as f64, i64::MAX as f64);
    if truncated < min || truncated >= max {
        return Err(ResultFault::OutOfRange);
    }
    Ok(Operand::from_text(integer_text(truncated)))
}

#[allow(clippy::cast_possible_truncation)]
fn integer_text(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

fn decimal_text(value: f64) -> String {
    // Avoid rendering negative zero as "-0"
    if value == 0.0 {
        EMPTY_DISPLAY.to_string()
    } else {
        value.to_string()
    }
}
