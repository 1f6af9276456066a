//! Button Catalog
//!
//! The fixed set of keypad buttons and the display metadata a surface needs
//! to draw them. The engine only ever looks at [`ButtonIdentity`]; labels,
//! categories and grid placement exist for UI surfaces.
//!
//! # Keypad
//!
//! ```text
//! ┌────┬────┬────┬────┐
//! │ AC │+/- │ %  │ ÷  │
//! ├────┼────┼────┼────┤
//! │ 7  │ 8  │ 9  │ x  │
//! ├────┼────┼────┼────┤
//! │ 4  │ 5  │ 6  │ -  │
//! ├────┼────┼────┼────┤
//! │ 1  │ 2  │ 3  │ +  │
//! ├────┴────┼────┼────┤
//! │    0    │ .  │ =  │
//! └─────────┴────┴────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::operation::OperationKind;

/// A single decimal digit (0-9)
///
/// Constructed through [`Digit::new`], so a multi-digit value can never
/// reach the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    /// Create a digit, or `None` if `value` is not in `0..=9`
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    /// Create a digit from its ASCII character
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| u8::try_from(d).ok()).and_then(Self::new)
    }

    /// Numeric value
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// ASCII character for this digit
    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("digit out of range: {value}"))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl std::fmt::Display for Digit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a keypad button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonIdentity {
    /// Reset everything
    AllClear,
    /// Flip the sign of the operand being entered
    ToggleSign,
    /// Divide the operand being entered by 100
    Percent,
    /// Division operator
    Divide,
    /// Multiplication operator
    Multiply,
    /// Subtraction operator
    Subtract,
    /// Addition operator
    Add,
    /// Evaluate (or repeat the last evaluation)
    Equals,
    /// A digit key
    Digit(Digit),
    /// The decimal point key
    DecimalPoint,
}

impl ButtonIdentity {
    /// Shorthand for a digit button; `None` if `value` is not a single digit
    #[must_use]
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(Self::Digit)
    }

    /// Label drawn on the key
    #[must_use]
    pub fn label(&self) -> &'static str {
        const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

        match self {
            Self::AllClear => "AC",
            Self::ToggleSign => "+/-",
            Self::Percent => "%",
            Self::Divide => OperationKind::Divide.symbol(),
            Self::Multiply => OperationKind::Multiply.symbol(),
            Self::Subtract => OperationKind::Subtract.symbol(),
            Self::Add => OperationKind::Add.symbol(),
            Self::Equals => "=",
            Self::Digit(d) => DIGIT_LABELS[usize::from(d.value())],
            Self::DecimalPoint => ".",
        }
    }

    /// Visual category (styling only)
    #[must_use]
    pub fn category(&self) -> ButtonCategory {
        match self {
            Self::AllClear | Self::ToggleSign | Self::Percent => ButtonCategory::NeutralFunction,
            Self::Divide | Self::Multiply | Self::Subtract | Self::Add | Self::Equals => {
                ButtonCategory::Operator
            }
            Self::Digit(_) | Self::DecimalPoint => ButtonCategory::DigitOrPoint,
        }
    }

    /// The arithmetic operation this button selects, if it is one
    #[must_use]
    pub fn to_operation(&self) -> Option<OperationKind> {
        match self {
            Self::Divide => Some(OperationKind::Divide),
            Self::Multiply => Some(OperationKind::Multiply),
            Self::Subtract => Some(OperationKind::Subtract),
            Self::Add => Some(OperationKind::Add),
            Self::AllClear
            | Self::ToggleSign
            | Self::Percent
            | Self::Equals
            | Self::Digit(_)
            | Self::DecimalPoint => None,
        }
    }

    /// Whether the key is drawn in its selected state while its operation is pending
    #[must_use]
    pub fn highlights_when_pending(&self) -> bool {
        self.to_operation().is_some()
    }

    /// Number of keypad columns this button occupies
    #[must_use]
    pub fn column_span(&self) -> u16 {
        match self {
            Self::Digit(d) if d.value() == 0 => 2,
            _ => 1,
        }
    }

    /// Map a keyboard character to a button
    ///
    /// Enter is not a character; surfaces map it to [`ButtonIdentity::Equals`]
    /// themselves.
    #[must_use]
    pub fn from_key(c: char) -> Option<Self> {
        if let Some(d) = Digit::from_char(c) {
            return Some(Self::Digit(d));
        }
        match c {
            '.' | ',' => Some(Self::DecimalPoint),
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | 'x' | 'X' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Percent),
            '=' => Some(Self::Equals),
            'c' | 'C' => Some(Self::AllClear),
            'n' | 'N' | '_' | '±' => Some(Self::ToggleSign),
            _ => None,
        }
    }
}

impl std::fmt::Display for ButtonIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Visual category of a button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonCategory {
    /// AC, +/-, %
    NeutralFunction,
    /// The four operators and equals
    Operator,
    /// Digits and the decimal point
    DigitOrPoint,
}

/// Static lookup over the keypad
pub struct ButtonCatalog;

impl ButtonCatalog {
    /// Number of keypad columns
    pub const COLUMNS: u16 = 4;

    /// Every button in keypad order (row-major)
    pub const ALL: [ButtonIdentity; 19] = [
        ButtonIdentity::AllClear,
        ButtonIdentity::ToggleSign,
        ButtonIdentity::Percent,
        ButtonIdentity::Divide,
        ButtonIdentity::Digit(Digit(7)),
        ButtonIdentity::Digit(Digit(8)),
        ButtonIdentity::Digit(Digit(9)),
        ButtonIdentity::Multiply,
        ButtonIdentity::Digit(Digit(4)),
        ButtonIdentity::Digit(Digit(5)),
        ButtonIdentity::Digit(Digit(6)),
        ButtonIdentity::Subtract,
        ButtonIdentity::Digit(Digit(1)),
        ButtonIdentity::Digit(Digit(2)),
        ButtonIdentity::Digit(Digit(3)),
        ButtonIdentity::Add,
        ButtonIdentity::Digit(Digit(0)),
        ButtonIdentity::DecimalPoint,
        ButtonIdentity::Equals,
    ];

    /// Buttons in keypad order
    #[must_use]
    pub fn buttons() -> &'static [ButtonIdentity] {
        &Self::ALL
    }

    /// Buttons grouped into keypad rows, each row filling [`Self::COLUMNS`]
    #[must_use]
    pub fn rows() -> Vec<Vec<ButtonIdentity>> {
        let mut rows = Vec::new();
        let mut current = Vec::new();
        let mut used = 0;

        for button in Self::ALL {
            current.push(button);
            used += button.column_span();
            if used >= Self::COLUMNS {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }
        }
        if !current.is_empty() {
            rows.push(current);
        }
        rows
    }

    /// Grid placement for every button as `(button, row, column, span)`
    #[must_use]
    pub fn placements() -> Vec<(ButtonIdentity, u16, u16, u16)> {
        let mut placements = Vec::with_capacity(Self::ALL.len());
        for (row, buttons) in (0u16..).zip(Self::rows()) {
            let mut column = 0;
            for button in buttons {
                let span = button.column_span();
                placements.push((button, row, column, span));
                column += span;
            }
        }
        placements
    }
}
