//! Arithmetic Operations
//!
//! The four binary operations a calculator can chain. Each carries its own
//! display symbol and numeric reducer.

use serde::{Deserialize, Serialize};

/// A binary arithmetic operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// a ÷ b
    Divide,
    /// a × b
    Multiply,
    /// a - b
    Subtract,
    /// a + b
    Add,
}

impl OperationKind {
    /// Symbol shown on the key and in the expression line
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Divide => "÷",
            Self::Multiply => "x",
            Self::Subtract => "-",
            Self::Add => "+",
        }
    }

    /// Apply the operation to `(a, b)`
    ///
    /// Raw IEEE arithmetic: dividing by zero yields an infinity or NaN. The
    /// engine is responsible for turning non-finite results into its error
    /// state.
    #[must_use]
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Divide => a / b,
            Self::Multiply => a * b,
            Self::Subtract => a - b,
            Self::Add => a + b,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducers() {
        assert_eq!(OperationKind::Add.apply(7.0, 3.0), 10.0);
        assert_eq!(OperationKind::Subtract.apply(7.0, 3.0), 4.0);
        assert_eq!(OperationKind::Multiply.apply(7.0, 3.0), 21.0);
        assert_eq!(OperationKind::Divide.apply(7.0, 2.0), 3.5);
    }

    #[test]
    fn test_divide_by_zero_is_not_finite() {
        assert!(!OperationKind::Divide.apply(8.0, 0.0).is_finite());
        assert!(OperationKind::Divide.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(OperationKind::Divide.to_string(), "÷");
        assert_eq!(OperationKind::Multiply.to_string(), "x");
    }
}
