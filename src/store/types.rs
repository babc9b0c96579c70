use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary operators of the accumulator. Evaluation is strictly left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Remainder,
        Operator::Power,
    ];

    /// The key-cap symbol, also used in history text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Remainder => "%",
            Operator::Power => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "×" | "*" | "x" => Ok(Operator::Multiply),
            "÷" | "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Remainder),
            "^" => Ok(Operator::Power),
            other => Err(CalcError::UnknownOperator(other.to_string())),
        }
    }
}

/// The accumulator record. Owned by the engine; read by the presentation layer.
///
/// `display` is always a numeral with at most one `.`, or a rendered result
/// such as `NaN`/`Infinity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    pub display: String,
    pub previous_value: Option<f64>,
    pub pending_operator: Option<Operator>,
    pub awaiting_fresh_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            previous_value: None,
            pending_operator: None,
            awaiting_fresh_operand: false,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a binary operation is primed and waiting for its right operand.
    pub fn has_pending(&self) -> bool {
        self.previous_value.is_some() && self.pending_operator.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+", Operator::Add)]
    #[case("×", Operator::Multiply)]
    #[case("*", Operator::Multiply)]
    #[case("/", Operator::Divide)]
    #[case(" ^ ", Operator::Power)]
    fn test_operator_parsing(#[case] input: &str, #[case] expected: Operator) {
        assert_eq!(input.parse::<Operator>().unwrap(), expected);
    }

    #[test]
    fn test_operator_symbols_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
        }
        assert!(matches!("&".parse::<Operator>(), Err(CalcError::UnknownOperator(_))));
    }

    #[test]
    fn test_initial_state() {
        let state = CalculatorState::new();
        assert_eq!(state.display, "0");
        assert!(!state.has_pending());
        assert!(!state.awaiting_fresh_operand);
    }
}
