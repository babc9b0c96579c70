//! The accumulator as a pure state-transition function.
//!
//! `reduce` never mutates its input and never touches memory or history; it
//! returns the next state plus the history record the transition produced, if
//! any. The [`Calculator`](crate::Calculator) facade applies steps in order.
use crate::compute::kernel::{apply_binary, Constant, UnaryFn};
use crate::display::format::{number_to_string, parse_numeral};
use crate::store::{CalculatorState, HistoryRecord, Operator};
use serde::{Deserialize, Serialize};

/// One discrete input to the accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 0-9. Larger values leave the state untouched.
    Digit(u8),
    DecimalPoint,
    Clear,
    Backspace,
    Operator(Operator),
    Equals,
    Unary(UnaryFn),
    Constant(Constant),
    /// Writes an already computed numeral and waits for a fresh operand.
    Present(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: CalculatorState,
    pub record: Option<HistoryRecord>,
}

impl Step {
    fn silent(state: CalculatorState) -> Self {
        Self { state, record: None }
    }
}

pub fn reduce(state: &CalculatorState, command: &Command) -> Step {
    let mut next = state.clone();
    match command {
        Command::Digit(d) if *d <= 9 => {
            let digit = d.to_string();
            if next.awaiting_fresh_operand {
                next.display = digit;
                next.awaiting_fresh_operand = false;
            } else if next.display == "0" {
                next.display = digit;
            } else {
                next.display.push_str(&digit);
            }
            Step::silent(next)
        }
        Command::Digit(_) => Step::silent(next),

        Command::DecimalPoint => {
            if next.awaiting_fresh_operand {
                next.display = "0.".to_string();
                next.awaiting_fresh_operand = false;
            } else if !next.display.contains('.') {
                next.display.push('.');
            }
            Step::silent(next)
        }

        Command::Clear => Step::silent(CalculatorState::default()),

        Command::Backspace => {
            next.display = backspace(&next.display);
            Step::silent(next)
        }

        Command::Operator(op) => {
            let input = parse_numeral(&next.display);
            let mut record = None;
            match (next.previous_value, next.pending_operator) {
                (None, _) => next.previous_value = Some(input),
                (Some(lhs), Some(pending)) => {
                    let result = apply_binary(pending, lhs, input);
                    record = Some(HistoryRecord::Binary { lhs, op: pending, rhs: input, result });
                    next.display = number_to_string(result);
                    next.previous_value = Some(result);
                }
                (Some(_), None) => {}
            }
            next.pending_operator = Some(*op);
            next.awaiting_fresh_operand = true;
            Step { state: next, record }
        }

        Command::Equals => {
            let (Some(lhs), Some(pending)) = (next.previous_value, next.pending_operator) else {
                return Step::silent(next);
            };
            let rhs = parse_numeral(&next.display);
            let result = apply_binary(pending, lhs, rhs);
            next.display = number_to_string(result);
            next.previous_value = None;
            next.pending_operator = None;
            next.awaiting_fresh_operand = true;
            Step {
                state: next,
                record: Some(HistoryRecord::Binary { lhs, op: pending, rhs, result }),
            }
        }

        Command::Unary(func) => {
            let operand = parse_numeral(&next.display);
            let result = func.apply(operand);
            next.display = number_to_string(result);
            next.awaiting_fresh_operand = true;
            let record = func
                .is_logged()
                .then_some(HistoryRecord::Unary { func: *func, operand, result });
            Step { state: next, record }
        }

        Command::Constant(constant) => {
            next.display = number_to_string(constant.value());
            next.awaiting_fresh_operand = true;
            Step { state: next, record: Some(HistoryRecord::Constant { constant: *constant }) }
        }

        Command::Present(text) => {
            next.display = text.clone();
            next.awaiting_fresh_operand = true;
            Step::silent(next)
        }
    }
}

/// Drops the last character. Rendered results that are not plain numerals
/// (`NaN`, `Infinity`, exponent form) are cleared whole.
fn backspace(display: &str) -> String {
    let plain = display
        .char_indices()
        .all(|(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'));
    if !plain {
        return "0".to_string();
    }
    let mut trimmed = display.to_string();
    trimmed.pop();
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed
    }
}
