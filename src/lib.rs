//! Core of an investment-banking calculator: a left-to-right accumulator,
//! named valuation parameters, finance formulas, currency conversion and a
//! bounded history log.
//!
//! [`Calculator`] is the entry point for a presentation layer. The pieces it
//! is built from (the pure [`reduce`] function, the formulas, the rate book)
//! are public for callers that want them directly.
//!
//! ```
//! use ib_calc_core::{Calculator, Operator};
//!
//! let mut calc = Calculator::new();
//! calc.input_digit(3).unwrap();
//! calc.set_operator(Operator::Add);
//! calc.input_digit(4).unwrap();
//! calc.set_operator(Operator::Multiply);
//! calc.input_digit(2).unwrap();
//! calc.equals();
//! assert_eq!(calc.display(), "14");
//! ```

pub mod analysis;
pub mod calculator;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod fx;
pub mod solver;
pub mod store;

#[cfg(feature = "python")]
mod bindings;

pub use calculator::{Calculator, Snapshot};
pub use compute::{reduce, Command, Constant, MultipleKind, Step, UnaryFn};
pub use config::{DcfAssumptions, EngineConfig};
pub use error::{CalcError, Result};
pub use fx::{RateBook, RateTable};
pub use store::{CalculatorState, HistoryLog, HistoryRecord, MemoryKey, MemoryParameters, Operator};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `_core` Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::register(m)
}
