//! Arithmetic and valuation: the accumulator reducer, scalar kernels and
//! the finance formulas.
pub mod engine;
pub mod formulas;
pub mod kernel;

pub use engine::{reduce, Command, Step};
pub use formulas::MultipleKind;
pub use kernel::{apply_binary, Constant, UnaryFn};
