//! Calculator state, named memory parameters and the history log.
pub mod history;
pub mod memory;
pub mod types;

pub use history::{HistoryLog, HistoryRecord};
pub use memory::{MemoryKey, MemoryParameters};
pub use types::{CalculatorState, Operator};
