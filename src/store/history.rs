//! Bounded, newest-first log of completed calculations.
//!
//! Entries are structured records captured at the moment an operation
//! completes. Text is produced on read, so the log never re-derives anything
//! from calculator state.
use crate::compute::formulas::MultipleKind;
use crate::compute::kernel::{Constant, UnaryFn};
use crate::display::format::{format_scaled, number_to_string, to_fixed};
use crate::store::{MemoryKey, Operator};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum HistoryRecord {
    Binary { lhs: f64, op: Operator, rhs: f64, result: f64 },
    Unary { func: UnaryFn, operand: f64, result: f64 },
    Constant { constant: Constant },
    Stored { key: MemoryKey, value: f64 },
    MemorySubtract { key: MemoryKey, value: f64 },
    CashFlow { period: usize, value: f64 },
    Dcf { fcf: f64, wacc_pct: f64, growth_pct: f64, value: f64 },
    Multiple { kind: MultipleKind, numerator: f64, denominator: f64, result: f64 },
    LboSize { equity: f64, ratio: f64, total: f64 },
    DebtCapacity { ebitda: f64, multiple: f64, debt: f64 },
    Npv { rate_pct: f64, periods: usize, value: f64 },
    Irr { rate_pct: f64 },
    Conversion { amount: f64, from: String, to: String, converted: String },
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRecord::Binary { lhs, op, rhs, result } => write!(
                f,
                "{} {} {} = {}",
                format_scaled(*lhs),
                op,
                format_scaled(*rhs),
                format_scaled(*result)
            ),
            HistoryRecord::Unary { func, operand, result } => {
                f.write_str(&func.describe(*operand, *result).unwrap_or_default())
            }
            HistoryRecord::Constant { constant } => {
                write!(f, "{} = {}", constant.symbol(), to_fixed(constant.value(), 6))
            }
            HistoryRecord::Stored { key, value } => {
                write!(f, "Stored {}: {}", key.label(), format_scaled(*value))
            }
            HistoryRecord::MemorySubtract { value, .. } => write!(f, "M- {}", format_scaled(*value)),
            HistoryRecord::CashFlow { period, value } => {
                write!(f, "CF Y{}: {}", period, format_scaled(*value))
            }
            HistoryRecord::Dcf { fcf, wacc_pct, growth_pct, value } => write!(
                f,
                "DCF: FCF={}, WACC={}%, TG={}% = {}",
                format_scaled(*fcf),
                number_to_string(*wacc_pct),
                number_to_string(*growth_pct),
                format_scaled(*value)
            ),
            HistoryRecord::Multiple { kind, numerator, denominator, result } => write!(
                f,
                "{}: {} / {} = {}x",
                kind.label(),
                format_scaled(*numerator),
                format_scaled(*denominator),
                to_fixed(*result, 1)
            ),
            HistoryRecord::LboSize { equity, ratio, total } => write!(
                f,
                "LBO: Equity={}, D/E={}x = {}",
                format_scaled(*equity),
                number_to_string(*ratio),
                format_scaled(*total)
            ),
            HistoryRecord::DebtCapacity { ebitda, multiple, debt } => write!(
                f,
                "Debt Cap: EBITDA={} × {}x = {}",
                format_scaled(*ebitda),
                number_to_string(*multiple),
                format_scaled(*debt)
            ),
            HistoryRecord::Npv { rate_pct, periods, value } => write!(
                f,
                "NPV @ {}% ({}y) = {}",
                number_to_string(*rate_pct),
                periods,
                format_scaled(*value)
            ),
            HistoryRecord::Irr { rate_pct } => write!(f, "IRR = {}%", to_fixed(*rate_pct, 2)),
            HistoryRecord::Conversion { amount, from, to, converted } => {
                write!(f, "{} {} = {} {}", to_fixed(*amount, 2), from, converted, to)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryRecord>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log keeping at most `capacity` entries. A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Prepends `record`, dropping the oldest entry once the cap is exceeded.
    pub fn push(&mut self, record: HistoryRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.entries.front()
    }

    /// Newest first.
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.entries.iter()
    }

    /// Rendered entries, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.to_string()).collect()
    }
}
