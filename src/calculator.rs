//! The stateful calculator a presentation layer drives.
//!
//! Keystrokes go through the pure [`reduce`] function; memory, formulas and
//! conversions read the parsed display, write their result back through
//! [`Command::Present`] and append one history record each.
use crate::analysis::{sensitivity_grid, SensitivityGrid};
use crate::compute::formulas::{self, MultipleKind};
use crate::compute::{reduce, Command, Constant, Step, UnaryFn};
use crate::config::{DcfAssumptions, EngineConfig};
use crate::display::format::{format_display, format_scaled, number_to_string, parse_numeral, to_fixed};
use crate::error::{CalcError, Result};
use crate::fx::{self, RateBook, RateTable};
use crate::solver::solve_irr;
use crate::store::{CalculatorState, HistoryLog, HistoryRecord, MemoryKey, MemoryParameters, Operator};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Calculator {
    state: CalculatorState,
    memory: MemoryParameters,
    history: HistoryLog,
    rates: Arc<RateBook>,
    dcf: DcfAssumptions,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::from_parts(EngineConfig::default(), Arc::new(RateBook::default()))
    }

    /// Builds a calculator from a config, rejecting it if it fails
    /// [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rates = Arc::new(RateBook::new(config.rates.clone()));
        Ok(Self::from_parts(config, rates))
    }

    /// Shares an existing rate book, e.g. one a refresh task also holds.
    /// The config's own rate table is ignored, but it must still validate.
    pub fn with_rate_book(config: EngineConfig, rates: Arc<RateBook>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, rates))
    }

    fn from_parts(config: EngineConfig, rates: Arc<RateBook>) -> Self {
        Self {
            state: CalculatorState::default(),
            memory: config.memory,
            history: HistoryLog::with_capacity(config.history_capacity),
            rates,
            dcf: config.dcf,
        }
    }

    // ---- keystrokes ----

    pub fn input_digit(&mut self, digit: u8) -> Result<()> {
        if digit > 9 {
            return Err(CalcError::InvalidDigit(digit));
        }
        self.dispatch(Command::Digit(digit));
        Ok(())
    }

    pub fn input_decimal_point(&mut self) {
        self.dispatch(Command::DecimalPoint);
    }

    /// Resets the accumulator. Memory and history are kept.
    pub fn clear(&mut self) {
        self.dispatch(Command::Clear);
    }

    pub fn backspace(&mut self) {
        self.dispatch(Command::Backspace);
    }

    pub fn set_operator(&mut self, op: Operator) {
        self.dispatch(Command::Operator(op));
    }

    pub fn equals(&mut self) {
        self.dispatch(Command::Equals);
    }

    pub fn apply_unary(&mut self, func: UnaryFn) {
        self.dispatch(Command::Unary(func));
    }

    pub fn insert_constant(&mut self, constant: Constant) {
        self.dispatch(Command::Constant(constant));
    }

    /// Applies one command and records its history entry, if any.
    pub fn dispatch(&mut self, command: Command) {
        let Step { state, record } = reduce(&self.state, &command);
        self.state = state;
        if let Some(record) = record {
            debug!(entry = %record, display = %self.state.display, "operation completed");
            self.history.push(record);
        }
    }

    // ---- memory ----

    pub fn store_memory(&mut self, key: MemoryKey) {
        let value = self.current_value();
        self.memory.set(key, value);
        debug!(key = key.name(), value, "memory stored");
        self.history.push(HistoryRecord::Stored { key, value });
    }

    /// Writes the parameter to the display without logging.
    pub fn recall_memory(&mut self, key: MemoryKey) -> f64 {
        let value = self.memory.get(key);
        self.present(value);
        value
    }

    pub fn memory_subtract(&mut self, key: MemoryKey) {
        let value = self.current_value();
        self.memory.subtract(key, value);
        debug!(key = key.name(), value, "memory subtracted");
        self.history.push(HistoryRecord::MemorySubtract { key, value });
    }

    pub fn memory_clear(&mut self, key: MemoryKey) {
        self.memory.set(key, 0.0);
    }

    /// Appends the display to the cash-flow series and returns its period.
    pub fn add_cash_flow(&mut self) -> usize {
        let value = self.current_value();
        let period = self.memory.push_cash_flow(value);
        debug!(period, value, "cash flow added");
        self.history.push(HistoryRecord::CashFlow { period, value });
        let shown = self.state.display.clone();
        self.dispatch(Command::Present(shown));
        period
    }

    // ---- valuation ----

    /// DCF enterprise value of the display as this year's free cash flow.
    pub fn dcf_valuation(&mut self) -> f64 {
        let fcf = self.current_value();
        let (wacc_pct, growth_pct) = (self.memory.wacc, self.memory.terminal_growth);
        let value = formulas::dcf_enterprise_value(fcf, wacc_pct, growth_pct, &self.dcf);
        debug!(fcf, wacc_pct, growth_pct, value, "dcf valuation");
        self.present(value);
        self.history.push(HistoryRecord::Dcf { fcf, wacc_pct, growth_pct, value });
        value
    }

    /// Comparable multiple with the display as denominator. The display
    /// shows two decimals.
    pub fn comps_multiple(&mut self, kind: MultipleKind) -> f64 {
        let denominator = self.current_value();
        let numerator = self.memory.get(kind.numerator_key());
        let result = kind.evaluate(&self.memory, denominator);
        debug!(multiple = kind.label(), numerator, denominator, result, "comps multiple");
        self.dispatch(Command::Present(to_fixed(result, 2)));
        self.history.push(HistoryRecord::Multiple { kind, numerator, denominator, result });
        result
    }

    /// Total deal size for the equity cheque on the display.
    pub fn lbo_size(&mut self) -> f64 {
        let equity = self.current_value();
        let ratio = self.memory.debt_equity_ratio;
        let total = formulas::lbo_size(equity, ratio);
        debug!(equity, ratio, total, "lbo size");
        self.present(total);
        self.history.push(HistoryRecord::LboSize { equity, ratio, total });
        total
    }

    /// Supportable debt for the EBITDA on the display.
    pub fn debt_capacity(&mut self) -> f64 {
        let ebitda = self.current_value();
        let multiple = self.memory.debt_ebitda_multiple;
        let debt = formulas::debt_capacity(ebitda, multiple);
        debug!(ebitda, multiple, debt, "debt capacity");
        self.present(debt);
        self.history.push(HistoryRecord::DebtCapacity { ebitda, multiple, debt });
        debt
    }

    /// NPV of the stored cash-flow series at the stored discount rate.
    pub fn npv(&mut self) -> f64 {
        let rate_pct = self.memory.discount_rate;
        let value = formulas::npv(rate_pct / 100.0, self.memory.initial_investment, &self.memory.cash_flows);
        let periods = self.memory.cash_flows.len();
        debug!(rate_pct, periods, value, "npv");
        self.present(value);
        self.history.push(HistoryRecord::Npv { rate_pct, periods, value });
        value
    }

    /// IRR of the stored series, shown as a percentage. On failure nothing
    /// changes.
    pub fn irr(&mut self) -> Result<f64> {
        let solution = solve_irr(self.memory.initial_investment, &self.memory.cash_flows)?;
        let rate_pct = solution.rate * 100.0;
        debug!(rate_pct, iterations = solution.iterations, "irr");
        self.present(rate_pct);
        self.history.push(HistoryRecord::Irr { rate_pct });
        Ok(rate_pct)
    }

    /// DCF values around the stored WACC and terminal growth, for the
    /// display as free cash flow. Read-only.
    pub fn dcf_sensitivity(&self, wacc_pct: &[f64], growth_pct: &[f64]) -> SensitivityGrid {
        sensitivity_grid(self.current_value(), wacc_pct, growth_pct, &self.dcf)
    }

    // ---- currency ----

    /// Converts the display amount. A zero or unparseable amount is a silent
    /// no-op (`Ok(None)`); an unknown code is an error and also changes
    /// nothing.
    pub fn convert(&mut self, from: &str, to: &str) -> Result<Option<f64>> {
        let amount = self.current_value();
        if amount.is_nan() || amount == 0.0 {
            return Ok(None);
        }
        let table = self.rates.snapshot();
        let converted = fx::convert(&table, from, to, amount)?;
        let text = fx::format_converted(converted);
        debug!(from, to, amount, converted, "currency converted");
        self.dispatch(Command::Present(text.clone()));
        self.history.push(HistoryRecord::Conversion {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            converted: text,
        });
        Ok(Some(converted))
    }

    /// Replaces the rate table now. Invalid tables are rejected unchanged.
    pub fn set_rates(&self, table: RateTable) -> Result<()> {
        table.validate()?;
        self.rates.replace(table);
        Ok(())
    }

    pub fn rate_book(&self) -> Arc<RateBook> {
        Arc::clone(&self.rates)
    }

    // ---- read accessors ----

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn formatted_display(&self) -> String {
        format_display(&self.state.display)
    }

    /// `"{left} {op}"` while an operation is pending.
    pub fn status_line(&self) -> Option<String> {
        match (self.state.previous_value, self.state.pending_operator) {
            (Some(lhs), Some(op)) => Some(format!("{} {}", format_scaled(lhs), op)),
            _ => None,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn memory(&self) -> &MemoryParameters {
        &self.memory
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_lines(&self) -> Vec<String> {
        self.history.lines()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.state.display.clone(),
            formatted_display: self.formatted_display(),
            status: self.status_line(),
            history: self.history_lines(),
            memory: self.memory.clone(),
            rates_loading: self.rates.is_loading(),
            rates_updated: self.rates.last_updated(),
        }
    }

    fn current_value(&self) -> f64 {
        parse_numeral(&self.state.display)
    }

    fn present(&mut self, value: f64) {
        self.dispatch(Command::Present(number_to_string(value)));
    }
}

/// Read-only view for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub display: String,
    pub formatted_display: String,
    pub status: Option<String>,
    /// Newest first.
    pub history: Vec<String>,
    pub memory: MemoryParameters,
    pub rates_loading: bool,
    pub rates_updated: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
