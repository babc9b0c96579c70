//! Valuation formulas. All functions are pure; the calculator feeds them the
//! display value and memory parameters and records the outcome.
use crate::config::DcfAssumptions;
use crate::store::{MemoryKey, MemoryParameters};
use serde::{Deserialize, Serialize};

/// Rounds to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Enterprise value from a declining-growth DCF, rounded to whole units.
///
/// `wacc_pct` and `growth_pct` are percentages. Nothing guards
/// `wacc == growth`: the terminal value is then non-finite and so is the result.
pub fn dcf_enterprise_value(fcf: f64, wacc_pct: f64, growth_pct: f64, assumptions: &DcfAssumptions) -> f64 {
    let wacc = wacc_pct / 100.0;
    let terminal_growth = growth_pct / 100.0;
    let years = assumptions.projection_years as i32;
    let growth_at = |step: i32| {
        (assumptions.initial_growth - assumptions.growth_decline * step as f64).max(terminal_growth)
    };

    let explicit_pv: f64 = (1..=years)
        .map(|year| {
            let projected = fcf * (1.0 + growth_at(year - 1)).powi(year);
            projected / (1.0 + wacc).powi(year)
        })
        .sum();

    let terminal_fcf = fcf * (1.0 + growth_at(years)).powi(years) * (1.0 + terminal_growth);
    let terminal_value = terminal_fcf / (wacc - terminal_growth);
    let terminal_pv = terminal_value / (1.0 + wacc).powi(years);

    round_half_up(explicit_pv + terminal_pv)
}

/// Comparable-company multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultipleKind {
    EvEbitda,
    EvRevenue,
    EvSales,
    PriceEarnings,
    PriceBook,
}

impl MultipleKind {
    pub fn label(self) -> &'static str {
        match self {
            MultipleKind::EvEbitda => "EV/EBITDA",
            MultipleKind::EvRevenue => "EV/Revenue",
            MultipleKind::EvSales => "EV/Sales",
            MultipleKind::PriceEarnings => "P/E",
            MultipleKind::PriceBook => "P/B",
        }
    }

    /// Which stored parameter is the numerator.
    pub fn numerator_key(self) -> MemoryKey {
        match self {
            MultipleKind::EvEbitda | MultipleKind::EvRevenue | MultipleKind::EvSales => MemoryKey::Enterprise,
            MultipleKind::PriceEarnings | MultipleKind::PriceBook => MemoryKey::MarketCap,
        }
    }

    /// `numerator / denominator`, unguarded (a zero denominator gives infinity).
    pub fn evaluate(self, memory: &MemoryParameters, denominator: f64) -> f64 {
        memory.get(self.numerator_key()) / denominator
    }
}

/// Total LBO deal size for a given equity cheque: `equity × (1 + D/E)`.
pub fn lbo_size(equity: f64, debt_equity_ratio: f64) -> f64 {
    equity * (1.0 + debt_equity_ratio)
}

/// Maximum supportable debt: `EBITDA × debt/EBITDA multiple`.
pub fn debt_capacity(ebitda: f64, debt_ebitda_multiple: f64) -> f64 {
    ebitda * debt_ebitda_multiple
}

/// Net present value of `cash_flows` (periods 1..=n) at `rate`, less the
/// upfront investment. `rate` is a fraction, not a percentage.
pub fn npv(rate: f64, initial_investment: f64, cash_flows: &[f64]) -> f64 {
    let discounted: f64 = cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32 + 1))
        .sum();
    discounted - initial_investment
}

/// d(NPV)/d(rate), used by the IRR search.
pub fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| {
            let t = i as i32 + 1;
            -(t as f64) * cf / (1.0 + rate).powi(t + 1)
        })
        .sum()
}
