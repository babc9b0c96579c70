//! Named financial parameters that survive `clear()`.
use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of scalar parameters the formulas read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryKey {
    Wacc,
    TerminalGrowth,
    DiscountRate,
    Revenue,
    Ebitda,
    NetIncome,
    Shares,
    MarketCap,
    Enterprise,
    DebtEquityRatio,
    DebtEbitdaMultiple,
    InitialInvestment,
    CurrentCashFlow,
}

impl MemoryKey {
    pub const ALL: [MemoryKey; 13] = [
        MemoryKey::Wacc,
        MemoryKey::TerminalGrowth,
        MemoryKey::DiscountRate,
        MemoryKey::Revenue,
        MemoryKey::Ebitda,
        MemoryKey::NetIncome,
        MemoryKey::Shares,
        MemoryKey::MarketCap,
        MemoryKey::Enterprise,
        MemoryKey::DebtEquityRatio,
        MemoryKey::DebtEbitdaMultiple,
        MemoryKey::InitialInvestment,
        MemoryKey::CurrentCashFlow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MemoryKey::Wacc => "wacc",
            MemoryKey::TerminalGrowth => "terminalGrowth",
            MemoryKey::DiscountRate => "discountRate",
            MemoryKey::Revenue => "revenue",
            MemoryKey::Ebitda => "ebitda",
            MemoryKey::NetIncome => "netIncome",
            MemoryKey::Shares => "shares",
            MemoryKey::MarketCap => "marketCap",
            MemoryKey::Enterprise => "enterprise",
            MemoryKey::DebtEquityRatio => "debtEquityRatio",
            MemoryKey::DebtEbitdaMultiple => "debtEbitdaMultiple",
            MemoryKey::InitialInvestment => "initialInvestment",
            MemoryKey::CurrentCashFlow => "currentCashFlow",
        }
    }

    /// Label used in "Stored ..." history lines, e.g. `TERMINALGROWTH`.
    pub fn label(&self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for MemoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MemoryKey {
    type Err = CalcError;

    /// Case-insensitive; accepts the camelCase name or its snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_lowercase();
        MemoryKey::ALL
            .into_iter()
            .find(|key| key.name().to_lowercase() == wanted)
            .ok_or_else(|| CalcError::UnknownParameter(s.to_string()))
    }
}

/// Parameter values. Percent-style parameters (WACC, terminal growth,
/// discount rate) are held as percentages, e.g. `8.5` for 8.5%.
///
/// Values are only ever overwritten; the cash-flow series is append-only and
/// chronological, starting at period 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryParameters {
    pub wacc: f64,
    pub terminal_growth: f64,
    pub discount_rate: f64,
    pub revenue: f64,
    pub ebitda: f64,
    pub net_income: f64,
    pub shares: f64,
    pub market_cap: f64,
    pub enterprise: f64,
    pub debt_equity_ratio: f64,
    pub debt_ebitda_multiple: f64,
    pub initial_investment: f64,
    pub current_cash_flow: f64,
    pub cash_flows: Vec<f64>,
}

impl Default for MemoryParameters {
    fn default() -> Self {
        Self {
            wacc: 8.5,
            terminal_growth: 2.5,
            discount_rate: 10.0,
            revenue: 0.0,
            ebitda: 0.0,
            net_income: 0.0,
            shares: 0.0,
            market_cap: 0.0,
            enterprise: 0.0,
            debt_equity_ratio: 4.0,
            debt_ebitda_multiple: 6.0,
            initial_investment: 0.0,
            current_cash_flow: 0.0,
            cash_flows: Vec::new(),
        }
    }
}

impl MemoryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MemoryKey) -> f64 {
        *self.slot(key)
    }

    pub fn set(&mut self, key: MemoryKey, value: f64) {
        *self.slot_mut(key) = value;
    }

    /// `m-`: subtracts `value` from the stored parameter.
    pub fn subtract(&mut self, key: MemoryKey, value: f64) {
        *self.slot_mut(key) -= value;
    }

    /// Appends the next period's cash flow and returns its 1-based period.
    pub fn push_cash_flow(&mut self, value: f64) -> usize {
        self.current_cash_flow = value;
        self.cash_flows.push(value);
        self.cash_flows.len()
    }

    pub fn cash_flow_total(&self) -> f64 {
        self.cash_flows.iter().sum()
    }

    fn slot(&self, key: MemoryKey) -> &f64 {
        match key {
            MemoryKey::Wacc => &self.wacc,
            MemoryKey::TerminalGrowth => &self.terminal_growth,
            MemoryKey::DiscountRate => &self.discount_rate,
            MemoryKey::Revenue => &self.revenue,
            MemoryKey::Ebitda => &self.ebitda,
            MemoryKey::NetIncome => &self.net_income,
            MemoryKey::Shares => &self.shares,
            MemoryKey::MarketCap => &self.market_cap,
            MemoryKey::Enterprise => &self.enterprise,
            MemoryKey::DebtEquityRatio => &self.debt_equity_ratio,
            MemoryKey::DebtEbitdaMultiple => &self.debt_ebitda_multiple,
            MemoryKey::InitialInvestment => &self.initial_investment,
            MemoryKey::CurrentCashFlow => &self.current_cash_flow,
        }
    }

    fn slot_mut(&mut self, key: MemoryKey) -> &mut f64 {
        match key {
            MemoryKey::Wacc => &mut self.wacc,
            MemoryKey::TerminalGrowth => &mut self.terminal_growth,
            MemoryKey::DiscountRate => &mut self.discount_rate,
            MemoryKey::Revenue => &mut self.revenue,
            MemoryKey::Ebitda => &mut self.ebitda,
            MemoryKey::NetIncome => &mut self.net_income,
            MemoryKey::Shares => &mut self.shares,
            MemoryKey::MarketCap => &mut self.market_cap,
            MemoryKey::Enterprise => &mut self.enterprise,
            MemoryKey::DebtEquityRatio => &mut self.debt_equity_ratio,
            MemoryKey::DebtEbitdaMultiple => &mut self.debt_ebitda_multiple,
            MemoryKey::InitialInvestment => &mut self.initial_investment,
            MemoryKey::CurrentCashFlow => &mut self.current_cash_flow,
        }
    }
}
