use crate::compute::{Constant, MultipleKind, UnaryFn};
use crate::config::EngineConfig;
use crate::error::CalcError;
use crate::fx::RateTable;
use crate::store::{MemoryKey, Operator};
use crate::Calculator;
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(e: CalcError) -> PyErr {
    match e {
        CalcError::Io(_) => PyIOError::new_err(e.to_string()),
        CalcError::SolverDidNotConverge(_) => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn parse_multiple(name: &str) -> PyResult<MultipleKind> {
    match name.to_lowercase().as_str() {
        "ev/ebitda" | "ev_ebitda" => Ok(MultipleKind::EvEbitda),
        "ev/revenue" | "ev_revenue" => Ok(MultipleKind::EvRevenue),
        "ev/sales" | "ev_sales" => Ok(MultipleKind::EvSales),
        "p/e" | "pe" => Ok(MultipleKind::PriceEarnings),
        "p/b" | "pb" => Ok(MultipleKind::PriceBook),
        _ => Err(PyValueError::new_err(format!("Unknown multiple '{}'", name))),
    }
}

#[pyclass(name = "Calculator")]
#[derive(Debug, Default)]
pub struct PyCalculator {
    inner: Calculator,
}

#[pymethods]
impl PyCalculator {
    #[new]
    #[pyo3(signature = (config_json=None))]
    pub fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(json).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };
        Ok(Self { inner: Calculator::with_config(config).map_err(to_py_err)? })
    }

    pub fn input_digit(&mut self, digit: u8) -> PyResult<()> {
        self.inner.input_digit(digit).map_err(to_py_err)
    }

    pub fn input_decimal_point(&mut self) {
        self.inner.input_decimal_point();
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn backspace(&mut self) {
        self.inner.backspace();
    }

    pub fn set_operator(&mut self, op: &str) -> PyResult<()> {
        let op: Operator = op.parse().map_err(to_py_err)?;
        self.inner.set_operator(op);
        Ok(())
    }

    pub fn equals(&mut self) {
        self.inner.equals();
    }

    /// `name` is a function name such as `"sqrt"`, `"ln"` or `"factorial"`.
    pub fn apply_function(&mut self, name: &str) -> PyResult<()> {
        let func: UnaryFn = name.parse().map_err(to_py_err)?;
        self.inner.apply_unary(func);
        Ok(())
    }

    pub fn insert_constant(&mut self, symbol: &str) -> PyResult<()> {
        let constant = match symbol {
            "e" => Constant::E,
            "pi" | "π" => Constant::Pi,
            other => return Err(PyValueError::new_err(format!("Unknown constant '{}'", other))),
        };
        self.inner.insert_constant(constant);
        Ok(())
    }

    pub fn store_memory(&mut self, name: &str) -> PyResult<()> {
        let key: MemoryKey = name.parse().map_err(to_py_err)?;
        self.inner.store_memory(key);
        Ok(())
    }

    pub fn recall_memory(&mut self, name: &str) -> PyResult<f64> {
        let key: MemoryKey = name.parse().map_err(to_py_err)?;
        Ok(self.inner.recall_memory(key))
    }

    pub fn add_cash_flow(&mut self) -> usize {
        self.inner.add_cash_flow()
    }

    pub fn dcf_valuation(&mut self) -> f64 {
        self.inner.dcf_valuation()
    }

    pub fn comps_multiple(&mut self, kind: &str) -> PyResult<f64> {
        Ok(self.inner.comps_multiple(parse_multiple(kind)?))
    }

    pub fn lbo_size(&mut self) -> f64 {
        self.inner.lbo_size()
    }

    pub fn debt_capacity(&mut self) -> f64 {
        self.inner.debt_capacity()
    }

    pub fn npv(&mut self) -> f64 {
        self.inner.npv()
    }

    pub fn irr(&mut self) -> PyResult<f64> {
        self.inner.irr().map_err(to_py_err)
    }

    /// Returns `None` when the display amount is zero or not a number.
    pub fn convert(&mut self, from_code: &str, to_code: &str) -> PyResult<Option<f64>> {
        self.inner.convert(from_code, to_code).map_err(to_py_err)
    }

    /// Accepts the refresh payload, `{"rates": {...}}` or a bare map.
    pub fn set_rates_json(&self, json: &str) -> PyResult<()> {
        let table = RateTable::from_json(json).map_err(to_py_err)?;
        self.inner.set_rates(table).map_err(to_py_err)
    }

    #[getter]
    pub fn display(&self) -> String {
        self.inner.display().to_string()
    }

    #[getter]
    pub fn formatted_display(&self) -> String {
        self.inner.formatted_display()
    }

    #[getter]
    pub fn status_line(&self) -> Option<String> {
        self.inner.status_line()
    }

    #[getter]
    pub fn history(&self) -> Vec<String> {
        self.inner.history_lines()
    }

    pub fn snapshot_json(&self) -> PyResult<String> {
        self.inner.snapshot().to_json().map_err(to_py_err)
    }
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCalculator>()?;
    Ok(())
}
