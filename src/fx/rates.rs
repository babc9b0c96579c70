//! Exchange-rate tables and the refresh boundary.
use crate::error::{CalcError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

pub const BASE_CURRENCY: &str = "USD";

const BUILTIN_RATES: [(&str, f64); 10] = [
    ("USD", 1.0),
    ("EUR", 0.9150),
    ("JPY", 142.30),
    ("GBP", 0.7820),
    ("CHF", 0.8850),
    ("CAD", 1.3720),
    ("CNY", 7.2800),
    ("PLN", 4.0500),
    ("AUD", 1.4950),
    ("SEK", 10.8500),
];

/// Display name for the built-in codes; unknown codes echo back.
pub fn currency_name(code: &str) -> &str {
    match code {
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "JPY" => "Japanese Yen",
        "GBP" => "British Pound",
        "CHF" => "Swiss Franc",
        "CAD" => "Canadian Dollar",
        "CNY" => "Chinese Yuan",
        "PLN" => "Polish Zloty",
        "AUD" => "Australian Dollar",
        "SEK" => "Swedish Krona",
        other => other,
    }
}

/// Units of each currency per 1 USD. USD is always exactly 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl From<BTreeMap<String, f64>> for RateTable {
    fn from(mut rates: BTreeMap<String, f64>) -> Self {
        rates.insert(BASE_CURRENCY.to_string(), 1.0);
        Self { rates }
    }
}

impl From<RateTable> for BTreeMap<String, f64> {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

impl Default for RateTable {
    fn default() -> Self {
        BUILTIN_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

/// Payload shape of a rate feed: `{"rates": {...}}`.
#[derive(Deserialize)]
struct RateFeed {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Builds a validated table. The base currency is forced to 1.0.
    pub fn new(rates: impl IntoIterator<Item = (String, f64)>) -> Result<Self> {
        let table: Self = rates.into_iter().collect::<BTreeMap<_, _>>().into();
        table.validate()?;
        Ok(table)
    }

    /// Accepts either a feed payload `{"rates": {...}}` or a bare code map.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let rates = if value.get("rates").is_some() {
            serde_json::from_value::<RateFeed>(value)?.rates
        } else {
            serde_json::from_value::<BTreeMap<String, f64>>(value)?
        };
        Self::new(rates)
    }

    pub fn validate(&self) -> Result<()> {
        match self.rates.iter().find(|(_, rate)| !(rate.is_finite() && **rate > 0.0)) {
            Some((code, rate)) => Err(CalcError::InvalidRate { code: code.clone(), rate: *rate }),
            None => Ok(()),
        }
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Holds the current rate snapshot for one calculator.
///
/// A refresh collaborator calls [`RateBook::begin_refresh`] and later
/// [`RateBook::complete_refresh`]; conversions call [`RateBook::snapshot`]
/// and keep using that snapshot even if a refresh lands mid-call.
#[derive(Debug)]
pub struct RateBook {
    current: RwLock<Arc<RateTable>>,
    loading: AtomicBool,
    last_updated: RwLock<Option<DateTime<Utc>>>,
}

impl Default for RateBook {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}

impl RateBook {
    pub fn new(table: RateTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            loading: AtomicBool::new(false),
            last_updated: RwLock::new(None),
        }
    }

    pub fn snapshot(&self) -> Arc<RateTable> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replaces the table wholesale.
    pub fn replace(&self, table: RateTable) {
        let table = Arc::new(table);
        match self.current.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
        let now = Utc::now();
        match self.last_updated.write() {
            Ok(mut guard) => *guard = Some(now),
            Err(poisoned) => *poisoned.into_inner() = Some(now),
        }
    }

    pub fn begin_refresh(&self) {
        self.loading.store(true, Ordering::Release);
    }

    /// Finishes a refresh. A failed fetch or an invalid table leaves the
    /// previous table in place; either way the loading flag clears.
    pub fn complete_refresh<E: std::fmt::Display>(&self, outcome: std::result::Result<RateTable, E>) {
        match outcome {
            Ok(table) => match table.validate() {
                Ok(()) => {
                    debug!(currencies = table.len(), "exchange rates refreshed");
                    self.replace(table);
                }
                Err(e) => warn!(error = %e, "rejected refreshed exchange rates"),
            },
            Err(e) => warn!(error = %e, "exchange rate refresh failed"),
        }
        self.loading.store(false, Ordering::Release);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self.last_updated.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = RateTable::default();
        assert_eq!(table.len(), 10);
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("JPY"), Some(142.30));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_base_currency_is_forced() {
        let table = RateTable::new(vec![("USD".to_string(), 3.0), ("EUR".to_string(), 0.9)]).unwrap();
        assert_eq!(table.rate("USD"), Some(1.0));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = RateTable::new(vec![("EUR".to_string(), bad)]);
            assert!(matches!(result, Err(CalcError::InvalidRate { .. })), "rate {}", bad);
        }
    }

    #[test]
    fn test_from_json_accepts_both_shapes() {
        let feed = RateTable::from_json(r#"{"rates": {"EUR": 0.9234, "GBP": 0.79}}"#).unwrap();
        assert_eq!(feed.rate("EUR"), Some(0.9234));
        assert_eq!(feed.rate("USD"), Some(1.0));

        let bare = RateTable::from_json(r#"{"EUR": 0.9234}"#).unwrap();
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn test_currency_names() {
        assert_eq!(currency_name("PLN"), "Polish Zloty");
        assert_eq!(currency_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_refresh_replaces_table() {
        let book = RateBook::default();
        assert!(book.last_updated().is_none());
        book.begin_refresh();
        assert!(book.is_loading());

        let fresh = RateTable::new(vec![("EUR".to_string(), 0.5)]).unwrap();
        book.complete_refresh::<String>(Ok(fresh));
        assert!(!book.is_loading());
        assert_eq!(book.snapshot().rate("EUR"), Some(0.5));
        assert!(book.last_updated().is_some());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_table() {
        let book = RateBook::default();
        book.begin_refresh();
        book.complete_refresh::<&str>(Err("network down"));
        assert!(!book.is_loading());
        assert_eq!(book.snapshot().rate("EUR"), Some(0.9150));
        assert!(book.last_updated().is_none());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let book = RateBook::default();
        let before = book.snapshot();
        book.replace(RateTable::new(vec![("EUR".to_string(), 2.0)]).unwrap());
        assert_eq!(before.rate("EUR"), Some(0.9150));
        assert_eq!(book.snapshot().rate("EUR"), Some(2.0));
    }
}
