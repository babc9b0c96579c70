use super::rates::RateTable;
use crate::display::format::to_fixed;
use crate::error::{CalcError, Result};

/// Converts `amount` from one currency to another, routing through USD:
/// `(amount / rate[from]) * rate[to]`.
pub fn convert(table: &RateTable, from: &str, to: &str, amount: f64) -> Result<f64> {
    let from_rate = table.rate(from).ok_or_else(|| CalcError::UnknownCurrency(from.to_string()))?;
    let to_rate = table.rate(to).ok_or_else(|| CalcError::UnknownCurrency(to.to_string()))?;
    Ok(amount / from_rate * to_rate)
}

/// Display text for a converted amount: 6 decimals below 0.01 in magnitude,
/// 4 otherwise.
pub fn format_converted(value: f64) -> String {
    if value.abs() < 0.01 {
        to_fixed(value, 6)
    } else {
        to_fixed(value, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("USD", "EUR", 100.0, 91.5)]
    #[case("EUR", "USD", 91.5, 100.0)]
    #[case("USD", "USD", 42.0, 42.0)]
    #[case("EUR", "JPY", 0.915, 142.3)]
    fn test_convert(#[case] from: &str, #[case] to: &str, #[case] amount: f64, #[case] expected: f64) {
        let table = RateTable::default();
        let got = convert(&table, from, to, amount).unwrap();
        assert!((got - expected).abs() <= 1e-9 * expected.abs(), "{} != {}", got, expected);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let table = RateTable::default();
        let codes: Vec<&str> = table.codes().collect();
        for a in &codes {
            for b in &codes {
                let x = 1234.5678;
                let there = convert(&table, b, a, x).unwrap();
                let back = convert(&table, a, b, there).unwrap();
                assert!((back - x).abs() <= 1e-9 * x, "{} -> {} -> {}", b, a, b);
            }
        }
    }

    #[test]
    fn test_unknown_code() {
        let table = RateTable::default();
        assert!(matches!(convert(&table, "USD", "XYZ", 1.0), Err(CalcError::UnknownCurrency(c)) if c == "XYZ"));
        assert!(matches!(convert(&table, "ABC", "USD", 1.0), Err(CalcError::UnknownCurrency(c)) if c == "ABC"));
    }

    #[rstest]
    #[case(91.5, "91.5000")]
    #[case(0.0070274, "0.007027")]
    #[case(-0.005, "-0.005000")]
    #[case(0.01, "0.0100")]
    fn test_format_converted(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_converted(value), expected);
    }
}
