//! Number rendering for the display buffer and history text.
//!
//! Three renderings exist and they are not interchangeable:
//! - [`number_to_string`] is the raw numeral written back into the display
//!   buffer (shortest round-trip digits, exponent form outside 1e-6..1e21).
//! - [`to_fixed`] renders a fixed number of decimals, ties rounded away from
//!   zero.
//! - [`format_scaled`] is the lossy K/M/B bucket used only for human-readable
//!   summaries. The authoritative value always stays in the `f64`.

const THOUSAND: f64 = 1e3;
const MILLION: f64 = 1e6;
const BILLION: f64 = 1e9;

/// Parses a display numeral. Anything unparseable becomes `NaN`.
pub fn parse_numeral(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Renders `value` the way the display buffer stores it.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    // -0 renders as "0"
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    // LowerExp gives "1.5e-7" / "1e21"; positive exponents carry an explicit sign.
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Renders `value` with exactly `digits` decimals.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.abs() >= 1e21 {
        return number_to_string(value);
    }

    let body = format!("{:.*}", digits, round_half_up_guard(value.abs(), digits));
    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Exact decimal ties are pushed one ULP away from zero so the formatter
/// rounds them up instead of to even.
fn round_half_up_guard(magnitude: f64, digits: usize) -> f64 {
    const PROBE: usize = 25;
    let wide = format!("{:.*}", digits + PROBE, magnitude);
    let tail = &wide[wide.len() - PROBE..];
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if is_tie {
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    }
}

/// Human-scale rendering: `1.5B`, `250.0M`, `12.3K`, or the plain numeral.
///
/// The threshold test uses the absolute magnitude; the sign is preserved in
/// the scaled numerator.
pub fn format_scaled(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= BILLION {
        format!("{}B", to_fixed(value / BILLION, 1))
    } else if magnitude >= MILLION {
        format!("{}M", to_fixed(value / MILLION, 1))
    } else if magnitude >= THOUSAND {
        format!("{}K", to_fixed(value / THOUSAND, 1))
    } else {
        number_to_string(value)
    }
}

/// The headline rendering of a display buffer. Unparseable or zero content
/// shows as `0`.
pub fn format_display(display: &str) -> String {
    let value = parse_numeral(display);
    if value.is_nan() {
        format_scaled(0.0)
    } else {
        format_scaled(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(-0.0, "0")]
    #[case(14.0, "14")]
    #[case(0.1 + 0.2, "0.30000000000000004")]
    #[case(-2.5, "-2.5")]
    #[case(1e21, "1e+21")]
    #[case(1.5e-7, "1.5e-7")]
    #[case(0.000001, "0.000001")]
    #[case(123456789.0, "123456789")]
    #[case(f64::NAN, "NaN")]
    #[case(f64::INFINITY, "Infinity")]
    #[case(f64::NEG_INFINITY, "-Infinity")]
    fn test_number_to_string(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(number_to_string(value), expected);
    }

    #[rstest]
    #[case(12.0, 2, "12.00")]
    #[case(12.0, 1, "12.0")]
    #[case(0.125, 2, "0.13")]
    #[case(2.5, 0, "3")]
    #[case(-1.005, 2, "-1.00")] // 1.005 is stored below the tie
    #[case(-0.001, 2, "-0.00")]
    #[case(-0.0, 2, "0.00")]
    #[case(0.0012346, 6, "0.001235")]
    #[case(f64::NAN, 4, "NaN")]
    #[case(f64::INFINITY, 1, "Infinity")]
    fn test_to_fixed(#[case] value: f64, #[case] digits: usize, #[case] expected: &str) {
        assert_eq!(to_fixed(value, digits), expected);
    }

    #[rstest]
    #[case(999.0, "999")]
    #[case(1000.0, "1.0K")]
    #[case(1250.0, "1.3K")]
    #[case(-1500.0, "-1.5K")]
    #[case(2_500_000.0, "2.5M")]
    #[case(1_200_000_000.0, "1.2B")]
    #[case(-3_000_000_000.0, "-3.0B")]
    #[case(0.5, "0.5")]
    #[case(f64::NAN, "NaN")]
    fn test_format_scaled(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_scaled(value), expected);
    }

    #[test]
    fn test_parse_numeral_accepts_display_forms() {
        assert_eq!(parse_numeral("0."), 0.0);
        assert_eq!(parse_numeral("-12.5"), -12.5);
        assert_eq!(parse_numeral("1e+21"), 1e21);
        assert_eq!(parse_numeral("Infinity"), f64::INFINITY);
        assert!(parse_numeral("NaN").is_nan());
        assert!(parse_numeral("12abc").is_nan());
    }

    #[test]
    fn test_format_display_treats_nan_as_zero() {
        assert_eq!(format_display("NaN"), "0");
        assert_eq!(format_display("1500000"), "1.5M");
    }
}
