//! Scalar kernels: binary operator evaluation and the unary function table.
use crate::display::format::{format_scaled, number_to_string, to_fixed};
use crate::error::CalcError;
use crate::store::Operator;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Evaluates `lhs op rhs`.
///
/// Division by exactly zero yields `0`. A negative base with a fractional
/// exponent yields `NaN`, which is left to propagate.
#[inline]
pub fn apply_binary(op: Operator, lhs: f64, rhs: f64) -> f64 {
    match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                0.0
            } else {
                lhs / rhs
            }
        }
        Operator::Remainder => lhs % rhs,
        Operator::Power => lhs.powf(rhs),
    }
}

/// Functions applied immediately to the display value.
///
/// `PadSqrt` and `PadLn` are the basic keypad's square root and log: same
/// transform as `Sqrt`/`Ln`, but they leave no history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFn {
    Sqrt,
    Ln,
    PadSqrt,
    PadLn,
    Negate,
    Thousand,
    Million,
    Billion,
    Percent,
    Square,
    Cube,
    Exp,
    Pow10,
    Reciprocal,
    Cbrt,
    Log10,
    Factorial,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    PowE,
    /// Uniform sample in [0, 1); ignores the operand.
    Rand,
}

/// How a value is rendered inside a history template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Scaled,
    Fixed6,
    Floor,
}

impl Style {
    fn render(self, value: f64) -> String {
        match self {
            Style::Scaled => format_scaled(value),
            Style::Fixed6 => to_fixed(value, 6),
            Style::Floor => number_to_string(value.floor()),
        }
    }
}

/// `{x}` is replaced by the operand, `{r}` by the result.
#[derive(Debug, Clone, Copy)]
struct Template {
    pattern: &'static str,
    operand: Style,
    result: Style,
}

#[derive(Clone, Copy)]
struct UnarySpec {
    name: &'static str,
    transform: fn(f64) -> f64,
    history: Option<Template>,
}

fn row(name: &'static str, transform: fn(f64) -> f64, history: Option<Template>) -> UnarySpec {
    UnarySpec { name, transform, history }
}

const fn logged(pattern: &'static str, operand: Style, result: Style) -> Option<Template> {
    Some(Template { pattern, operand, result })
}

use Style::{Fixed6, Floor, Scaled};

impl UnaryFn {
    pub const ALL: [UnaryFn; 25] = [
        UnaryFn::Sqrt,
        UnaryFn::Ln,
        UnaryFn::PadSqrt,
        UnaryFn::PadLn,
        UnaryFn::Negate,
        UnaryFn::Thousand,
        UnaryFn::Million,
        UnaryFn::Billion,
        UnaryFn::Percent,
        UnaryFn::Square,
        UnaryFn::Cube,
        UnaryFn::Exp,
        UnaryFn::Pow10,
        UnaryFn::Reciprocal,
        UnaryFn::Cbrt,
        UnaryFn::Log10,
        UnaryFn::Factorial,
        UnaryFn::Sin,
        UnaryFn::Cos,
        UnaryFn::Tan,
        UnaryFn::Sinh,
        UnaryFn::Cosh,
        UnaryFn::Tanh,
        UnaryFn::PowE,
        UnaryFn::Rand,
    ];

    pub fn all() -> impl Iterator<Item = UnaryFn> {
        Self::ALL.into_iter()
    }

    fn spec(self) -> UnarySpec {
        match self {
            UnaryFn::Sqrt => row("sqrt", f64::sqrt, logged("²√{x} = {r}", Scaled, Fixed6)),
            UnaryFn::Ln => row("ln", f64::ln, logged("ln({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::PadSqrt => row("pad_sqrt", f64::sqrt, None),
            UnaryFn::PadLn => row("pad_ln", f64::ln, None),
            UnaryFn::Negate => row("negate", |x| -x, None),
            UnaryFn::Thousand => row("thousand", |x| x * 1e3, None),
            UnaryFn::Million => row("million", |x| x * 1e6, None),
            UnaryFn::Billion => row("billion", |x| x * 1e9, None),
            UnaryFn::Percent => row("percent", |x| x / 100.0, None),
            UnaryFn::Square => row("square", |x| x.powi(2), logged("{x}² = {r}", Scaled, Scaled)),
            UnaryFn::Cube => row("cube", |x| x.powi(3), logged("{x}³ = {r}", Scaled, Scaled)),
            UnaryFn::Exp => row("exp", f64::exp, logged("e^{x} = {r}", Scaled, Scaled)),
            UnaryFn::Pow10 => row("pow10", |x| 10f64.powf(x), logged("10^{x} = {r}", Scaled, Scaled)),
            UnaryFn::Reciprocal => row("reciprocal", |x| 1.0 / x, logged("1/{x} = {r}", Scaled, Fixed6)),
            UnaryFn::Cbrt => row("cbrt", f64::cbrt, logged("³√{x} = {r}", Scaled, Fixed6)),
            UnaryFn::Log10 => row("log10", f64::log10, logged("log₁₀({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Factorial => row("factorial", factorial, logged("{x}! = {r}", Floor, Scaled)),
            UnaryFn::Sin => row("sin", f64::sin, logged("sin({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Cos => row("cos", f64::cos, logged("cos({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Tan => row("tan", f64::tan, logged("tan({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Sinh => row("sinh", f64::sinh, logged("sinh({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Cosh => row("cosh", f64::cosh, logged("cosh({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::Tanh => row("tanh", f64::tanh, logged("tanh({x}) = {r}", Scaled, Fixed6)),
            UnaryFn::PowE => {
                row("pow_e", |x| x.powf(std::f64::consts::E), logged("{x}^e = {r}", Scaled, Scaled))
            }
            UnaryFn::Rand => row("rand", |_| rand::random::<f64>(), logged("Random = {r}", Scaled, Fixed6)),
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn apply(self, value: f64) -> f64 {
        (self.spec().transform)(value)
    }

    /// Whether completing this function appends a history entry.
    pub fn is_logged(self) -> bool {
        self.spec().history.is_some()
    }

    /// History text for `operand -> result`, or `None` for silent functions.
    pub fn describe(self, operand: f64, result: f64) -> Option<String> {
        let template = self.spec().history?;
        Some(
            template
                .pattern
                .replace("{x}", &template.operand.render(operand))
                .replace("{r}", &template.result.render(result)),
        )
    }
}

impl FromStr for UnaryFn {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        UnaryFn::all()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| CalcError::UnknownFunction(s.to_string()))
    }
}

/// `⌊x⌋!`, with every `n <= 1` mapping to 1. Large inputs overflow to infinity.
fn factorial(value: f64) -> f64 {
    let n = value.floor();
    if n.is_nan() {
        return f64::NAN;
    }
    if n <= 1.0 {
        return 1.0;
    }
    // 171! already exceeds f64::MAX
    if n > 170.0 {
        return f64::INFINITY;
    }
    (2..=n as u32).fold(1.0, |acc, k| acc * k as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    E,
    Pi,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::E => std::f64::consts::E,
            Constant::Pi => std::f64::consts::PI,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Constant::E => "e",
            Constant::Pi => "π",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operator::Add, 3.0, 4.0, 7.0)]
    #[case(Operator::Subtract, 3.0, 4.0, -1.0)]
    #[case(Operator::Multiply, 7.0, 2.0, 14.0)]
    #[case(Operator::Divide, 9.0, 3.0, 3.0)]
    #[case(Operator::Divide, 5.0, 0.0, 0.0)]
    #[case(Operator::Divide, 5.0, -0.0, 0.0)]
    #[case(Operator::Remainder, 10.0, 3.0, 1.0)]
    #[case(Operator::Remainder, -10.0, 3.0, -1.0)]
    #[case(Operator::Power, 2.0, 10.0, 1024.0)]
    #[case(Operator::Power, 4.0, 0.5, 2.0)]
    #[case(Operator::Power, 2.0, -1.0, 0.5)]
    fn test_binary(#[case] op: Operator, #[case] lhs: f64, #[case] rhs: f64, #[case] expected: f64) {
        assert_eq!(apply_binary(op, lhs, rhs), expected);
    }

    #[test]
    fn test_negative_base_fractional_exponent_is_nan() {
        assert!(apply_binary(Operator::Power, -8.0, 1.0 / 3.0).is_nan());
    }

    #[test]
    fn test_table_covers_every_function_once() {
        let names: Vec<&str> = UnaryFn::all().map(|f| f.name()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());
        for f in UnaryFn::all() {
            assert_eq!(f.name().parse::<UnaryFn>().unwrap(), f);
        }
    }

    #[rstest]
    #[case(UnaryFn::Sqrt, 16.0, 4.0)]
    #[case(UnaryFn::Negate, 5.0, -5.0)]
    #[case(UnaryFn::Thousand, 1.5, 1500.0)]
    #[case(UnaryFn::Million, 15.0, 15_000_000.0)]
    #[case(UnaryFn::Billion, 2.0, 2e9)]
    #[case(UnaryFn::Percent, 50.0, 0.5)]
    #[case(UnaryFn::Square, -3.0, 9.0)]
    #[case(UnaryFn::Cube, 2.0, 8.0)]
    #[case(UnaryFn::Pow10, 3.0, 1000.0)]
    #[case(UnaryFn::Cbrt, 27.0, 3.0)]
    #[case(UnaryFn::Factorial, 5.7, 120.0)]
    #[case(UnaryFn::Factorial, -3.0, 1.0)]
    #[case(UnaryFn::Reciprocal, 0.0, f64::INFINITY)]
    fn test_unary(#[case] f: UnaryFn, #[case] input: f64, #[case] expected: f64) {
        assert_eq!(f.apply(input), expected);
    }

    #[test]
    fn test_factorial_overflow_and_nan() {
        assert_eq!(UnaryFn::Factorial.apply(171.0), f64::INFINITY);
        assert!(UnaryFn::Factorial.apply(f64::NAN).is_nan());
    }

    #[rstest]
    #[case(UnaryFn::Sqrt, 2.0, "²√2 = 1.414214")]
    #[case(UnaryFn::Square, 1500.0, "1.5K² = 2.3M")]
    #[case(UnaryFn::Ln, 1.0, "ln(1) = 0.000000")]
    #[case(UnaryFn::Factorial, 5.7, "5! = 120")]
    #[case(UnaryFn::Reciprocal, 4.0, "1/4 = 0.250000")]
    #[case(UnaryFn::Sin, 0.0, "sin(0) = 0.000000")]
    fn test_unary_history_text(#[case] f: UnaryFn, #[case] input: f64, #[case] expected: &str) {
        assert_eq!(f.describe(input, f.apply(input)).unwrap(), expected);
    }

    #[test]
    fn test_silent_functions_have_no_history() {
        let silent = [
            UnaryFn::PadSqrt,
            UnaryFn::PadLn,
            UnaryFn::Negate,
            UnaryFn::Thousand,
            UnaryFn::Million,
            UnaryFn::Billion,
            UnaryFn::Percent,
        ];
        for f in silent {
            assert!(!f.is_logged());
            assert!(f.describe(1.0, 1.0).is_none());
        }
    }

    #[rstest]
    #[case(UnaryFn::PadSqrt, UnaryFn::Sqrt, 2.0)]
    #[case(UnaryFn::PadLn, UnaryFn::Ln, 10.0)]
    fn test_pad_variants_share_transform(#[case] pad: UnaryFn, #[case] scientific: UnaryFn, #[case] input: f64) {
        assert_eq!(pad.apply(input), scientific.apply(input));
        assert!(scientific.is_logged());
    }

    #[test]
    fn test_rand_is_unit_interval_and_logged() {
        for _ in 0..100 {
            let r = UnaryFn::Rand.apply(42.0);
            assert!((0.0..1.0).contains(&r));
        }
        assert_eq!(UnaryFn::Rand.describe(7.0, 0.25).unwrap(), "Random = 0.250000");
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(UnaryFn::ALL.len(), 25);
        assert_eq!("RAND".parse::<UnaryFn>().unwrap(), UnaryFn::Rand);
        assert!(matches!("gamma".parse::<UnaryFn>(), Err(CalcError::UnknownFunction(_))));
    }
}
