//! Internal rate of return: the rate at which NPV is zero.
//!
//! Newton steps from a 10% guess; any step that leaves the bracket or stalls
//! falls back to bisection on the sign-changing bracket.
use crate::compute::formulas::{npv, npv_derivative};
use crate::error::{CalcError, Result};
use tracing::trace;

const LOWER: f64 = -0.99;
const UPPER: f64 = 10.0;
const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolution {
    /// Rate as a fraction (0.12 = 12%).
    pub rate: f64,
    pub iterations: usize,
}

pub fn solve_irr(initial_investment: f64, cash_flows: &[f64]) -> Result<IrrSolution> {
    if cash_flows.is_empty() {
        return Err(CalcError::solver("IRR needs at least one cash flow"));
    }
    let f = |r: f64| npv(r, initial_investment, cash_flows);

    let (mut lo, mut hi) = (finite_lower_bound(&f), UPPER);
    let (mut f_lo, f_hi) = (f(lo), f(hi));
    if !f_lo.is_finite() || !f_hi.is_finite() || f_lo.signum() == f_hi.signum() {
        return Err(CalcError::solver(format!(
            "NPV does not change sign on [{}, {}]",
            lo, UPPER
        )));
    }

    let mut rate = 0.1;
    for iteration in 1..=MAX_ITERATIONS {
        let value = f(rate);
        trace!(iteration, rate, npv = value, "irr step");
        if value.abs() < TOLERANCE {
            return Ok(IrrSolution { rate, iterations: iteration });
        }

        // Shrink the bracket around the root.
        if value.signum() == f_lo.signum() {
            lo = rate;
            f_lo = value;
        } else {
            hi = rate;
        }

        let slope = npv_derivative(rate, cash_flows);
        let newton = rate - value / slope;
        rate = if slope != 0.0 && newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if hi - lo < TOLERANCE {
            return Ok(IrrSolution { rate, iterations: iteration });
        }
    }

    Err(CalcError::solver(format!("IRR did not converge in {} iterations", MAX_ITERATIONS)))
}

/// Pulls the lower end toward zero until NPV is finite there. Long series
/// underflow `(1 + r)^t` near -1 and blow NPV up to infinity.
fn finite_lower_bound(f: impl Fn(f64) -> f64) -> f64 {
    let mut lo = LOWER;
    for _ in 0..MAX_ITERATIONS {
        if f(lo).is_finite() {
            break;
        }
        lo *= 0.5;
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_period() {
        let solution = solve_irr(100.0, &[110.0]).unwrap();
        assert!((solution.rate - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_annuity_zeroes_npv() {
        let flows = [30.0, 40.0, 50.0, 60.0];
        let solution = solve_irr(120.0, &flows).unwrap();
        assert!(npv(solution.rate, 120.0, &flows).abs() < 1e-7);
        assert!(solution.rate > 0.0);
    }

    #[test]
    fn test_negative_irr() {
        let solution = solve_irr(100.0, &[50.0, 40.0]).unwrap();
        assert!(solution.rate < 0.0);
        assert!(npv(solution.rate, 100.0, &[50.0, 40.0]).abs() < 1e-7);
    }

    #[test]
    fn test_no_sign_change() {
        let err = solve_irr(-10.0, &[5.0, 5.0]).unwrap_err();
        assert!(matches!(err, CalcError::SolverDidNotConverge(_)));
    }

    #[test]
    fn test_empty_flows() {
        assert!(solve_irr(100.0, &[]).is_err());
    }

    #[test]
    fn test_long_series_still_brackets() {
        let flows = [10.0; 200];
        let solution = solve_irr(100.0, &flows).unwrap();
        assert!((solution.rate - 0.10).abs() < 1e-3);
        assert!(npv(solution.rate, 100.0, &flows).abs() < 1e-6);
    }

    #[test]
    fn test_lower_bound_moves_toward_zero() {
        let flows = [10.0; 200];
        let lo = finite_lower_bound(|r| npv(r, 100.0, &flows));
        assert!(lo > LOWER && lo < 0.0);
        assert!(npv(lo, 100.0, &flows).is_finite());
        assert_eq!(finite_lower_bound(|r| npv(r, 100.0, &[110.0])), LOWER);
    }
}
