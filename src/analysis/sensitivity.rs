use crate::compute::formulas::dcf_enterprise_value;
use crate::config::DcfAssumptions;
use rayon::prelude::*;
use serde::Serialize;

/// DCF enterprise values across a WACC × terminal-growth grid.
///
/// `values[i][j]` is the valuation at `wacc_pct[i]` and `growth_pct[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityGrid {
    pub fcf: f64,
    pub wacc_pct: Vec<f64>,
    pub growth_pct: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    pub fn get(&self, wacc_index: usize, growth_index: usize) -> Option<f64> {
        self.values.get(wacc_index)?.get(growth_index).copied()
    }

    /// Range of finite valuations in the grid, `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Rows (one per WACC) are valued in parallel.
pub fn sensitivity_grid(
    fcf: f64,
    wacc_pct: &[f64],
    growth_pct: &[f64],
    assumptions: &DcfAssumptions,
) -> SensitivityGrid {
    let values: Vec<Vec<f64>> = wacc_pct
        .par_iter()
        .map(|&wacc| {
            growth_pct
                .iter()
                .map(|&growth| dcf_enterprise_value(fcf, wacc, growth, assumptions))
                .collect::<Vec<f64>>()
        })
        .collect();

    SensitivityGrid {
        fcf,
        wacc_pct: wacc_pct.to_vec(),
        growth_pct: growth_pct.to_vec(),
        values,
    }
}

/// `count` evenly spaced points centred on `centre`, `step` apart.
pub fn centred_steps(centre: f64, step: f64, count: usize) -> Vec<f64> {
    let half = (count.saturating_sub(1)) as f64 / 2.0;
    (0..count).map(|i| centre + (i as f64 - half) * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_matches_pointwise_valuation() {
        let assumptions = DcfAssumptions::default();
        let waccs = centred_steps(10.0, 1.0, 3);
        let growths = centred_steps(3.0, 0.5, 3);
        let grid = sensitivity_grid(100.0, &waccs, &growths, &assumptions);

        assert_eq!(grid.values.len(), 3);
        for (i, &w) in waccs.iter().enumerate() {
            for (j, &g) in growths.iter().enumerate() {
                assert_eq!(grid.get(i, j), Some(dcf_enterprise_value(100.0, w, g, &assumptions)));
            }
        }
        assert_eq!(grid.get(1, 1), Some(1662.0));
    }

    #[test]
    fn test_value_falls_as_wacc_rises() {
        let grid = sensitivity_grid(100.0, &[8.0, 10.0, 12.0], &[2.0], &DcfAssumptions::default());
        let column: Vec<f64> = grid.values.iter().map(|row| row[0]).collect();
        assert!(column[0] > column[1] && column[1] > column[2]);
    }

    #[test]
    fn test_finite_range_skips_singularities() {
        let grid = sensitivity_grid(100.0, &[5.0, 10.0], &[5.0], &DcfAssumptions::default());
        let (lo, hi) = grid.finite_range().unwrap();
        assert_eq!(lo, hi);
        assert_eq!(grid.get(5, 0), None);
    }

    #[test]
    fn test_centred_steps() {
        assert_eq!(centred_steps(10.0, 0.5, 5), vec![9.0, 9.5, 10.0, 10.5, 11.0]);
        assert!(centred_steps(1.0, 1.0, 0).is_empty());
    }
}
