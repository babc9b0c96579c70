//! What-if analysis over the valuation formulas.
pub mod sensitivity;

pub use sensitivity::{centred_steps, sensitivity_grid, SensitivityGrid};
