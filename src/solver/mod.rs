//! Root finding for the investment-analysis mode.
pub mod irr;

pub use irr::{solve_irr, IrrSolution};
