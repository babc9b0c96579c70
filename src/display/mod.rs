//! Number rendering for the display, history and status line.
pub mod format;

pub use format::{format_display, format_scaled, number_to_string, parse_numeral, to_fixed};
