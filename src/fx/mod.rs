//! Currency conversion over an externally supplied rate table.
pub mod convert;
pub mod rates;

pub use convert::{convert, format_converted};
pub use rates::{currency_name, RateBook, RateTable, BASE_CURRENCY};
