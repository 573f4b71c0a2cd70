//! Premium rate tables per 1000 sum assured

mod loader;
mod sheet;
mod table;

pub use loader::{load_default_rates, load_rate_table, DEFAULT_RATES_PATH};
pub use sheet::{coerce_integer, coerce_number, RateSource, Sheet};
pub use table::{ProductRates, RateCoverage, RateTable};
