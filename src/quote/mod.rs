//! Quote requests, results and the calculation facade

mod age;
mod engine;
mod input;
mod request;

pub use age::ages_at;
pub use engine::QuoteEngine;
pub use input::{CalculationInput, CalculationResult, Direction, QuoteOutcome, Target};
pub use request::{QuoteRequest, Scalar};
