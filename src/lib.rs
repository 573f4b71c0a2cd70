//! Life Quote Engine - premium and sum assured quotation for life products
//!
//! This library provides:
//! - Rate tables per 1000 sum assured, loaded from actuarial CSV exports
//! - One parameterized premium formula with an exact inverse (sum assured from premium)
//! - Per-product maturity and interim benefit schedules
//! - A stateless calculation facade over a shared, read-only rate table

pub mod error;
pub mod products;
pub mod quote;
pub mod rates;

// Re-export commonly used types
pub use error::{QuoteError, RateTableError};
pub use products::{BenefitSchedule, Gender, PaymentMode, PremiumBreakdown, Product, ProductConfig};
pub use quote::{CalculationInput, CalculationResult, Direction, QuoteEngine, QuoteRequest, Target};
pub use rates::{RateTable, DEFAULT_RATES_PATH};
