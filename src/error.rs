//! Error types for rate loading and quote calculation

use std::path::PathBuf;

use thiserror::Error;

use crate::products::Product;

/// Failures reported by a quote calculation
///
/// Every variant is an invalid-input condition from the caller's point of view;
/// the variant tells the caller which input was at fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("Unsupported product '{0}'")]
    UnsupportedProduct(String),

    #[error("No rate found for {product} at discounted age {discounted_age}, term {term}")]
    RateNotFound {
        product: Product,
        discounted_age: i32,
        term: u32,
    },

    #[error("Invalid payment mode: {0}")]
    InvalidMode(String),

    #[error("Invalid term {term} for {product}: {reason}")]
    InvalidTerm {
        product: Product,
        term: u32,
        reason: String,
    },

    #[error("Malformed input: {field} ({reason})")]
    MalformedInput { field: String, reason: String },

    #[error("Not eligible for {product}: {reason}")]
    Ineligible { product: Product, reason: String },
}

impl QuoteError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        QuoteError::MalformedInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable name of the failure kind, for machine-readable responses
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::UnsupportedProduct(_) => "UnsupportedProduct",
            QuoteError::RateNotFound { .. } => "RateNotFound",
            QuoteError::InvalidMode(_) => "InvalidMode",
            QuoteError::InvalidTerm { .. } => "InvalidTerm",
            QuoteError::MalformedInput { .. } => "MalformedInput",
            QuoteError::Ineligible { .. } => "Ineligible",
        }
    }
}

/// Fatal failures while reading rate sources from disk
///
/// Malformed rows, empty sheets and missing product files are not errors;
/// they are logged and the affected product simply has no rates.
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("Cannot read rates directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
