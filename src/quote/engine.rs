//! Calculation facade
//!
//! Resolves the product configuration, validates the term and entry rules,
//! looks up the rate and runs the product's formula and benefit schedule.
//! Holds nothing but the read-only rate table, so one engine can serve any
//! number of threads.

use std::path::Path;

use chrono::{Local, NaiveDate};
use log::debug;
use rayon::prelude::*;

use super::input::{CalculationInput, CalculationResult, QuoteOutcome, Target};
use super::request::QuoteRequest;
use crate::error::{QuoteError, RateTableError};
use crate::products::formula::{discounted_age, round_money};
use crate::rates::{load_rate_table, RateTable};

#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    rates: RateTable,
}

impl QuoteEngine {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    /// Engine over the rate exports in `path`
    pub fn from_dir(path: &Path) -> Result<Self, RateTableError> {
        Ok(Self::new(load_rate_table(path)?))
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Replace the rate table with a fresh load of `path`.
    /// The current table is kept if the directory cannot be read.
    pub fn reload_rates(&mut self, path: &Path) -> Result<(), RateTableError> {
        self.rates = load_rate_table(path)?;
        Ok(())
    }

    /// Quote a raw request, deriving ages as at today
    pub fn quote(&self, request: &QuoteRequest) -> Result<CalculationResult, QuoteError> {
        self.quote_as_of(request, Local::now().date_naive())
    }

    pub fn quote_as_of(
        &self,
        request: &QuoteRequest,
        as_of: NaiveDate,
    ) -> Result<CalculationResult, QuoteError> {
        self.calculate(&request.to_input(as_of)?)
    }

    /// Quote many requests in parallel; results keep the request order
    pub fn quote_batch(
        &self,
        requests: &[QuoteRequest],
        as_of: NaiveDate,
    ) -> Vec<Result<CalculationResult, QuoteError>> {
        requests
            .par_iter()
            .map(|request| self.quote_as_of(request, as_of))
            .collect()
    }

    /// Solve one quote
    pub fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, QuoteError> {
        let config = input.product.config();

        let amount = input.target.amount();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(QuoteError::malformed(
                "amount",
                format!("expected a positive amount, got {}", amount),
            ));
        }
        let discounted_age = discounted_age(input.age_next_birthday, input.gender)?;

        config.check_term(input.term)?;
        config.check_age(input.actual_age(), input.age_next_birthday)?;
        if let Target::SumAssured(sum_assured) = input.target {
            config.check_sum_assured(sum_assured)?;
        }

        let rate_per_1000 = self
            .rates
            .get_rate(input.product, discounted_age, input.term)
            .ok_or(QuoteError::RateNotFound {
                product: input.product,
                discounted_age,
                term: input.term,
            })?;

        debug!(
            "{} {:?}: discounted age {}, term {}, rate {}",
            input.product,
            input.target.direction(),
            discounted_age,
            input.term,
            rate_per_1000
        );

        let (outcome, benefits) = match input.target {
            Target::SumAssured(sum_assured) => {
                let premium = config.premium_from_sum_assured(
                    rate_per_1000,
                    sum_assured,
                    input.mode,
                    input.dab_included,
                );
                let benefits = config.benefits(sum_assured, input.term)?;
                (QuoteOutcome::Premium(premium.rounded()), benefits)
            }
            Target::Premium(premium) => {
                let sum_assured = config.sum_assured_from_premium(
                    rate_per_1000,
                    premium,
                    input.mode,
                    input.dab_included,
                );
                let benefits = config.benefits(sum_assured, input.term)?;
                let outcome = QuoteOutcome::SumAssured {
                    estimated_sum_assured: round_money(sum_assured),
                };
                (outcome, benefits)
            }
        };

        Ok(CalculationResult {
            discounted_age,
            rate_per_1000,
            outcome,
            benefits,
        })
    }
}
