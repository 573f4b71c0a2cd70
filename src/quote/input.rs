//! Typed calculation inputs and results

use serde::Serialize;

use crate::products::{BenefitSchedule, Gender, PaymentMode, PremiumBreakdown, Product};

/// Which way a quote is solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    PremiumFromSumAssured,
    SumAssuredFromPremium,
}

/// The amount the customer fixes; the engine solves for the other one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    SumAssured(f64),
    /// Installment premium at the chosen payment mode
    Premium(f64),
}

impl Target {
    pub fn direction(&self) -> Direction {
        match self {
            Target::SumAssured(_) => Direction::PremiumFromSumAssured,
            Target::Premium(_) => Direction::SumAssuredFromPremium,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Target::SumAssured(a) | Target::Premium(a) => *a,
        }
    }
}

/// A normalized quote request
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    pub product: Product,
    /// Policy term in years
    pub term: u32,
    pub mode: PaymentMode,
    pub age_next_birthday: u32,
    /// Completed age, when known from a date of birth
    pub actual_age: Option<u32>,
    pub gender: Gender,
    /// Accepted but not used by any rate or formula
    pub smoker: bool,
    /// Double accident benefit rider
    pub dab_included: bool,
    pub target: Target,
}

impl CalculationInput {
    /// New input with the DAB rider included and a non-smoker
    pub fn new(
        product: Product,
        term: u32,
        mode: PaymentMode,
        age_next_birthday: u32,
        gender: Gender,
        target: Target,
    ) -> Self {
        Self {
            product,
            term,
            mode,
            age_next_birthday,
            actual_age: None,
            gender,
            smoker: false,
            dab_included: true,
            target,
        }
    }

    pub fn with_dab(mut self, dab_included: bool) -> Self {
        self.dab_included = dab_included;
        self
    }

    pub fn with_smoker(mut self, smoker: bool) -> Self {
        self.smoker = smoker;
        self
    }

    pub fn with_actual_age(mut self, age: u32) -> Self {
        self.actual_age = Some(age);
        self
    }

    /// Completed age; one less than age next birthday when no date of birth was given
    pub fn actual_age(&self) -> u32 {
        self.actual_age
            .unwrap_or_else(|| self.age_next_birthday.saturating_sub(1))
    }
}

/// Solved side of a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuoteOutcome {
    Premium(PremiumBreakdown),
    SumAssured { estimated_sum_assured: f64 },
}

/// Output record; all money amounts rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub discounted_age: i32,
    /// As stored in the rate table, unrounded
    pub rate_per_1000: f64,
    #[serde(flatten)]
    pub outcome: QuoteOutcome,
    pub benefits: BenefitSchedule,
}

impl CalculationResult {
    pub fn premium(&self) -> Option<&PremiumBreakdown> {
        match &self.outcome {
            QuoteOutcome::Premium(p) => Some(p),
            QuoteOutcome::SumAssured { .. } => None,
        }
    }

    pub fn estimated_sum_assured(&self) -> Option<f64> {
        match self.outcome {
            QuoteOutcome::SumAssured { estimated_sum_assured } => Some(estimated_sum_assured),
            QuoteOutcome::Premium(_) => None,
        }
    }
}
