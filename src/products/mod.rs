//! Product catalogue and per-product pricing configuration
//!
//! Every product is priced by the same formula (see [`formula`]); products differ
//! only in the constants and the benefit schedule carried by their [`ProductConfig`].

pub mod benefits;
pub mod formula;

pub use benefits::{BenefitLine, BenefitSchedule};
pub use formula::{round_money, Gender, PaymentMode, PremiumBreakdown};

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::QuoteError;

/// Products available for quotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Product {
    EducationEndowment,
    AcademicAdvantage,
    MoneyBack15,
    MoneyBack10,
}

impl Product {
    pub const ALL: [Product; 4] = [
        Product::EducationEndowment,
        Product::AcademicAdvantage,
        Product::MoneyBack15,
        Product::MoneyBack10,
    ];

    /// Key used in requests and as the rate source file stem
    pub fn key(&self) -> &'static str {
        match self {
            Product::EducationEndowment => "education_endowment",
            Product::AcademicAdvantage => "academic_advantage",
            Product::MoneyBack15 => "money_back_15",
            Product::MoneyBack10 => "money_back_10",
        }
    }

    pub fn config(&self) -> &'static ProductConfig {
        match self {
            Product::EducationEndowment => &EDUCATION_ENDOWMENT,
            Product::AcademicAdvantage => &ACADEMIC_ADVANTAGE,
            Product::MoneyBack15 => &MONEY_BACK_15,
            Product::MoneyBack10 => &MONEY_BACK_10,
        }
    }
}

impl FromStr for Product {
    type Err = QuoteError;

    /// Case- and whitespace-insensitive product key lookup
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Product::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| QuoteError::UnsupportedProduct(s.to_string()))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Layout of a product's rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Rate depends on discounted age and term
    ByAgeAndTerm,
    /// Fixed-term product: rate depends on discounted age only
    ByAge,
}

/// Which age an eligibility band is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBasis {
    Actual,
    NextBirthday,
}

/// Inclusive entry-age band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeLimits {
    pub basis: AgeBasis,
    pub min: u32,
    pub max: u32,
}

/// Benefit schedule generator: (sum assured, term) -> milestones
pub type ScheduleFn = fn(f64, u32) -> Result<BenefitSchedule, QuoteError>;

/// Pricing constants and rules for one product
#[derive(Debug, Clone, Copy)]
pub struct ProductConfig {
    pub product: Product,

    /// Marketing name
    pub name: &'static str,

    pub table_shape: TableShape,

    /// Waiver-of-premium rider cost as a fraction of basic premium
    pub wp_rate_of_basic: f64,

    /// Multiplier on the basic rate used when inverting the premium formula.
    /// Must equal `1 + wp_rate_of_basic`.
    pub basic_loading: f64,

    /// Term the product is sold for, if it only has one
    pub fixed_term: Option<u32>,

    pub min_sum_assured: Option<f64>,

    pub age_limits: Option<AgeLimits>,

    pub benefit_schedule: ScheduleFn,
}

pub const EDUCATION_ENDOWMENT: ProductConfig = ProductConfig {
    product: Product::EducationEndowment,
    name: "Education Endowment Policy Plan",
    table_shape: TableShape::ByAgeAndTerm,
    wp_rate_of_basic: 0.0,
    basic_loading: 1.0,
    fixed_term: None,
    min_sum_assured: None,
    age_limits: None,
    benefit_schedule: benefits::education_endowment,
};

pub const ACADEMIC_ADVANTAGE: ProductConfig = ProductConfig {
    product: Product::AcademicAdvantage,
    name: "Academic Advantage Plan",
    table_shape: TableShape::ByAgeAndTerm,
    wp_rate_of_basic: 0.02,
    basic_loading: 1.02,
    fixed_term: None,
    min_sum_assured: Some(100_000.0),
    age_limits: None,
    benefit_schedule: benefits::academic_advantage,
};

pub const MONEY_BACK_15: ProductConfig = ProductConfig {
    product: Product::MoneyBack15,
    name: "15 Years Money Back Plan",
    table_shape: TableShape::ByAge,
    wp_rate_of_basic: 0.01,
    basic_loading: 1.01,
    fixed_term: Some(15),
    min_sum_assured: Some(50_000.0),
    age_limits: Some(AgeLimits {
        basis: AgeBasis::Actual,
        min: 18,
        max: 45,
    }),
    benefit_schedule: benefits::money_back_15,
};

pub const MONEY_BACK_10: ProductConfig = ProductConfig {
    product: Product::MoneyBack10,
    name: "10 Years Money Back Plan",
    table_shape: TableShape::ByAge,
    wp_rate_of_basic: 0.01,
    basic_loading: 1.01,
    fixed_term: Some(10),
    min_sum_assured: Some(50_000.0),
    age_limits: Some(AgeLimits {
        basis: AgeBasis::NextBirthday,
        min: 18,
        max: 50,
    }),
    benefit_schedule: benefits::money_back_10,
};

impl ProductConfig {
    /// Reject terms the product is not sold for
    pub fn check_term(&self, term: u32) -> Result<(), QuoteError> {
        if term == 0 {
            return Err(QuoteError::InvalidTerm {
                product: self.product,
                term,
                reason: "term must be at least one year".to_string(),
            });
        }
        match self.fixed_term {
            Some(fixed) if fixed != term => Err(QuoteError::InvalidTerm {
                product: self.product,
                term,
                reason: format!("{} is only sold with a {}-year term", self.name, fixed),
            }),
            _ => Ok(()),
        }
    }

    /// Entry-age check. `actual_age` is the completed age in years.
    pub fn check_age(&self, actual_age: u32, age_next_birthday: u32) -> Result<(), QuoteError> {
        let Some(limits) = self.age_limits else {
            return Ok(());
        };
        let (age, label) = match limits.basis {
            AgeBasis::Actual => (actual_age, "age"),
            AgeBasis::NextBirthday => (age_next_birthday, "age next birthday"),
        };
        if age < limits.min || age > limits.max {
            return Err(QuoteError::Ineligible {
                product: self.product,
                reason: format!("{} must be {}-{}, got {}", label, limits.min, limits.max, age),
            });
        }
        Ok(())
    }

    pub fn check_sum_assured(&self, sum_assured: f64) -> Result<(), QuoteError> {
        match self.min_sum_assured {
            Some(min) if sum_assured < min => Err(QuoteError::Ineligible {
                product: self.product,
                reason: format!("minimum sum assured is {:.0}, got {:.2}", min, sum_assured),
            }),
            _ => Ok(()),
        }
    }

    /// Benefit schedule for this product
    pub fn benefits(&self, sum_assured: f64, term: u32) -> Result<BenefitSchedule, QuoteError> {
        (self.benefit_schedule)(sum_assured, term)
    }
}
