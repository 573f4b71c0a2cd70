//! Raw quote requests as received from the request layer, and their
//! normalization into a typed [`CalculationInput`]

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::age::ages_at;
use super::input::{CalculationInput, Target};
use crate::error::QuoteError;
use crate::products::{Gender, PaymentMode, Product};
use crate::rates::coerce_number;

/// Strings accepted as "yes" for checkbox-like fields
const TRUTHY: [&str; 5] = ["1", "true", "yes", "y", "on"];

/// A request field that may arrive as a JSON number, string or boolean
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_number(&self, field: &str) -> Result<f64, QuoteError> {
        match self {
            Scalar::Number(n) => Ok(*n),
            Scalar::Text(s) => coerce_number(s)
                .ok_or_else(|| QuoteError::malformed(field, format!("'{}' is not a number", s))),
            Scalar::Bool(_) => Err(QuoteError::malformed(
                field,
                "expected a number, got a boolean",
            )),
        }
    }

    /// Whole, positive number of years
    fn as_years(&self, field: &str) -> Result<u32, QuoteError> {
        let value = match self {
            Scalar::Text(s) if !is_whole_number(s) => {
                return Err(QuoteError::malformed(
                    field,
                    format!("'{}' is not a whole number", s),
                ));
            }
            other => other.as_number(field)?,
        };
        if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
            return Err(QuoteError::malformed(
                field,
                format!("expected a positive whole number, got {}", value),
            ));
        }
        Ok(value as u32)
    }

    /// Finite, positive money amount
    fn as_amount(&self, field: &str) -> Result<f64, QuoteError> {
        let value = self.as_number(field)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(QuoteError::malformed(
                field,
                format!("expected a positive amount, got {}", value),
            ));
        }
        Ok(value)
    }

    fn as_flag(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => *n != 0.0,
            Scalar::Text(s) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Quote request record
///
/// Exactly one of `sum_assured` (premium quote) or `premium` (sum assured
/// quote) must be set. The age comes from `age_next_birthday` or, failing
/// that, from `dob`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub product: Option<String>,
    pub term: Option<Scalar>,
    pub mode: Option<String>,
    pub sum_assured: Option<Scalar>,
    pub premium: Option<Scalar>,
    pub age_next_birthday: Option<Scalar>,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub smoker: Option<Scalar>,
    /// Absent means included; an explicit `null` means excluded
    #[serde(default, deserialize_with = "null_as_false")]
    pub dab_included: Option<Scalar>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(Some(value.unwrap_or(Scalar::Bool(false))))
}

impl QuoteRequest {
    /// Normalize into a typed input, deriving ages from `dob` as at `as_of`
    pub fn to_input(&self, as_of: NaiveDate) -> Result<CalculationInput, QuoteError> {
        let product: Product = self
            .product
            .as_deref()
            .ok_or_else(|| QuoteError::malformed("product", "missing"))?
            .parse()?;

        let mode: PaymentMode = self.mode.as_deref().unwrap_or("yearly").parse()?;
        let gender: Gender = self.gender.as_deref().unwrap_or("male").parse()?;

        let target = match (&self.sum_assured, &self.premium) {
            (Some(sa), None) => Target::SumAssured(sa.as_amount("sumAssured")?),
            (None, Some(p)) => Target::Premium(p.as_amount("premium")?),
            (Some(_), Some(_)) => {
                return Err(QuoteError::malformed(
                    "sumAssured",
                    "give either sumAssured or premium, not both",
                ))
            }
            (None, None) => {
                return Err(QuoteError::malformed(
                    "sumAssured",
                    "sumAssured or premium is required",
                ))
            }
        };

        let term = match (&self.term, product.config().fixed_term) {
            (Some(term), _) => term.as_years("term")?,
            (None, Some(fixed)) => fixed,
            (None, None) => return Err(QuoteError::malformed("term", "missing")),
        };

        let (actual_age, age_next_birthday) = self.ages(as_of)?;

        let mut input =
            CalculationInput::new(product, term, mode, age_next_birthday, gender, target)
                .with_dab(self.dab_included.as_ref().map_or(true, Scalar::as_flag))
                .with_smoker(self.smoker.as_ref().is_some_and(is_smoker));
        if let Some(age) = actual_age {
            input = input.with_actual_age(age);
        }
        Ok(input)
    }

    /// (completed age if known, age next birthday)
    fn ages(&self, as_of: NaiveDate) -> Result<(Option<u32>, u32), QuoteError> {
        if let Some(anb) = &self.age_next_birthday {
            return Ok((None, anb.as_years("ageNextBirthday")?));
        }
        let dob = self
            .dob
            .as_deref()
            .ok_or_else(|| QuoteError::malformed("dob", "ageNextBirthday or dob is required"))?;
        let dob: NaiveDate = dob
            .trim()
            .parse()
            .map_err(|e| QuoteError::malformed("dob", format!("'{}': {}", dob, e)))?;
        let (age, anb) = ages_at(dob, as_of)
            .ok_or_else(|| QuoteError::malformed("dob", "date of birth is in the future"))?;
        Ok((Some(age), anb))
    }
}

fn is_whole_number(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_smoker(value: &Scalar) -> bool {
    match value {
        Scalar::Text(s) if s.trim().eq_ignore_ascii_case("smoker") => true,
        other => other.as_flag(),
    }
}
