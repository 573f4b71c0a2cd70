//! Shared pricing primitives and the premium / sum-assured formula pair
//!
//! Forward (sum assured -> premium), with `r` the rate per 1000 and `f` the mode factor:
//!
//! ```text
//! basic        = SA / 1000 * r
//! dab          = SA * 0.001            (only when the rider is included)
//! wp           = wp_rate * basic
//! total        = basic + dab + wp
//! phcf         = total * 0.0025
//! annual       = total + phcf
//! installment  = annual * f
//! ```
//!
//! Reverse divides out the same steps in the opposite order:
//! `SA = installment / f / 1.0025 / (r / 1000 * (1 + wp_rate) + dab_rate)`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ProductConfig;
use crate::error::QuoteError;

/// Double accident benefit rider cost per unit of sum assured
pub const DAB_RATE: f64 = 0.001;

/// Policyholders compensation fund levy on the pre-levy premium
pub const PHCF_RATE: f64 = 0.0025;

/// Gross-up factor that removes the PHCF levy in the reverse formula
pub const PHCF_LOADING: f64 = 1.0025;

/// Gender of the life assured. Only affects the rate-table age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Years subtracted from age next birthday to get the rate-table age
    pub fn age_discount(&self) -> i32 {
        match self {
            Gender::Male => 2,
            Gender::Female => 4,
        }
    }
}

impl FromStr for Gender {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(QuoteError::malformed(
                "gender",
                format!("expected male or female, got '{}'", s),
            )),
        }
    }
}

/// Oldest age next birthday accepted for any quote
pub const MAX_AGE_NEXT_BIRTHDAY: u32 = 120;

/// Rate-table lookup age: age next birthday less the gender discount
pub fn discounted_age(age_next_birthday: u32, gender: Gender) -> Result<i32, QuoteError> {
    i32::try_from(age_next_birthday)
        .ok()
        .filter(|&age| age >= 1 && age_next_birthday <= MAX_AGE_NEXT_BIRTHDAY)
        .and_then(|age| age.checked_sub(gender.age_discount()))
        .ok_or_else(|| {
            QuoteError::malformed(
                "ageNextBirthday",
                format!(
                    "expected 1 to {}, got {}",
                    MAX_AGE_NEXT_BIRTHDAY, age_next_birthday
                ),
            )
        })
}

/// Premium payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMode {
    #[serde(rename = "yearly")]
    Yearly,
    #[serde(rename = "half-yearly")]
    HalfYearly,
    #[serde(rename = "quarterly")]
    Quarterly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl PaymentMode {
    /// Fraction of the annual premium billed per installment
    pub fn factor(&self) -> f64 {
        match self {
            PaymentMode::Yearly => 1.0,
            PaymentMode::HalfYearly => 0.5150,
            PaymentMode::Quarterly => 0.2625,
            PaymentMode::Monthly => 0.0885,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Yearly => "yearly",
            PaymentMode::HalfYearly => "half-yearly",
            PaymentMode::Quarterly => "quarterly",
            PaymentMode::Monthly => "monthly",
        }
    }
}

impl FromStr for PaymentMode {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yearly" => Ok(PaymentMode::Yearly),
            "half-yearly" => Ok(PaymentMode::HalfYearly),
            "quarterly" => Ok(PaymentMode::Quarterly),
            "monthly" => Ok(PaymentMode::Monthly),
            _ => Err(QuoteError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round a money amount to 2 decimals, ties to even on the exact binary value.
///
/// Goes through the decimal formatter, which rounds the exact value of the
/// double; `(x * 100.0).round() / 100.0` disagrees with the rate manuals on
/// values such as 2.675.
pub fn round_money(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Premium components for one quotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PremiumBreakdown {
    pub basic_premium: f64,
    pub dab: f64,
    pub wp: f64,
    pub phcf: f64,
    pub annual_premium: f64,
    pub installment_premium: f64,
}

impl PremiumBreakdown {
    /// Copy with every component rounded for output
    pub fn rounded(&self) -> Self {
        Self {
            basic_premium: round_money(self.basic_premium),
            dab: round_money(self.dab),
            wp: round_money(self.wp),
            phcf: round_money(self.phcf),
            annual_premium: round_money(self.annual_premium),
            installment_premium: round_money(self.installment_premium),
        }
    }
}

impl ProductConfig {
    /// Forward formula: sum assured -> premium breakdown at full precision
    pub fn premium_from_sum_assured(
        &self,
        rate_per_1000: f64,
        sum_assured: f64,
        mode: PaymentMode,
        dab_included: bool,
    ) -> PremiumBreakdown {
        let basic_premium = (sum_assured / 1000.0) * rate_per_1000;
        let dab = if dab_included { sum_assured * DAB_RATE } else { 0.0 };
        let wp = self.wp_rate_of_basic * basic_premium;

        let total_before_phcf = basic_premium + dab + wp;
        let phcf = total_before_phcf * PHCF_RATE;
        let annual_premium = total_before_phcf + phcf;

        PremiumBreakdown {
            basic_premium,
            dab,
            wp,
            phcf,
            annual_premium,
            installment_premium: annual_premium * mode.factor(),
        }
    }

    /// Reverse formula: installment premium -> sum assured at full precision
    ///
    /// `rate_per_1000` must be positive; the rate table never yields zero.
    pub fn sum_assured_from_premium(
        &self,
        rate_per_1000: f64,
        installment_premium: f64,
        mode: PaymentMode,
        dab_included: bool,
    ) -> f64 {
        let annual_premium = installment_premium / mode.factor();
        let total_before_phcf = annual_premium / PHCF_LOADING;

        let dab_rate = if dab_included { DAB_RATE } else { 0.0 };
        let rate_per_unit = (rate_per_1000 / 1000.0) * self.basic_loading + dab_rate;

        total_before_phcf / rate_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Product;
    use approx::assert_relative_eq;

    const MODES: [PaymentMode; 4] = [
        PaymentMode::Yearly,
        PaymentMode::HalfYearly,
        PaymentMode::Quarterly,
        PaymentMode::Monthly,
    ];

    #[test]
    fn test_gender_discount() {
        assert_eq!(discounted_age(20, Gender::Male), Ok(18));
        assert_eq!(discounted_age(20, Gender::Female), Ok(16));
        for anb in 1..80 {
            let male = discounted_age(anb, Gender::Male).unwrap();
            let female = discounted_age(anb, Gender::Female).unwrap();
            assert_eq!(male - female, 2);
        }
    }

    #[test]
    fn test_out_of_range_age_is_malformed() {
        for anb in [0, MAX_AGE_NEXT_BIRTHDAY + 1, 2_147_483_649, 3_000_000_000, u32::MAX] {
            for gender in [Gender::Male, Gender::Female] {
                assert!(
                    matches!(
                        discounted_age(anb, gender),
                        Err(QuoteError::MalformedInput { .. })
                    ),
                    "age {} should be rejected",
                    anb
                );
            }
        }
        assert_eq!(discounted_age(MAX_AGE_NEXT_BIRTHDAY, Gender::Female), Ok(116));
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(" Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert!(matches!(
            "other".parse::<Gender>(),
            Err(QuoteError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_mode_factors() {
        assert_eq!("yearly".parse::<PaymentMode>().unwrap().factor(), 1.0);
        assert_eq!("Half-Yearly".parse::<PaymentMode>().unwrap().factor(), 0.5150);
        assert_eq!("quarterly".parse::<PaymentMode>().unwrap().factor(), 0.2625);
        assert_eq!("monthly ".parse::<PaymentMode>().unwrap().factor(), 0.0885);
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        assert_eq!(
            "weekly".parse::<PaymentMode>(),
            Err(QuoteError::InvalidMode("weekly".to_string()))
        );
    }

    #[test]
    fn test_round_money_ties() {
        assert_eq!(round_money(2.675), 2.67); // 2.675 is stored just below the tie
        assert_eq!(round_money(1.005), 1.0);
        assert_eq!(round_money(91_929.249_999_999), 91_929.25);
        assert_eq!(round_money(74_999.999_999_999_99), 75_000.0);
        assert_eq!(round_money(-1.005), -1.0);
    }

    #[test]
    fn test_forward_components() {
        let config = Product::AcademicAdvantage.config();
        let p = config.premium_from_sum_assured(50.0, 200_000.0, PaymentMode::Quarterly, true);

        assert_relative_eq!(p.basic_premium, 10_000.0);
        assert_relative_eq!(p.dab, 200.0);
        assert_relative_eq!(p.wp, 200.0);
        assert_relative_eq!(p.phcf, 26.0);
        assert_relative_eq!(p.annual_premium, 10_426.0);
        assert_relative_eq!(p.installment_premium, 10_426.0 * 0.2625);
    }

    #[test]
    fn test_dab_excluded_is_exactly_zero() {
        for product in Product::ALL {
            let p = product
                .config()
                .premium_from_sum_assured(73.31, 123_456.78, PaymentMode::Monthly, false);
            assert_eq!(p.dab, 0.0);
            assert_eq!(p.rounded().dab, 0.0);
        }
    }

    #[test]
    fn test_phcf_is_quarter_percent_of_pre_levy_total() {
        let config = Product::MoneyBack15.config();
        let p = config.premium_from_sum_assured(64.2, 80_000.0, PaymentMode::Yearly, true);
        let total = p.basic_premium + p.dab + p.wp;
        assert_relative_eq!(p.phcf, total * 0.0025);
        assert_relative_eq!(p.annual_premium, total * 1.0025, max_relative = 1e-14);
    }

    #[test]
    fn test_reverse_inverts_forward() {
        for product in Product::ALL {
            let config = product.config();
            for mode in MODES {
                for dab in [true, false] {
                    for &(rate, sa) in &[(12.5, 50_000.0), (182.4, 500_000.0), (97.03, 1_234_567.0)] {
                        let p = config.premium_from_sum_assured(rate, sa, mode, dab);
                        let back = config.sum_assured_from_premium(rate, p.installment_premium, mode, dab);
                        assert_relative_eq!(back, sa, max_relative = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_money_back_10_reverse_steps() {
        let config = Product::MoneyBack10.config();
        let premium = 1_750.0;
        let expected = premium / 0.0885 / 1.0025 / (95.3 / 1000.0 * 1.01 + 0.001);
        let sa = config.sum_assured_from_premium(95.3, premium, PaymentMode::Monthly, true);
        assert_relative_eq!(sa, expected, max_relative = 1e-14);
    }
}
