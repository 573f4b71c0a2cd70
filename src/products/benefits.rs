//! Maturity and interim payout schedules
//!
//! Each line is rounded on its own. The accrued bonus (10% of sum assured per
//! year of term) is paid inside the maturity amount and also disclosed as a
//! separate line.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::Product;
use crate::error::QuoteError;
use super::formula::round_money;

/// Label of the disclosure line for the bonus already included in maturity
pub const ACCRUED_BONUS_LABEL: &str = "Accrued Bonus (included above)";

/// Bonus accrual per year of term, as a fraction of sum assured
pub const BONUS_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct BenefitLine {
    pub label: String,
    pub amount: f64,
}

/// Ordered milestone -> payout mapping
///
/// Serializes as a JSON object whose keys keep schedule order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenefitSchedule {
    lines: Vec<BenefitLine>,
}

impl BenefitSchedule {
    fn push(&mut self, label: impl Into<String>, amount: f64) {
        self.lines.push(BenefitLine {
            label: label.into(),
            amount: round_money(amount),
        });
    }

    pub fn lines(&self) -> &[BenefitLine] {
        &self.lines
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.lines.iter().find(|l| l.label == label).map(|l| l.amount)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Serialize for BenefitSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for line in &self.lines {
            map.serialize_entry(&line.label, &line.amount)?;
        }
        map.end()
    }
}

fn accrued_bonus(sum_assured: f64, term: u32) -> f64 {
    BONUS_RATE * sum_assured * term as f64
}

fn require_term(product: Product, term: u32, expected: u32) -> Result<(), QuoteError> {
    if term != expected {
        return Err(QuoteError::InvalidTerm {
            product,
            term,
            reason: format!("benefits are defined for a {}-year term", expected),
        });
    }
    Ok(())
}

/// Four 15% school-grade payouts, then 50% plus bonus at university entry
pub fn education_endowment(sum_assured: f64, term: u32) -> Result<BenefitSchedule, QuoteError> {
    let mut schedule = BenefitSchedule::default();
    for grade in 9..=12 {
        schedule.push(format!("Grade {}", grade), 0.15 * sum_assured);
    }

    let bonus = accrued_bonus(sum_assured, term);
    schedule.push("1st Year University/College (Maturity)", 0.50 * sum_assured + bonus);
    schedule.push(ACCRUED_BONUS_LABEL, bonus);
    Ok(schedule)
}

/// 20%, 20%, 30% in the three years before maturity, then 30% plus bonus
pub fn academic_advantage(sum_assured: f64, term: u32) -> Result<BenefitSchedule, QuoteError> {
    if term < 4 {
        return Err(QuoteError::InvalidTerm {
            product: Product::AcademicAdvantage,
            term,
            reason: "payouts start three years before maturity, so the term must be at least 4"
                .to_string(),
        });
    }

    let bonus = accrued_bonus(sum_assured, term);
    let mut schedule = BenefitSchedule::default();
    schedule.push(format!("Year {}", term - 3), 0.20 * sum_assured);
    schedule.push(format!("Year {}", term - 2), 0.20 * sum_assured);
    schedule.push(format!("Year {}", term - 1), 0.30 * sum_assured);
    schedule.push(format!("Year {} (Maturity)", term), 0.30 * sum_assured + bonus);
    schedule.push(ACCRUED_BONUS_LABEL, bonus);
    Ok(schedule)
}

/// 15% at the end of years 3, 6, 9 and 12; full sum assured plus bonus at 15
pub fn money_back_15(sum_assured: f64, term: u32) -> Result<BenefitSchedule, QuoteError> {
    require_term(Product::MoneyBack15, term, 15)?;

    let bonus = accrued_bonus(sum_assured, term);
    let mut schedule = BenefitSchedule::default();
    for year in ["3rd", "6th", "9th", "12th"] {
        schedule.push(format!("End of {} Year", year), 0.15 * sum_assured);
    }
    schedule.push("Maturity (15th Year)", 1.00 * sum_assured + bonus);
    schedule.push(ACCRUED_BONUS_LABEL, bonus);
    Ok(schedule)
}

/// 10% at the end of years 4, 6 and 8; full sum assured plus bonus at 10
pub fn money_back_10(sum_assured: f64, term: u32) -> Result<BenefitSchedule, QuoteError> {
    require_term(Product::MoneyBack10, term, 10)?;

    let bonus = accrued_bonus(sum_assured, term);
    let mut schedule = BenefitSchedule::default();
    for year in ["4th", "6th", "8th"] {
        schedule.push(format!("End of {} Year", year), 0.10 * sum_assured);
    }
    schedule.push("Maturity (10th Year)", 1.00 * sum_assured + bonus);
    schedule.push(ACCRUED_BONUS_LABEL, bonus);
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_endowment_schedule() {
        let schedule = education_endowment(500_000.0, 5).unwrap();
        let labels: Vec<_> = schedule.lines().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Grade 9",
                "Grade 10",
                "Grade 11",
                "Grade 12",
                "1st Year University/College (Maturity)",
                ACCRUED_BONUS_LABEL,
            ]
        );
        for grade in 9..=12 {
            assert_eq!(schedule.get(&format!("Grade {}", grade)), Some(75_000.0));
        }
        assert_eq!(schedule.get("1st Year University/College (Maturity)"), Some(500_000.0));
        assert_eq!(schedule.get(ACCRUED_BONUS_LABEL), Some(250_000.0));
    }

    #[test]
    fn test_academic_advantage_years_follow_term() {
        let schedule = academic_advantage(100_000.0, 12).unwrap();
        assert_eq!(schedule.get("Year 9"), Some(20_000.0));
        assert_eq!(schedule.get("Year 10"), Some(20_000.0));
        assert_eq!(schedule.get("Year 11"), Some(30_000.0));
        // 30% + 10% x 12 years
        assert_eq!(schedule.get("Year 12 (Maturity)"), Some(150_000.0));
        assert_eq!(schedule.get(ACCRUED_BONUS_LABEL), Some(120_000.0));
    }

    #[test]
    fn test_academic_advantage_short_term() {
        assert!(matches!(
            academic_advantage(100_000.0, 3),
            Err(QuoteError::InvalidTerm { term: 3, .. })
        ));
    }

    #[test]
    fn test_money_back_15_schedule() {
        let schedule = money_back_15(100_000.0, 15).unwrap();
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.get("End of 12th Year"), Some(15_000.0));
        assert_eq!(schedule.get("Maturity (15th Year)"), Some(250_000.0));
        assert_eq!(schedule.get(ACCRUED_BONUS_LABEL), Some(150_000.0));
    }

    #[test]
    fn test_money_back_10_schedule() {
        let schedule = money_back_10(60_000.0, 10).unwrap();
        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule.get("End of 4th Year"), Some(6_000.0));
        assert_eq!(schedule.get("End of 8th Year"), Some(6_000.0));
        assert_eq!(schedule.get("Maturity (10th Year)"), Some(120_000.0));
    }

    #[test]
    fn test_fixed_term_schedules_reject_other_terms() {
        assert!(matches!(
            money_back_15(100_000.0, 10),
            Err(QuoteError::InvalidTerm { product: Product::MoneyBack15, .. })
        ));
        assert!(matches!(
            money_back_10(100_000.0, 15),
            Err(QuoteError::InvalidTerm { product: Product::MoneyBack10, .. })
        ));
    }

    #[test]
    fn test_lines_rounded_independently() {
        let schedule = money_back_10(123_456.789, 10).unwrap();
        assert_eq!(schedule.get("End of 4th Year"), Some(12_345.68));
        assert_eq!(schedule.get(ACCRUED_BONUS_LABEL), Some(123_456.79));
    }

    #[test]
    fn test_serializes_in_schedule_order() {
        let schedule = money_back_10(100_000.0, 10).unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(
            json,
            r#"{"End of 4th Year":10000.0,"End of 6th Year":10000.0,"End of 8th Year":10000.0,"Maturity (10th Year)":200000.0,"Accrued Bonus (included above)":100000.0}"#
        );
    }
}
