//! Age at a valuation date

use chrono::{Datelike, NaiveDate};

/// Completed age and age next birthday of someone born on `dob`, as at `as_of`.
///
/// Returns `None` when `dob` is after `as_of`.
pub fn ages_at(dob: NaiveDate, as_of: NaiveDate) -> Option<(u32, u32)> {
    if dob > as_of {
        return None;
    }
    let before_birthday = (as_of.month(), as_of.day()) < (dob.month(), dob.day());
    let age = as_of.year() - dob.year() - i32::from(before_birthday);
    let age = u32::try_from(age).ok()?;
    Some((age, age + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_boundaries() {
        let dob = date(1995, 6, 15);
        assert_eq!(ages_at(dob, date(2025, 6, 14)), Some((29, 30)));
        assert_eq!(ages_at(dob, date(2025, 6, 15)), Some((30, 31)));
        assert_eq!(ages_at(dob, date(2025, 12, 31)), Some((30, 31)));
    }

    #[test]
    fn test_leap_day_birth() {
        let dob = date(2000, 2, 29);
        assert_eq!(ages_at(dob, date(2021, 2, 28)), Some((20, 21)));
        assert_eq!(ages_at(dob, date(2021, 3, 1)), Some((21, 22)));
    }

    #[test]
    fn test_newborn_and_future_dob() {
        assert_eq!(ages_at(date(2025, 1, 1), date(2025, 1, 1)), Some((0, 1)));
        assert_eq!(ages_at(date(2025, 1, 2), date(2025, 1, 1)), None);
    }
}
