//! Raw tabular rate sources and their coercion into rate maps
//!
//! A source is whatever the actuarial team exported: title rows, header rows
//! with labels, blank cells and footnotes are all expected. Anything that does
//! not coerce to a number is dropped, never treated as an error.

use std::collections::BTreeMap;
use std::io::Read;

use log::warn;

use super::table::ProductRates;
use crate::products::TableShape;

/// One physical sheet of cells
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Read a headerless, ragged CSV export
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self::new(name, rows))
    }

    pub fn from_csv_str(name: impl Into<String>, data: &str) -> Result<Self, csv::Error> {
        Self::from_csv_reader(name, data.as_bytes())
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|c| c.as_str())
    }
}

/// All sheets supplied for one product, in processing order
#[derive(Debug, Clone, Default)]
pub struct RateSource {
    pub sheets: Vec<Sheet>,
}

impl RateSource {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Parse every sheet and union the results; later sheets overwrite earlier
    /// ones on the same key. `None` when no sheet yielded a single rate.
    pub fn parse(&self, shape: TableShape) -> Option<ProductRates> {
        let mut merged: Option<ProductRates> = None;

        for sheet in &self.sheets {
            let parsed = match shape {
                TableShape::ByAgeAndTerm => parse_age_term_sheet(sheet),
                TableShape::ByAge => parse_age_sheet(sheet),
            };
            let Some(parsed) = parsed else {
                continue;
            };
            match merged.as_mut() {
                Some(existing) => existing.merge(parsed),
                None => merged = Some(parsed),
            }
        }

        merged.filter(|rates| !rates.is_empty())
    }
}

/// Numeric coercion of a single cell. Blank, text and non-finite cells are absent.
pub fn coerce_number(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Integer coercion for ages and terms; fractional values truncate toward zero
pub fn coerce_integer(cell: &str) -> Option<i64> {
    coerce_number(cell).map(|v| v.trunc() as i64)
}

/// Rate cell coercion; an exact zero means "no rate"
fn coerce_rate(cell: &str) -> Option<f64> {
    coerce_number(cell).filter(|&r| r != 0.0)
}

/// Parse a term-by-age grid.
///
/// The header row is the first row with a numeric term after the first
/// column that sits directly above an age row, so title rows carrying a year
/// or plan number are skipped. Columns whose header does not coerce are
/// dropped; rows below whose first cell is not an age are dropped.
fn parse_age_term_sheet(sheet: &Sheet) -> Option<ProductRates> {
    let header = sheet.rows.windows(2).position(|pair| {
        let has_terms = pair[0]
            .iter()
            .skip(1)
            .any(|c| coerce_integer(c).is_some_and(|t| t > 0));
        has_terms && pair[1].first().and_then(|c| coerce_integer(c)).is_some()
    });
    let Some(header) = header else {
        warn!("No numeric term headers found in sheet '{}'", sheet.name);
        return None;
    };

    let terms: Vec<(usize, u32)> = sheet.rows[header]
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(col, c)| {
            let term = coerce_integer(c)?;
            u32::try_from(term).ok().filter(|&t| t > 0).map(|t| (col, t))
        })
        .collect();

    let mut rates = BTreeMap::new();
    let mut age_rows = 0;
    let mut dropped_rows = 0;

    for row in (header + 1)..sheet.rows.len() {
        let age = sheet
            .cell(row, 0)
            .and_then(coerce_integer)
            .and_then(|a| i32::try_from(a).ok());
        let Some(age) = age else {
            dropped_rows += 1;
            continue;
        };
        age_rows += 1;

        for &(col, term) in &terms {
            if let Some(rate) = sheet.cell(row, col).and_then(coerce_rate) {
                rates.insert((age, term), rate);
            }
        }
    }

    if age_rows == 0 {
        warn!("No numeric ages found in sheet '{}'", sheet.name);
        return None;
    }
    if dropped_rows > 0 {
        warn!(
            "Dropped {} non-numeric row(s) below the term header in sheet '{}'",
            dropped_rows, sheet.name
        );
    }

    Some(ProductRates::ByAgeAndTerm(rates))
}

/// Parse an (age, rate) two-column list. A row is kept only when both cells
/// coerce, so ages and rates can never shift against each other.
fn parse_age_sheet(sheet: &Sheet) -> Option<ProductRates> {
    let mut rates = BTreeMap::new();
    let mut pairs = 0;

    for row in &sheet.rows {
        let age = row
            .first()
            .and_then(|c| coerce_integer(c))
            .and_then(|a| i32::try_from(a).ok());
        let rate = row.get(1).and_then(|c| coerce_number(c));
        if let (Some(age), Some(rate)) = (age, rate) {
            pairs += 1;
            if rate != 0.0 {
                rates.insert(age, rate);
            }
        }
    }

    if pairs == 0 {
        warn!("No numeric age-rate pairs found in sheet '{}'", sheet.name);
        return None;
    }

    Some(ProductRates::ByAge(rates))
}
