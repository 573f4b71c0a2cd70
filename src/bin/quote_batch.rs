//! Quote a CSV file of requests in parallel
//!
//! Input columns use the request field names (product, term, mode, sumAssured,
//! premium, ageNextBirthday, dob, gender, smoker, dabIncluded); blank cells are
//! treated as absent. A failing row is reported in the output, never aborts
//! the batch.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use life_quote_engine::quote::Scalar;
use life_quote_engine::{CalculationResult, QuoteEngine, QuoteError, QuoteRequest, DEFAULT_RATES_PATH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "quote_batch", about = "Quote every request in a CSV file")]
struct BatchArgs {
    /// CSV file of quote requests
    input: PathBuf,

    #[arg(long, default_value = "quote_batch_output.csv")]
    output: PathBuf,

    /// Directory holding the product rate CSV exports (not bundled; see
    /// data/fixtures/rates for sample rates)
    #[arg(long, default_value = DEFAULT_RATES_PATH)]
    rates_dir: PathBuf,

    /// Valuation date for ages derived from dob (default: today)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

/// Raw CSV row; every cell is text until the engine normalizes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    product: Option<String>,
    term: Option<String>,
    mode: Option<String>,
    sum_assured: Option<String>,
    premium: Option<String>,
    age_next_birthday: Option<String>,
    dob: Option<String>,
    gender: Option<String>,
    smoker: Option<String>,
    dab_included: Option<String>,
}

impl CsvRow {
    fn into_request(self) -> QuoteRequest {
        QuoteRequest {
            product: self.product,
            term: self.term.map(Scalar::Text),
            mode: self.mode,
            sum_assured: self.sum_assured.map(Scalar::Text),
            premium: self.premium.map(Scalar::Text),
            age_next_birthday: self.age_next_birthday.map(Scalar::Text),
            dob: self.dob,
            gender: self.gender,
            smoker: self.smoker.map(Scalar::Text),
            dab_included: self.dab_included.map(Scalar::Text),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct OutputRow {
    row: usize,
    product: String,
    discounted_age: Option<i32>,
    rate_per_1000: Option<f64>,
    basic_premium: Option<f64>,
    dab: Option<f64>,
    wp: Option<f64>,
    phcf: Option<f64>,
    annual_premium: Option<f64>,
    installment_premium: Option<f64>,
    estimated_sum_assured: Option<f64>,
    maturity_benefit: Option<f64>,
    error_kind: Option<String>,
    error: Option<String>,
}

impl OutputRow {
    fn new(row: usize, request: &QuoteRequest, result: &Result<CalculationResult, QuoteError>) -> Self {
        let mut out = OutputRow {
            row,
            product: request.product.clone().unwrap_or_default(),
            ..Default::default()
        };
        match result {
            Ok(quote) => {
                out.discounted_age = Some(quote.discounted_age);
                out.rate_per_1000 = Some(quote.rate_per_1000);
                if let Some(p) = quote.premium() {
                    out.basic_premium = Some(p.basic_premium);
                    out.dab = Some(p.dab);
                    out.wp = Some(p.wp);
                    out.phcf = Some(p.phcf);
                    out.annual_premium = Some(p.annual_premium);
                    out.installment_premium = Some(p.installment_premium);
                }
                out.estimated_sum_assured = quote.estimated_sum_assured();
                out.maturity_benefit = quote
                    .benefits
                    .lines()
                    .iter()
                    .find(|l| l.label.contains("Maturity"))
                    .map(|l| l.amount);
            }
            Err(e) => {
                out.error_kind = Some(e.kind().to_string());
                out.error = Some(e.to_string());
            }
        }
        out
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = BatchArgs::parse();
    let start = Instant::now();

    let engine = QuoteEngine::from_dir(&args.rates_dir)
        .with_context(|| format!("Failed to load rates from {}", args.rates_dir.display()))?;

    println!("Loading requests from {}...", args.input.display());
    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let requests = reader
        .deserialize::<CsvRow>()
        .map(|row| row.map(CsvRow::into_request))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to parse request file")?;
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let quote_start = Instant::now();
    let results = engine.quote_batch(&requests, as_of);
    println!("Quotes complete in {:?}", quote_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut failures = 0;
    for (i, (request, result)) in requests.iter().zip(&results).enumerate() {
        if result.is_err() {
            failures += 1;
        }
        writer.serialize(OutputRow::new(i + 1, request, result))?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nBatch Summary:");
    println!("  Quoted: {}", requests.len() - failures);
    println!("  Failed: {}", failures);
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
