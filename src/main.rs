//! Life Quote CLI
//!
//! Command-line interface for premium and sum assured quotations

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use life_quote_engine::quote::Scalar;
use life_quote_engine::{Product, QuoteEngine, QuoteRequest, DEFAULT_RATES_PATH};

#[derive(Debug, Parser)]
#[command(name = "life_quote", version, about = "Quote life product premiums and sums assured")]
struct Cli {
    /// Directory holding the product rate CSV exports. Production rates are not
    /// bundled: point this at the actuarial exports (or data/fixtures/rates for
    /// sample rates)
    #[arg(long, global = true, default_value = DEFAULT_RATES_PATH)]
    rates_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Premium for a target sum assured
    Premium {
        #[command(flatten)]
        policy: PolicyArgs,

        #[arg(long)]
        sum_assured: f64,
    },
    /// Sum assured affordable for an installment premium
    SumAssured {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Installment premium at the chosen mode
        #[arg(long)]
        premium: f64,
    },
    /// Show which ages and terms each product's rate table covers
    Rates {
        #[arg(long)]
        product: Option<String>,
    },
}

#[derive(Debug, Args)]
struct PolicyArgs {
    #[arg(long)]
    product: String,

    /// Term in years (defaults to the product's fixed term, if it has one)
    #[arg(long)]
    term: Option<u32>,

    /// yearly, half-yearly, quarterly or monthly
    #[arg(long, default_value = "yearly")]
    mode: String,

    #[arg(long, required_unless_present = "dob")]
    age_next_birthday: Option<u32>,

    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: Option<String>,

    #[arg(long, default_value = "male")]
    gender: String,

    /// Accepted for completeness; does not change the quote
    #[arg(long)]
    smoker: bool,

    /// Leave out the double accident benefit rider
    #[arg(long)]
    no_dab: bool,

    /// Valuation date for ages derived from --dob (default: today)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

impl PolicyArgs {
    fn request(&self) -> QuoteRequest {
        QuoteRequest {
            product: Some(self.product.clone()),
            term: self.term.map(|t| Scalar::Number(f64::from(t))),
            mode: Some(self.mode.clone()),
            age_next_birthday: self.age_next_birthday.map(|a| Scalar::Number(f64::from(a))),
            dob: self.dob.clone(),
            gender: Some(self.gender.clone()),
            smoker: Some(Scalar::Bool(self.smoker)),
            dab_included: Some(Scalar::Bool(!self.no_dab)),
            ..Default::default()
        }
    }

    fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = QuoteEngine::from_dir(&cli.rates_dir)
        .with_context(|| format!("Failed to load rates from {}", cli.rates_dir.display()))?;

    let output = match cli.command {
        Command::Premium { policy, sum_assured } => {
            let request = QuoteRequest {
                sum_assured: Some(Scalar::Number(sum_assured)),
                ..policy.request()
            };
            let result = engine.quote_as_of(&request, policy.as_of())?;
            serde_json::to_string_pretty(&result)?
        }
        Command::SumAssured { policy, premium } => {
            let request = QuoteRequest {
                premium: Some(Scalar::Number(premium)),
                ..policy.request()
            };
            let result = engine.quote_as_of(&request, policy.as_of())?;
            serde_json::to_string_pretty(&result)?
        }
        Command::Rates { product } => {
            let products = match product {
                Some(key) => vec![key.parse::<Product>()?],
                None => Product::ALL.to_vec(),
            };
            let coverage: serde_json::Map<String, serde_json::Value> = products
                .into_iter()
                .map(|p| -> Result<(String, serde_json::Value), serde_json::Error> {
                    let value = serde_json::to_value(engine.rates().coverage(p))?;
                    Ok((p.key().to_string(), value))
                })
                .collect::<Result<_, _>>()?;
            serde_json::to_string_pretty(&coverage)?
        }
    };

    println!("{}", output);
    Ok(())
}
