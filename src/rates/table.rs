//! Immutable per-product rate lookup

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{info, warn};
use serde::Serialize;

use super::sheet::RateSource;
use crate::products::Product;

/// Rates per 1000 sum assured for one product
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRates {
    /// Keyed by (discounted age, term in years)
    ByAgeAndTerm(BTreeMap<(i32, u32), f64>),
    /// Keyed by discounted age; the term does not affect the rate
    ByAge(BTreeMap<i32, f64>),
}

impl ProductRates {
    /// Exact-key lookup, no interpolation
    pub fn get(&self, discounted_age: i32, term: u32) -> Option<f64> {
        match self {
            ProductRates::ByAgeAndTerm(rates) => rates.get(&(discounted_age, term)).copied(),
            ProductRates::ByAge(rates) => rates.get(&discounted_age).copied(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProductRates::ByAgeAndTerm(rates) => rates.len(),
            ProductRates::ByAge(rates) => rates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union with `other`, whose entries win on collision
    pub(crate) fn merge(&mut self, other: ProductRates) {
        match (self, other) {
            (ProductRates::ByAgeAndTerm(mine), ProductRates::ByAgeAndTerm(theirs)) => {
                mine.extend(theirs)
            }
            (ProductRates::ByAge(mine), ProductRates::ByAge(theirs)) => mine.extend(theirs),
            (mine, theirs) => *mine = theirs,
        }
    }

    pub fn coverage(&self) -> RateCoverage {
        let (ages, terms): (BTreeSet<i32>, BTreeSet<u32>) = match self {
            ProductRates::ByAgeAndTerm(rates) => (
                rates.keys().map(|&(age, _)| age).collect(),
                rates.keys().map(|&(_, term)| term).collect(),
            ),
            ProductRates::ByAge(rates) => (rates.keys().copied().collect(), BTreeSet::new()),
        };
        RateCoverage {
            entries: self.len(),
            ages: ages.into_iter().collect(),
            terms: terms.into_iter().collect(),
        }
    }
}

/// Which keys a product's table covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateCoverage {
    pub entries: usize,
    pub ages: Vec<i32>,
    /// Empty for age-only tables
    pub terms: Vec<u32>,
}

/// Rate tables for every loaded product
///
/// Built once and then only read; share it by reference across threads.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    tables: HashMap<Product, ProductRates>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw sources. A product whose source yields no rates is left
    /// without a table, so every lookup for it reports no rate.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (Product, RateSource)>,
    {
        let mut table = Self::new();
        for (product, source) in sources {
            match source.parse(product.config().table_shape) {
                Some(rates) => {
                    info!("Loaded {} rate entries for {}", rates.len(), product);
                    table.tables.insert(product, rates);
                }
                None => warn!("No usable rates for {}; all lookups will fail", product),
            }
        }
        table
    }

    /// Build directly from parsed rates
    pub fn with_rates(mut self, product: Product, rates: ProductRates) -> Self {
        if rates.is_empty() {
            self.tables.remove(&product);
        } else {
            self.tables.insert(product, rates);
        }
        self
    }

    /// Rate per 1000 for the key, or `None` when absent. Never returns zero.
    pub fn get_rate(&self, product: Product, discounted_age: i32, term: u32) -> Option<f64> {
        self.tables.get(&product)?.get(discounted_age, term)
    }

    pub fn has_table(&self, product: Product) -> bool {
        self.tables.contains_key(&product)
    }

    pub fn product_rates(&self, product: Product) -> Option<&ProductRates> {
        self.tables.get(&product)
    }

    pub fn coverage(&self, product: Product) -> Option<RateCoverage> {
        self.tables.get(&product).map(ProductRates::coverage)
    }
}
