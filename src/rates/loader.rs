//! Load rate sources from a directory of CSV exports
//!
//! Each product's sheets are the files `<product_key>.csv` and
//! `<product_key>.<sheet name>.csv`, read in file-name order.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::sheet::{RateSource, Sheet};
use super::table::RateTable;
use crate::error::RateTableError;
use crate::products::Product;

/// Default location of the rate exports
pub const DEFAULT_RATES_PATH: &str = "data/rates";

/// Sheet name for a file belonging to `product`, if it does
fn sheet_name(product: Product, file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".csv")?;
    if stem == product.key() {
        return Some(product.key().to_string());
    }
    let sheet = stem.strip_prefix(product.key())?.strip_prefix('.')?;
    (!sheet.is_empty()).then(|| sheet.to_string())
}

/// Collect the source for one product from a directory listing
fn load_source(product: Product, files: &[PathBuf]) -> RateSource {
    let mut sheets = Vec::new();

    for path in files {
        let Some(name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| sheet_name(product, n))
        else {
            continue;
        };

        let sheet = File::open(path)
            .map_err(csv::Error::from)
            .and_then(|file| Sheet::from_csv_reader(name, file));
        match sheet {
            Ok(sheet) => {
                debug!("Read sheet '{}' ({} rows) for {}", sheet.name, sheet.rows.len(), product);
                sheets.push(sheet);
            }
            Err(e) => warn!("Failed to read sheet {} for {}: {}", path.display(), product, e),
        }
    }

    if sheets.is_empty() {
        warn!("No rate file found for {} in the rates directory", product);
    }
    RateSource::new(sheets)
}

/// Load every product's rates from `path`
///
/// Only an unreadable directory is an error. Missing or malformed product
/// files leave that product without rates.
pub fn load_rate_table(path: &Path) -> Result<RateTable, RateTableError> {
    let entries = fs::read_dir(path).map_err(|source| RateTableError::Directory {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    for file in &files {
        let known = file
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| Product::ALL.iter().any(|&p| sheet_name(p, n).is_some()));
        if !known {
            warn!("Ignoring {}: not a known product rate file", file.display());
        }
    }

    let sources = Product::ALL.map(|product| (product, load_source(product, &files)));
    Ok(RateTable::from_sources(sources))
}

/// Load from the default location
pub fn load_default_rates() -> Result<RateTable, RateTableError> {
    load_rate_table(Path::new(DEFAULT_RATES_PATH))
}
