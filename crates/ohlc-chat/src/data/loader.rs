//! CSV loader for OHLCV rows with list-valued support/resistance columns
//!
//! Rows whose prices cannot be coerced are skipped with a diagnostic; a
//! malformed level list only empties that list. Neither aborts the load.

use super::{Dataset, PriceBar};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Loader output: the dataset plus how many rows were dropped
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub skipped_rows: usize,
}

/// Raw CSV row, every field still text
#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: String,
    open: String,
    close: String,
    low: String,
    high: String,
    volume: String,
    #[serde(rename = "Support", alias = "support", default)]
    support: String,
    #[serde(rename = "Resistance", alias = "resistance", default)]
    resistance: String,
    #[serde(default)]
    direction: String,
}

impl RawRow {
    fn into_bar(self) -> std::result::Result<PriceBar, String> {
        let date = parse_date(&self.timestamp)
            .ok_or_else(|| format!("unparseable timestamp {:?}", self.timestamp))?;

        Ok(PriceBar {
            date,
            open: coerce("open", &self.open)?,
            close: coerce("close", &self.close)?,
            low: coerce("low", &self.low)?,
            high: coerce("high", &self.high)?,
            volume: coerce("volume", &self.volume)?,
            support_levels: parse_levels(&self.support),
            resistance_levels: parse_levels(&self.resistance),
            direction: parse_direction(&self.direction),
        })
    }
}

/// Load a dataset from a CSV file
pub fn load_path(path: impl AsRef<Path>) -> Result<LoadedDataset> {
    let path = path.as_ref();
    info!("Loading OHLCV data from: {}", path.display());
    load_reader(File::open(path)?)
}

/// Load a dataset from any CSV source
///
/// Columns are matched by header name, so their order is free.
pub fn load_reader<R: Read>(reader: R) -> Result<LoadedDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut bars = Vec::new();
    let mut skipped_rows = 0;

    for (index, result) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row_num = index + 1;
        let outcome = result
            .map_err(|e| e.to_string())
            .and_then(RawRow::into_bar);

        match outcome {
            Ok(bar) => bars.push(bar),
            Err(reason) => {
                warn!("Skipping row {}: {}", row_num, reason);
                skipped_rows += 1;
            }
        }
    }

    info!("Loaded {} bars ({} rows skipped)", bars.len(), skipped_rows);

    Ok(LoadedDataset {
        dataset: Dataset::new(bars),
        skipped_rows,
    })
}

/// Parse a serialized list literal such as `[123.4, 120.0]` into decimals
///
/// `[]` yields an empty list. Anything malformed (missing brackets, a
/// non-numeric or non-finite element, an empty cell) also yields an empty
/// list and a debug diagnostic.
pub fn parse_levels(raw: &str) -> Vec<f64> {
    try_parse_levels(raw).unwrap_or_else(|| {
        if !raw.trim().is_empty() {
            debug!("Treating malformed level list {:?} as empty", raw);
        }
        Vec::new()
    })
}

fn try_parse_levels(raw: &str) -> Option<Vec<f64>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
    // A single trailing comma is valid list syntax
    if items.len() > 1 && items.last().is_some_and(|s| s.is_empty()) {
        items.pop();
    }

    items
        .into_iter()
        .map(|item| item.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn coerce(column: &str, raw: &str) -> std::result::Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("column '{column}' is not a finite number: {raw:?}"))
}

fn parse_direction(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse the calendar date of a timestamp, ignoring any time of day
fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%d %H:%M",
    ];

    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
