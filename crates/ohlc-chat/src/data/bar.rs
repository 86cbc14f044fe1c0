//! Price bar and dataset types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data with its flagged support/resistance levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub volume: f64,
    /// Support levels in source order, possibly empty
    pub support_levels: Vec<f64>,
    /// Resistance levels in source order, possibly empty
    pub resistance_levels: Vec<f64>,
    /// Free-form direction tag from the source data
    pub direction: Option<String>,
}

impl PriceBar {
    /// Bar with no levels or direction, convenient for tests and synthetic data
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            close,
            low,
            high,
            volume,
            support_levels: Vec::new(),
            resistance_levels: Vec::new(),
            direction: None,
        }
    }

    /// Close strictly above open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Calendar year of the bar
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Daily return in percent, `None` when open is zero or the result is not finite
    pub fn daily_return_percent(&self) -> Option<f64> {
        if self.open == 0.0 {
            return None;
        }
        let pct = (self.close - self.open) / self.open * 100.0;
        pct.is_finite().then_some(pct)
    }

    /// All price and volume fields are finite numbers
    pub fn is_finite(&self) -> bool {
        [self.open, self.close, self.low, self.high, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Ordered sequence of price bars, one per trading day
///
/// Built once by the loader and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    bars: Vec<PriceBar>,
}

impl Dataset {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First `n` bars (fewer when the dataset is shorter)
    pub fn head(&self, n: usize) -> &[PriceBar] {
        &self.bars[..n.min(self.bars.len())]
    }

    /// Last `n` bars (fewer when the dataset is shorter)
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Bars whose date falls in `year`
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &PriceBar> {
        self.bars.iter().filter(move |bar| bar.year() == year)
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.bars.iter().map(PriceBar::year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

impl From<Vec<PriceBar>> for Dataset {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}
