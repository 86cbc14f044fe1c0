//! Aggregate and per-year statistics over a dataset
//!
//! All functions are pure. Bars with a zero open have no defined daily
//! return and are left out of every return statistic.

use crate::data::{Dataset, PriceBar};
use serde::{Deserialize, Serialize};

/// Bullish-day count over a (possibly year-filtered) range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BullishStats {
    pub bullish_count: usize,
    pub total_count: usize,
    /// `0.0` when the range is empty
    pub bullish_percentage: f64,
}

/// Whole-dataset summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_days: usize,
    pub total_bullish: usize,
    pub bullish_percentage: f64,
    /// Mean of (close - open) / open * 100, `None` when no bar has a usable open
    pub mean_daily_return_percent: Option<f64>,
    pub max_high: Option<f64>,
    pub min_low: Option<f64>,
}

/// Statistics for one calendar year, rounded to 2 decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyStat {
    pub year: i32,
    pub day_count: usize,
    pub bullish_count: usize,
    pub mean_return: Option<f64>,
    /// Sample standard deviation, `None` with fewer than two returns
    pub std_return: Option<f64>,
    pub min_return: Option<f64>,
    pub max_return: Option<f64>,
    pub mean_volume: f64,
}

/// Count bullish days, optionally restricted to one calendar year
pub fn bullish_day_stats(dataset: &Dataset, year: Option<i32>) -> BullishStats {
    match year {
        Some(year) => count_bullish(dataset.in_year(year)),
        None => count_bullish(dataset.bars().iter()),
    }
}

fn count_bullish<'a>(bars: impl Iterator<Item = &'a PriceBar>) -> BullishStats {
    let (bullish_count, total_count) = bars.fold((0, 0), |(bullish, total), bar| {
        (bullish + usize::from(bar.is_bullish()), total + 1)
    });

    BullishStats {
        bullish_count,
        total_count,
        bullish_percentage: percentage(bullish_count, total_count),
    }
}

/// Summary across the whole dataset
pub fn overall_stats(dataset: &Dataset) -> OverallStats {
    let bars = dataset.bars();
    let bullish = bullish_day_stats(dataset, None);
    let returns: Vec<f64> = bars.iter().filter_map(PriceBar::daily_return_percent).collect();

    OverallStats {
        total_days: bullish.total_count,
        total_bullish: bullish.bullish_count,
        bullish_percentage: bullish.bullish_percentage,
        mean_daily_return_percent: mean(&returns),
        max_high: bars.iter().map(|b| b.high).reduce(f64::max),
        min_low: bars.iter().map(|b| b.low).reduce(f64::min),
    }
}

/// One entry per distinct year, ascending
pub fn yearly_stats(dataset: &Dataset) -> Vec<YearlyStat> {
    dataset
        .years()
        .into_iter()
        .map(|year| {
            let bars: Vec<&PriceBar> = dataset.in_year(year).collect();
            let bullish = count_bullish(bars.iter().copied());
            let returns: Vec<f64> = bars
                .iter()
                .filter_map(|bar| bar.daily_return_percent())
                .collect();
            let volumes: Vec<f64> = bars.iter().map(|bar| bar.volume).collect();

            YearlyStat {
                year,
                day_count: bullish.total_count,
                bullish_count: bullish.bullish_count,
                mean_return: mean(&returns).map(round2),
                std_return: sample_std(&returns).map(round2),
                min_return: returns.iter().copied().reduce(f64::min).map(round2),
                max_return: returns.iter().copied().reduce(f64::max).map(round2),
                mean_volume: mean(&volumes).map_or(0.0, round2),
            }
        })
        .collect()
}

/// `part / total * 100`, or `0.0` for an empty range
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Round to 2 decimals, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
