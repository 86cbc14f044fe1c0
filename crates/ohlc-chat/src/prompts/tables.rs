//! Plain-text tables embedded in the prompt

use crate::data::PriceBar;
use crate::prompts::fmt2;
use crate::stats::YearlyStat;
use comfy_table::{Table, presets};

/// Yearly statistics, one row per year
pub fn yearly_table(stats: &[YearlyStat]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN).set_header(vec![
        "year",
        "days",
        "bullish",
        "mean return %",
        "std return %",
        "min return %",
        "max return %",
        "mean volume",
    ]);

    for stat in stats {
        table.add_row(vec![
            stat.year.to_string(),
            stat.day_count.to_string(),
            stat.bullish_count.to_string(),
            fmt2(stat.mean_return),
            fmt2(stat.std_return),
            fmt2(stat.min_return),
            fmt2(stat.max_return),
            format!("{:.2}", stat.mean_volume),
        ]);
    }

    table.to_string()
}

/// Raw bars with their derived flags
pub fn bars_table(bars: &[PriceBar]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN).set_header(vec![
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "support",
        "resistance",
        "direction",
        "bullish",
        "return %",
    ]);

    for bar in bars {
        table.add_row(vec![
            bar.date.to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            format!("{:.0}", bar.volume),
            levels(&bar.support_levels),
            levels(&bar.resistance_levels),
            bar.direction.clone().unwrap_or_default(),
            bar.is_bullish().to_string(),
            fmt2(bar.daily_return_percent()),
        ]);
    }

    table.to_string()
}

fn levels(values: &[f64]) -> String {
    let inner: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
    format!("[{}]", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_bars_table_row() {
        let mut bar = PriceBar::new(
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            100.0,
            111.0,
            99.0,
            110.0,
            1234.0,
        );
        bar.support_levels = vec![95.5, 90.0];
        bar.direction = Some("up".to_string());

        let table = bars_table(&[bar]);
        assert!(table.contains("2023-01-03"));
        assert!(table.contains("[95.50, 90.00]"));
        assert!(table.contains("10.00"));
        assert!(table.contains("true"));
        assert!(table.contains("up"));
    }

    #[test]
    fn test_yearly_table_missing_values() {
        let stat = YearlyStat {
            year: 2024,
            day_count: 1,
            bullish_count: 1,
            mean_return: Some(20.0),
            std_return: None,
            min_return: Some(20.0),
            max_return: Some(20.0),
            mean_volume: 500.0,
        };

        let table = yearly_table(&[stat]);
        assert!(table.contains("2024"));
        assert!(table.contains("n/a"));
        assert!(table.contains("500.00"));
    }
}
