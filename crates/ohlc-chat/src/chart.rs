//! Projection of price bars into the chart renderer's JSON schema

use crate::data::{Dataset, PriceBar};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Element id the chart component reads its data from
pub const CHART_DATA_ELEMENT_ID: &str = "chart-data";

/// One candle as consumed by the chart widget
///
/// Field names and nesting are fixed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Date label, `YYYY-MM-DD`
    pub timestamp: String,
    /// `[open, close, low, high]`
    pub ohlc: [f64; 4],
    pub volume: f64,
    /// First support level of the day
    pub support: Option<f64>,
    /// First resistance level of the day
    pub resistance: Option<f64>,
    pub direction: Option<String>,
}

impl ChartPoint {
    fn from_bar(bar: &PriceBar) -> Option<Self> {
        let first_finite = |levels: &[f64]| levels.first().copied().filter(|v| v.is_finite());

        bar.is_finite().then(|| Self {
            timestamp: bar.date.format("%Y-%m-%d").to_string(),
            ohlc: [bar.open, bar.close, bar.low, bar.high],
            volume: bar.volume,
            support: first_finite(&bar.support_levels),
            resistance: first_finite(&bar.resistance_levels),
            direction: bar.direction.clone(),
        })
    }
}

/// Map the dataset to chart points, preserving order
///
/// Bars carrying a non-finite price or volume cannot be represented in JSON
/// and are dropped with a warning.
pub fn project(dataset: &Dataset) -> Vec<ChartPoint> {
    dataset
        .bars()
        .iter()
        .filter_map(|bar| {
            let point = ChartPoint::from_bar(bar);
            if point.is_none() {
                warn!("Dropping bar {} from chart: non-finite value", bar.date);
            }
            point
        })
        .collect()
}

/// Serialize chart points to the JSON array embedded in the page
///
/// `<`, `>` and `&` are written as unicode escapes so the payload cannot
/// close or open markup when placed inside HTML.
pub fn to_chart_json(points: &[ChartPoint]) -> Result<String> {
    let json = serde_json::to_string(points)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Embed the chart data ahead of the external component's markup
pub fn render_page(points: &[ChartPoint], component_html: &str) -> Result<String> {
    let json = to_chart_json(points)?;
    Ok(format!(
        "<div id=\"{CHART_DATA_ELEMENT_ID}\" style=\"display: none;\">{json}</div>\n{component_html}"
    ))
}
