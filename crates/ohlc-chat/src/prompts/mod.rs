//! Prompt context synthesis for model-delegated questions
//!
//! The context is a single text block: overall statistics, the yearly table,
//! head and tail samples of the dataset, the question and a closing
//! instruction. Only the head/tail sampling bounds its size; long histories
//! still grow the yearly table by one row per year.

mod tables;

pub use tables::{bars_table, yearly_table};

use crate::config::ChatConfig;
use crate::data::Dataset;
use crate::error::{ChatError, Result};
use crate::stats::{overall_stats, yearly_stats};
use minijinja::{Environment, UndefinedBehavior};
use serde_json::json;

/// Registered name of the context template
pub const CONTEXT_TEMPLATE: &str = "stock.context";

/// Closing instruction appended after the question
pub const CLOSING_INSTRUCTION: &str =
    "Please analyze the data and provide a detailed answer based on the statistics and trends shown above.";

const CONTEXT_SOURCE: &str = r"{{ symbol }} Stock Data Analysis:

Overall Statistics:
- Total trading days: {{ overall.total_days }}
- Total bullish days: {{ overall.total_bullish }}
- Bullish percentage: {{ overall.bullish_percentage }}%
- Average daily return: {{ overall.mean_return }}%
- Highest price: ${{ overall.max_high }}
- Lowest price: ${{ overall.min_low }}

Yearly Statistics:
{{ yearly_table }}

Sample Data (First {{ sample_rows }} and Last {{ sample_rows }} days):
{{ head_table }}
...
{{ tail_table }}

Question: {{ question }}

{{ closing }}";

/// Builds the text context sent to the model
pub struct PromptSynthesizer {
    env: Environment<'static>,
    symbol: String,
    sample_rows: usize,
}

impl PromptSynthesizer {
    /// Create a synthesizer for `symbol`, sampling `sample_rows` bars from each end
    pub fn new(symbol: impl Into<String>, sample_rows: usize) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(CONTEXT_TEMPLATE, CONTEXT_SOURCE)
            .map_err(|e| render_error(&e))?;

        Ok(Self {
            env,
            symbol: symbol.into(),
            sample_rows,
        })
    }

    /// Create a synthesizer from the chatbot configuration
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        Self::new(config.symbol.clone(), config.sample_rows)
    }

    /// Render the full context for `question`
    pub fn synthesize(&self, question: &str, dataset: &Dataset) -> Result<String> {
        let overall = overall_stats(dataset);

        let vars = json!({
            "symbol": self.symbol,
            "overall": {
                "total_days": overall.total_days,
                "total_bullish": overall.total_bullish,
                "bullish_percentage": format!("{:.2}", overall.bullish_percentage),
                "mean_return": fmt2(overall.mean_daily_return_percent),
                "max_high": fmt2(overall.max_high),
                "min_low": fmt2(overall.min_low),
            },
            "yearly_table": yearly_table(&yearly_stats(dataset)),
            "sample_rows": self.sample_rows,
            "head_table": bars_table(dataset.head(self.sample_rows)),
            "tail_table": bars_table(dataset.tail(self.sample_rows)),
            "question": question,
            "closing": CLOSING_INSTRUCTION,
        });

        let template = self
            .env
            .get_template(CONTEXT_TEMPLATE)
            .map_err(|e| render_error(&e))?;
        let prompt = template.render(vars).map_err(|e| render_error(&e))?;

        tracing::debug!(
            "Synthesized prompt: {} chars for {} bars",
            prompt.len(),
            dataset.len()
        );
        Ok(prompt)
    }
}

impl std::fmt::Debug for PromptSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSynthesizer")
            .field("symbol", &self.symbol)
            .field("sample_rows", &self.sample_rows)
            .finish_non_exhaustive()
    }
}

/// Two-decimal rendering with `n/a` for missing values
pub(crate) fn fmt2(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn render_error(err: &minijinja::Error) -> ChatError {
    ChatError::PromptRender {
        name: CONTEXT_TEMPLATE.to_string(),
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use chrono::NaiveDate;

    fn dataset(days: u32) -> Dataset {
        let bars = (1..=days)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2023, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(u64::from(d) * 30))
                    .unwrap();
                let open = 100.0 + f64::from(d);
                PriceBar::new(date, open, open + 5.0, open - 5.0, open + 1.0, 1_000.0)
            })
            .collect();
        Dataset::new(bars)
    }

    #[test]
    fn test_context_sections_in_order() {
        let synth = PromptSynthesizer::new("TSLA", 5).unwrap();
        let prompt = synth.synthesize("What's the trend?", &dataset(20)).unwrap();

        let sections = [
            "TSLA Stock Data Analysis:",
            "Overall Statistics:",
            "- Total trading days: 20",
            "- Total bullish days: 20",
            "- Bullish percentage: 100.00%",
            "- Highest price: $125.00",
            "- Lowest price: $96.00",
            "Yearly Statistics:",
            "Sample Data (First 5 and Last 5 days):",
            "\n...\n",
            "Question: What's the trend?",
            CLOSING_INSTRUCTION,
        ];
        let mut cursor = 0;
        for section in sections {
            let found = prompt[cursor..]
                .find(section)
                .unwrap_or_else(|| panic!("missing or out of order: {section}"));
            cursor += found + section.len();
        }
        assert!(prompt.ends_with(CLOSING_INSTRUCTION));
    }

    #[test]
    fn test_yearly_table_lists_every_year() {
        let synth = PromptSynthesizer::new("TSLA", 5).unwrap();
        let prompt = synth.synthesize("trend?", &dataset(20)).unwrap();

        // 20 bars 30 days apart starting 2023-01-31 span 2023 and 2024
        assert!(prompt.contains("| 2023 "));
        assert!(prompt.contains("| 2024 "));
    }

    #[test]
    fn test_head_and_tail_sampling() {
        let synth = PromptSynthesizer::new("TSLA", 2).unwrap();
        let ds = dataset(10);
        let prompt = synth.synthesize("q", &ds).unwrap();

        let first = ds.bars()[0].date.to_string();
        let middle = ds.bars()[4].date.to_string();
        let last = ds.bars()[9].date.to_string();
        assert!(prompt.contains(&first));
        assert!(prompt.contains(&last));
        assert!(!prompt.contains(&middle));
    }

    #[test]
    fn test_empty_dataset_renders() {
        let synth = PromptSynthesizer::new("TSLA", 5).unwrap();
        let prompt = synth.synthesize("anything?", &Dataset::default()).unwrap();

        assert!(prompt.contains("- Total trading days: 0"));
        assert!(prompt.contains("- Bullish percentage: 0.00%"));
        assert!(prompt.contains("- Average daily return: n/a%"));
        assert!(prompt.contains("- Highest price: $n/a"));
    }

    #[test]
    fn test_question_is_not_template_evaluated() {
        let synth = PromptSynthesizer::new("TSLA", 1).unwrap();
        let prompt = synth.synthesize("What is {{ symbol }}?", &dataset(3)).unwrap();
        assert!(prompt.contains("Question: What is {{ symbol }}?"));
    }
}
