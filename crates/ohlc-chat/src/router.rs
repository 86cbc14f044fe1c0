//! Question router deciding between a computed answer and model delegation
//!
//! Questions about bullish days are answered directly from the dataset;
//! everything else is handed to the language model with a statistical context.

use crate::stats::BullishStats;
use regex::Regex;
use std::sync::LazyLock;

/// First four-digit year starting with 20
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20[0-9]{2}").expect("year pattern is a valid regex"));

/// Keywords for the direct-answer path (matched against the lowercased question)
mod keywords {
    pub const BULLISH: &[&str] = &["bullish"];
    pub const DAY: &[&str] = &["day"];
}

/// Answer path chosen for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryIntent {
    /// Count bullish days, restricted to `year` when one was mentioned
    BullishDays { year: Option<i32> },
    /// Delegate to the language model
    General,
}

/// Two-branch router for user questions
#[derive(Debug, Clone, Default)]
pub struct IntentRouter;

impl IntentRouter {
    /// Create a new router
    pub fn new() -> Self {
        Self
    }

    /// Classify a question
    pub fn route(&self, question: &str) -> QueryIntent {
        let lowered = question.to_lowercase();

        let intent = if Self::matches_any(&lowered, keywords::BULLISH)
            && Self::matches_any(&lowered, keywords::DAY)
        {
            QueryIntent::BullishDays {
                year: self.extract_year(question),
            }
        } else {
            QueryIntent::General
        };

        tracing::debug!("Routed question to {:?}", intent);
        intent
    }

    /// First `20xx` token in the question, if any
    pub fn extract_year(&self, question: &str) -> Option<i32> {
        YEAR_PATTERN
            .find(question)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Check if the text contains any of the keywords
    fn matches_any(text: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| text.contains(kw))
    }
}

/// Templated sentence for the direct-answer path
pub fn direct_answer(symbol: &str, year: Option<i32>, stats: &BullishStats) -> String {
    let body = format!(
        "{} had {} bullish days out of {} trading days, representing {:.2}% of all trading days.",
        symbol, stats.bullish_count, stats.total_count, stats.bullish_percentage
    );

    match year {
        Some(year) => format!("In {year}, {body}"),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullish_question_with_year() {
        let router = IntentRouter::new();

        assert_eq!(
            router.route("How many bullish days in 2023?"),
            QueryIntent::BullishDays { year: Some(2023) }
        );
        assert_eq!(
            router.route("BULLISH DAYS during 2021 vs 2022"),
            QueryIntent::BullishDays { year: Some(2021) }
        );
    }

    #[test]
    fn test_bullish_question_without_year() {
        let router = IntentRouter::new();

        assert_eq!(
            router.route("Count the bullish days"),
            QueryIntent::BullishDays { year: None }
        );
        // "today" contains "day"
        assert_eq!(
            router.route("Is it bullish today?"),
            QueryIntent::BullishDays { year: None }
        );
    }

    #[test]
    fn test_general_questions() {
        let router = IntentRouter::new();

        assert_eq!(router.route("What's the trend?"), QueryIntent::General);
        assert_eq!(router.route("Was 2023 bullish?"), QueryIntent::General);
        assert_eq!(router.route("Best day in 2022?"), QueryIntent::General);
    }

    #[test]
    fn test_year_extraction() {
        let router = IntentRouter::new();

        assert_eq!(router.extract_year("in 2019 and 2020"), Some(2019));
        assert_eq!(router.extract_year("back in 1999"), None);
        assert_eq!(router.extract_year("no year here"), None);
    }

    #[test]
    fn test_direct_answer_wording() {
        let stats = BullishStats {
            bullish_count: 1,
            total_count: 2,
            bullish_percentage: 50.0,
        };

        assert_eq!(
            direct_answer("TSLA", Some(2023), &stats),
            "In 2023, TSLA had 1 bullish days out of 2 trading days, representing 50.00% of all trading days."
        );
        assert_eq!(
            direct_answer("TSLA", None, &stats),
            "TSLA had 1 bullish days out of 2 trading days, representing 50.00% of all trading days."
        );
    }
}
