//! Question-answering facade over one immutable dataset
//!
//! Each question is handled start to finish: route it, then either compute
//! the bullish-day sentence locally or synthesize a context and ask the model.
//! Every outcome is a string; failures come back as `Error: ...`.

use crate::answer::AnswerClient;
use crate::config::ChatConfig;
use crate::data::Dataset;
use crate::error::Result;
use crate::prompts::PromptSynthesizer;
use crate::router::{IntentRouter, QueryIntent, direct_answer};
use crate::stats::bullish_day_stats;
use std::sync::Arc;
use tracing::{error, info};

/// Stock chatbot answering one question at a time
#[derive(Debug)]
pub struct StockChatbot {
    dataset: Arc<Dataset>,
    router: IntentRouter,
    synthesizer: PromptSynthesizer,
    client: AnswerClient,
    symbol: String,
}

impl StockChatbot {
    /// Create a chatbot over `dataset`
    pub fn new(dataset: Arc<Dataset>, client: AnswerClient, config: &ChatConfig) -> Result<Self> {
        Ok(Self {
            dataset,
            router: IntentRouter::new(),
            synthesizer: PromptSynthesizer::from_config(config)?,
            client,
            symbol: config.symbol.clone(),
        })
    }

    /// The dataset questions are answered from
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Answer a question
    pub async fn ask(&self, question: &str) -> String {
        let intent = self.router.route(question);
        info!("Answering question via {:?}", intent);

        match intent {
            QueryIntent::BullishDays { year } => {
                let stats = bullish_day_stats(&self.dataset, year);
                direct_answer(&self.symbol, year, &stats)
            }
            QueryIntent::General => match self.synthesizer.synthesize(question, &self.dataset) {
                Ok(prompt) => self.client.answer(&prompt).await,
                Err(e) => {
                    error!("Failed to build prompt: {}", e);
                    format!("Error: {e}")
                }
            },
        }
    }
}
