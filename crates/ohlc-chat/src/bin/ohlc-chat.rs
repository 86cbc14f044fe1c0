//! OHLCV chart and chatbot CLI
//!
//! # Usage
//!
//! ```bash
//! # Chart payload (or a full page when a component file is given)
//! cargo run --bin ohlc-chat -- --data data/tsla.csv chart --out chart.json
//!
//! # Questions need a Gemini key
//! export GOOGLE_API_KEY="..."
//! cargo run --bin ohlc-chat -- ask "How many bullish days in 2023?"
//! cargo run --bin ohlc-chat -- chat
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use ohlc_chat::{AnswerClient, ChatConfig, Dataset, StockChatbot, chart, data};
use ohlc_llm::providers::{GeminiConfig, GeminiProvider};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ohlc-chat")]
#[command(about = "Chart data and Q&A for a single stock's daily history", long_about = None)]
struct Cli {
    /// OHLCV CSV file (default: $OHLC_DATA_PATH or data/tsla.csv)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the chart JSON payload
    Chart {
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Chart component markup to embed the payload in front of
        #[arg(short, long)]
        component: Option<PathBuf>,
    },
    /// Answer a single question
    Ask {
        /// The question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Answer questions line by line until `exit` or EOF
    Chat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    ohlc_utils::init_tracing("warn,ohlc_chat=info");

    let cli = Cli::parse();

    let mut builder = ChatConfig::builder().with_env();
    if let Some(path) = cli.data {
        builder = builder.data_path(path);
    }
    let config = builder.build()?;

    let loaded = data::load_path(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    let dataset = Arc::new(loaded.dataset);

    match cli.command {
        Command::Chart { out, component } => write_chart(&dataset, out, component),
        Command::Ask { question } => {
            let bot = build_chatbot(dataset, &config)?;
            println!("{}", bot.ask(&question.join(" ")).await);
            Ok(())
        }
        Command::Chat => {
            let bot = build_chatbot(dataset, &config)?;
            run_repl(&bot, &config.symbol).await
        }
    }
}

fn write_chart(
    dataset: &Dataset,
    out: Option<PathBuf>,
    component: Option<PathBuf>,
) -> anyhow::Result<()> {
    let points = chart::project(dataset);

    let payload = match component {
        Some(path) => {
            let markup = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            chart::render_page(&points, &markup)?
        }
        None => chart::to_chart_json(&points)?,
    };

    match out {
        Some(path) => {
            std::fs::write(&path, payload)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {} chart points to {}", points.len(), path.display());
        }
        None => println!("{payload}"),
    }
    Ok(())
}

fn build_chatbot(dataset: Arc<Dataset>, config: &ChatConfig) -> anyhow::Result<StockChatbot> {
    // The credential is read once here and injected into the provider
    let provider = Arc::new(GeminiProvider::with_config(GeminiConfig::from_env()?)?);
    let client = AnswerClient::from_config(provider, config);
    Ok(StockChatbot::new(dataset, client, config)?)
}

async fn run_repl(bot: &StockChatbot, symbol: &str) -> anyhow::Result<()> {
    println!(
        "{symbol} chatbot - {} trading days loaded. Ask a question, or type `exit` to quit.\n",
        bot.dataset().len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!(">>> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit" | "/exit") {
            println!("Goodbye!");
            break;
        }

        println!("{}\n", bot.ask(input).await);
    }

    Ok(())
}
