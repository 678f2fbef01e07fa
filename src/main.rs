//! mysql-bridge - a SQL tool bridge connecting LLM agents to MySQL.

mod cli;
mod config;
mod db;
mod error;
mod generator;
mod introspect;
mod llm;
mod render;
mod tool;

use cli::{Cli, Command};
use config::{DbConfig, LlmConfig};
use db::MySqlFactory;
use error::Result;
use llm::GeminiClient;
use render::RenderMode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Pick up a .env file before reading any configuration
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let db_config = DbConfig::from_env()?;

    match cli.command {
        Command::Query { sql, markdown } => {
            let mode = if markdown {
                RenderMode::Markdown
            } else {
                RenderMode::Raw
            };
            let outcome = tool::execute(&db_config, &MySqlFactory, &sql, mode).await;
            println!("{:#}", outcome.to_json());
        }
        Command::GenerateContext {
            output,
            sample_rows,
        } => {
            let llm_config = LlmConfig::from_env();
            let client = GeminiClient::from_config(&llm_config)?;
            generator::generate_context(&db_config, &MySqlFactory, &client, &output, sample_rows)
                .await?;
        }
    }

    Ok(())
}
