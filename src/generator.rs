//! Offline context generation.
//!
//! Connects to the database, analyzes its metadata, asks the
//! text-generation service to build the final agent prompt, and writes it to
//! a text file. Any failure to obtain a result aborts without writing the
//! file.

use crate::config::DbConfig;
use crate::db::ClientFactory;
use crate::error::{BridgeError, Result};
use crate::introspect::collect_context;
use crate::llm::prompt::instruction_for_prompt;
use crate::llm::LlmClient;
use std::path::Path;
use tracing::{info, warn};

/// Default output filename for the generated prompt context.
pub const DEFAULT_OUTPUT_FILE: &str = "mysql_context.txt";

/// Runs the full generation pipeline and writes the prompt file.
pub async fn generate_context(
    config: &DbConfig,
    factory: &dyn ClientFactory,
    llm: &dyn LlmClient,
    output_path: &Path,
    sample_limit: usize,
) -> Result<()> {
    config.validate()?;

    info!("Starting MySQL database analysis");
    let mut client = factory.connect(config).await?;
    info!("Connected to {}", config.display_string());

    let collected = collect_context(client.as_mut(), sample_limit).await;

    // Analysis is done with the connection either way.
    if let Err(e) = client.close().await {
        warn!("Failed to close connection: {e}");
    }

    let context = collected?;
    if context.schema.is_empty() {
        return Err(BridgeError::internal(
            "No tables found in the current database",
        ));
    }
    info!("Database analysis complete");

    let instruction = instruction_for_prompt(&context.to_markdown());

    info!("Requesting prompt generation (this may take a moment)");
    let final_prompt = llm.complete(&instruction).await?;

    std::fs::write(output_path, &final_prompt)
        .map_err(|e| BridgeError::io(format!("Error saving file: {e}")))?;

    info!("Prompt saved to {}", output_path.display());
    Ok(())
}
