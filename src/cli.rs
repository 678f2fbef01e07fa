//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::generator::DEFAULT_OUTPUT_FILE;
use crate::introspect::DEFAULT_SAMPLE_ROWS;

/// A SQL tool bridge connecting LLM agents to MySQL.
#[derive(Parser, Debug)]
#[command(name = "mysql-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute one SQL statement and print the tool's JSON outcome
    Query {
        /// The complete SQL statement to execute verbatim
        #[arg(value_name = "SQL")]
        sql: String,

        /// Render the result set as a Markdown table instead of raw rows
        #[arg(long)]
        markdown: bool,
    },

    /// Introspect the database and generate the agent prompt file
    GenerateContext {
        /// Output file for the generated prompt
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Number of sample rows to fetch per table
        #[arg(long, value_name = "N", default_value_t = DEFAULT_SAMPLE_ROWS)]
        sample_rows: usize,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::parse_from(["mysql-bridge", "query", "SELECT 1", "--markdown"]);
        match cli.command {
            Command::Query { sql, markdown } => {
                assert_eq!(sql, "SELECT 1");
                assert!(markdown);
            }
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_generate_context_defaults() {
        let cli = Cli::parse_from(["mysql-bridge", "generate-context"]);
        match cli.command {
            Command::GenerateContext {
                output,
                sample_rows,
            } => {
                assert_eq!(output, PathBuf::from("mysql_context.txt"));
                assert_eq!(sample_rows, 3);
            }
            other => panic!("expected GenerateContext, got {other:?}"),
        }
    }
}
