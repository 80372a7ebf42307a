//! Learnify CLI
//!
//! Command-line interface for chart queries:
//! - Ask a running server
//! - Run a query locally against a CSV file
//! - List the field vocabulary
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use learnify_charts::api::dto::{ChartRequest, FieldsResponse};
use learnify_charts::config::generate_default_config;
use learnify_charts::query::{ChartPayload, QueryExecutor, QueryInterpreter};
use learnify_charts::store::MemoryStore;

#[derive(Parser)]
#[command(name = "learnify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask questions about student performance data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a running server
    Ask {
        /// Question, e.g. "average GPA by GradeClass"
        query: String,
        /// Maximum rows or groups
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Answer a question locally from a CSV file
    Run {
        /// Question, e.g. "students with age more than 17"
        query: String,
        /// Student CSV file
        #[arg(short, long)]
        data: PathBuf,
        /// Maximum rows or groups
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the field vocabulary
    Fields,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { query, limit } => {
            let client = reqwest::Client::new();
            let mut request = ChartRequest::new(query);
            request.limit = limit;

            let response = client
                .post(format!("{}/api/generate-chart", cli.api_url))
                .json(&request)
                .send()
                .await
                .with_context(|| format!("Cannot connect to Learnify API at {}", cli.api_url))?;

            if !response.status().is_success() {
                let status = response.status();
                let body: Value = response.json().await.unwrap_or_default();
                let message = body["error"]["message"].as_str().unwrap_or("unknown error");
                bail!("Query failed ({}): {}", status, message);
            }

            let payload: Value = response.json().await?;
            print_payload(&payload, &cli.format)?;
        }

        Commands::Run { query, data, limit } => {
            if !data.exists() {
                bail!("File not found: {:?}", data);
            }

            let store = MemoryStore::from_csv(&data)?;
            let executor = QueryExecutor::new(QueryInterpreter::standard()?, Arc::new(store));
            let payload: ChartPayload = executor.execute(&query, limit).await?;

            print_payload(&serde_json::to_value(&payload)?, &cli.format)?;
        }

        Commands::Fields => {
            let interpreter = QueryInterpreter::standard()?;
            let fields = FieldsResponse::from(interpreter.vocabulary().as_ref());

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                println!("{:<20} {}", "Alias", "Field");
                println!("{}", "-".repeat(40));
                for entry in &fields.fields {
                    println!("{:<20} {}", entry.alias, entry.field);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &config)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", config);
            }
        }
    }

    Ok(())
}

/// Print a chart payload as JSON or a two-column table
fn print_payload(payload: &Value, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(payload)?);
        return Ok(());
    }

    if payload["ok"] != Value::Bool(true) {
        println!("{}", payload["error"].as_str().unwrap_or("No data"));
        return Ok(());
    }

    if let Some(description) = payload["description"].as_str() {
        println!("{} ({} records)", description, payload["count"]);
    } else if let Some(metric) = payload["metric"].as_str() {
        match payload["grouping"].as_str() {
            Some(grouping) => println!("Average {} by {}", metric, grouping),
            None => println!("Average {}", metric),
        }
    }
    println!();

    println!("{:<20} {:>10}", "Label", "Value");
    println!("{}", "-".repeat(31));

    let empty = Vec::new();
    for point in payload["data"].as_array().unwrap_or(&empty) {
        println!(
            "{:<20} {:>10}",
            point["label"].as_str().unwrap_or("-"),
            point["value"]
        );
    }

    Ok(())
}
