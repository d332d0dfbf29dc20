//! agent-memory CLI: store and retrieve memories, record conversations, manage context and
//! triples, run retention. Config from env (.env supported) and optional CLI args.

use anyhow::Result;
use clap::Parser;
use memory_cli::{init_tracing, logger::DEFAULT_LOG_FILE, open_memory, run_command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_file = std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    init_tracing(&log_file)?;

    let cli = Cli::parse();
    let memory = open_memory(cli.database_url).await?;

    let output = run_command(&memory, cli.command).await;
    memory.store().close().await;

    println!("{}", serde_json::to_string_pretty(&output?)?);
    Ok(())
}
