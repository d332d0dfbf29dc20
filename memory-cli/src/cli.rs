//! CLI parser.

use clap::{Parser, Subcommand};
use memory::{DEFAULT_MAX_AGE_DAYS, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_IMPORTANCE};

#[derive(Parser, Debug)]
#[command(name = "agent-memory")]
#[command(about = "Agent memory CLI: store, retrieve, converse, context, triples, cleanup", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Overrides MEMORY_DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a memory for an agent; prints its id.
    Store {
        #[arg(short, long)]
        agent: String,
        content: String,
        #[arg(short = 't', long, default_value = "fact")]
        memory_type: String,
        #[arg(short, long, default_value_t = memory_core::DEFAULT_IMPORTANCE)]
        importance: f64,
        /// Metadata as `key=value`; repeatable. `true`/`false` and numbers are typed.
        #[arg(short, long = "meta")]
        metadata: Vec<String>,
    },
    /// Retrieve the top memories of an agent for a query.
    Retrieve {
        #[arg(short, long)]
        agent: String,
        query: String,
        /// Defaults to the configured limit.
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(short = 't', long)]
        memory_type: Option<String>,
    },
    /// Record a message/response pair; prints the conversation id.
    Converse {
        #[arg(short, long)]
        session: String,
        #[arg(short, long)]
        agent: String,
        #[arg(short, long)]
        message: String,
        #[arg(short, long)]
        response: String,
        /// JSON object with the context of the exchange.
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Show recent conversations of a session, newest first.
    History {
        #[arg(short, long)]
        session: String,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Read or replace an agent's context snapshot.
    Context {
        #[command(subcommand)]
        command: ContextCommand,
    },
    /// Assert or query knowledge triples.
    Triple {
        #[command(subcommand)]
        command: TripleCommand,
    },
    /// Delete old, unimportant, rarely accessed memories once.
    Cleanup {
        #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS)]
        max_age_days: i64,
        #[arg(long, default_value_t = DEFAULT_MIN_IMPORTANCE)]
        min_importance: f64,
    },
    /// Run cleanup periodically until Ctrl-C.
    Sweep {
        #[arg(long, default_value = "3600")]
        interval_secs: u64,
        #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS)]
        max_age_days: i64,
        #[arg(long, default_value_t = DEFAULT_MIN_IMPORTANCE)]
        min_importance: f64,
    },
    /// Print store statistics.
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum ContextCommand {
    Get {
        #[arg(short, long)]
        agent: String,
    },
    Set {
        #[arg(short, long)]
        agent: String,
        /// JSON object replacing the current context.
        #[arg(short, long)]
        context: String,
        /// Active memory id; repeatable.
        #[arg(short = 'm', long = "memory-id")]
        active_memory_ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TripleCommand {
    Assert {
        subject: String,
        predicate: String,
        object: String,
        #[arg(short, long, default_value = "1.0")]
        confidence: f64,
        #[arg(long)]
        source_memory_id: Option<String>,
    },
    Query {
        #[arg(short, long)]
        subject: Option<String>,
        #[arg(short, long)]
        predicate: Option<String>,
        #[arg(short, long)]
        object: Option<String>,
        #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f64,
    },
    Delete {
        id: String,
    },
}
