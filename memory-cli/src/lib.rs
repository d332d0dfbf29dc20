//! # memory-cli
//!
//! Command-line front end over [`memory::AgentMemory`]: argument parsing, config loading,
//! logging setup and the command handlers. Results are printed to stdout as JSON.

pub mod cli;
pub mod commands;
pub mod logger;

pub use cli::{Cli, Commands, ContextCommand, TripleCommand};
pub use commands::{open_memory, run_command};
pub use logger::init_tracing;
