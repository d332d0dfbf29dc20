//! Command handlers. Each returns the JSON value `main` prints.

use anyhow::{Context, Result};
use embedding::{EmbeddingConfig, EnvEmbeddingConfig};
use memory::{AgentMemory, CleanupReport, MemoryConfig, NewMemory};
use memory_core::{ContextMap, Metadata, MetadataValue};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

use crate::cli::{Commands, ContextCommand, TripleCommand};

/// Loads [`MemoryConfig`] and the embedding provider from env and opens the store.
/// `database_url` overrides MEMORY_DATABASE_URL.
pub async fn open_memory(database_url: Option<String>) -> Result<AgentMemory> {
    let mut config = MemoryConfig::from_env().context("Load memory config from env")?;
    if let Some(url) = database_url {
        config = config.with_database_url(url);
    }

    let embedding = EnvEmbeddingConfig::from_env()
        .context("Load embedding config from env (EMBEDDING_PROVIDER, EMBEDDING_DIM)")?;
    check_dimensions(&embedding, config.embedding_dim)?;
    let service = embedding.build_service()?;

    info!(
        database_url = %config.database_url,
        provider = embedding.provider(),
        "Opening agent memory"
    );
    Ok(AgentMemory::open(config, service).await?)
}

/// The provider must produce vectors of the length the store ranks with.
pub fn check_dimensions(embedding: &dyn EmbeddingConfig, memory_dim: usize) -> Result<()> {
    if embedding.dimension() != memory_dim {
        anyhow::bail!(
            "EMBEDDING_DIM ({}) does not match MEMORY_EMBEDDING_DIM ({})",
            embedding.dimension(),
            memory_dim
        );
    }
    Ok(())
}

pub async fn run_command(memory: &AgentMemory, command: Commands) -> Result<Value> {
    match command {
        Commands::Store {
            agent,
            content,
            memory_type,
            importance,
            metadata,
        } => {
            let mut new_memory = NewMemory::new(agent, content, memory_type).with_importance(importance);
            new_memory.metadata = parse_metadata(&metadata)?;
            let id = memory.store_memory(new_memory).await?;
            Ok(json!({ "id": id }))
        }
        Commands::Retrieve {
            agent,
            query,
            limit,
            memory_type,
        } => {
            let limit = limit.unwrap_or(memory.config().default_limit);
            let results = memory
                .retrieve_memories(&agent, &query, limit, memory_type.as_deref())
                .await?;
            Ok(serde_json::to_value(results)?)
        }
        Commands::Converse {
            session,
            agent,
            message,
            response,
            context,
        } => {
            let context = match context {
                Some(raw) => parse_context(&raw)?,
                None => ContextMap::new(),
            };
            let id = memory
                .store_conversation(&session, &agent, &message, &response, context)
                .await?;
            Ok(json!({ "id": id }))
        }
        Commands::History { session, limit } => {
            let history = memory.get_conversation_history(&session, limit).await?;
            Ok(serde_json::to_value(history)?)
        }
        Commands::Context { command } => match command {
            ContextCommand::Get { agent } => {
                Ok(serde_json::to_value(memory.get_agent_context(&agent).await?)?)
            }
            ContextCommand::Set {
                agent,
                context,
                active_memory_ids,
            } => {
                let context = parse_context(&context)?;
                let updated = memory
                    .update_agent_context(&agent, &context, &active_memory_ids)
                    .await?;
                Ok(json!({ "updated": updated }))
            }
        },
        Commands::Triple { command } => match command {
            TripleCommand::Assert {
                subject,
                predicate,
                object,
                confidence,
                source_memory_id,
            } => {
                let id = memory
                    .assert_triple(&subject, &predicate, &object, confidence, source_memory_id.as_deref())
                    .await?;
                Ok(json!({ "id": id }))
            }
            TripleCommand::Query {
                subject,
                predicate,
                object,
                min_confidence,
            } => {
                let triples = memory
                    .query_triples(
                        subject.as_deref(),
                        predicate.as_deref(),
                        object.as_deref(),
                        min_confidence,
                    )
                    .await?;
                Ok(serde_json::to_value(triples)?)
            }
            TripleCommand::Delete { id } => {
                memory.delete_triple(&id).await?;
                Ok(json!({ "deleted": id }))
            }
        },
        Commands::Cleanup {
            max_age_days,
            min_importance,
        } => {
            let report = memory.cleanup_report(max_age_days, min_importance).await?;
            Ok(serde_json::to_value(report)?)
        }
        Commands::Sweep {
            interval_secs,
            max_age_days,
            min_importance,
        } => {
            let total = run_sweep(memory, interval_secs, max_age_days, min_importance).await?;
            Ok(serde_json::to_value(total)?)
        }
        Commands::Stats => Ok(serde_json::to_value(memory.get_statistics().await?)?),
    }
}

/// Runs cleanup every `interval_secs` until Ctrl-C; returns the accumulated report.
/// A failed pass is logged and the loop continues.
async fn run_sweep(
    memory: &AgentMemory,
    interval_secs: u64,
    max_age_days: i64,
    min_importance: f64,
) -> Result<CleanupReport> {
    if interval_secs == 0 {
        anyhow::bail!("--interval-secs must be greater than zero");
    }
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    let mut total = CleanupReport::default();

    info!(interval_secs, max_age_days, min_importance, "Retention sweep loop started");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match memory.cleanup_report(max_age_days, min_importance).await {
                    Ok(report) => {
                        total.deleted += report.deleted;
                        total.skipped += report.skipped;
                        println!("{}", serde_json::to_string(&report)?);
                    }
                    Err(e) => error!("Retention sweep failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(deleted = total.deleted, "Retention sweep loop stopped");
                return Ok(total);
            }
        }
    }
}

/// Parses `key=value` pairs. `true`/`false` become bools, numbers become numbers.
pub fn parse_metadata(entries: &[String]) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    for entry in entries {
        let (key, raw) = entry
            .split_once('=')
            .with_context(|| format!("metadata entry '{}' is not key=value", entry))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("metadata entry '{}' has an empty key", entry);
        }
        let value = match raw {
            "true" => MetadataValue::Bool(true),
            "false" => MetadataValue::Bool(false),
            _ => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => MetadataValue::Number(n),
                _ => MetadataValue::from(raw),
            },
        };
        metadata.insert(key.to_string(), value);
    }
    Ok(metadata)
}

/// Parses a JSON object.
pub fn parse_context(raw: &str) -> Result<ContextMap> {
    match serde_json::from_str::<Value>(raw).context("context is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("context must be a JSON object, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_types_values() {
        let entries = vec![
            "source=chat".to_string(),
            "turn=3".to_string(),
            "verified=true".to_string(),
        ];
        let metadata = parse_metadata(&entries).unwrap();
        assert_eq!(metadata.get("source"), Some(&MetadataValue::from("chat")));
        assert_eq!(metadata.get("turn"), Some(&MetadataValue::Number(3.0)));
        assert_eq!(metadata.get("verified"), Some(&MetadataValue::Bool(true)));
    }

    #[test]
    fn test_parse_metadata_rejects_malformed() {
        assert!(parse_metadata(&["novalue".to_string()]).is_err());
        assert!(parse_metadata(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_check_dimensions() {
        let embedding = EnvEmbeddingConfig::default();
        assert!(check_dimensions(&embedding, 384).is_ok());
        assert!(check_dimensions(&embedding, 768).is_err());
    }

    #[test]
    fn test_parse_context() {
        let map = parse_context(r#"{"topic": "weather"}"#).unwrap();
        assert_eq!(map.get("topic"), Some(&json!("weather")));
        assert!(parse_context("[1, 2]").is_err());
        assert!(parse_context("not json").is_err());
    }
}
