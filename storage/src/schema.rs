//! Table definitions. Applied idempotently every time a store is opened.

use sqlx::SqlitePool;
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS memories (
        id TEXT PRIMARY KEY,
        agent_id TEXT NOT NULL,
        content TEXT NOT NULL,
        memory_type TEXT NOT NULL,
        importance REAL NOT NULL DEFAULT 0.5,
        embedding BLOB NOT NULL,
        metadata TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL,
        last_accessed_at TEXT NOT NULL,
        access_count INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_memories_agent_id ON memories(agent_id)",
    "CREATE INDEX IF NOT EXISTS idx_memories_memory_type ON memories(memory_type)",
    "CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id TEXT PRIMARY KEY,
        session_id TEXT NOT NULL,
        agent_id TEXT NOT NULL,
        message TEXT NOT NULL,
        response TEXT NOT NULL,
        context TEXT NOT NULL DEFAULT '{}',
        timestamp TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_conversations_session_id ON conversations(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_conversations_agent_id ON conversations(agent_id)",
    r#"
    CREATE TABLE IF NOT EXISTS agent_contexts (
        agent_id TEXT PRIMARY KEY,
        current_context TEXT NOT NULL DEFAULT '{}',
        active_memory_ids TEXT NOT NULL DEFAULT '[]',
        last_updated TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS knowledge_triples (
        id TEXT PRIMARY KEY,
        subject TEXT NOT NULL,
        predicate TEXT NOT NULL,
        object TEXT NOT NULL,
        confidence REAL NOT NULL,
        source_memory_id TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_triples_subject ON knowledge_triples(subject)",
    "CREATE INDEX IF NOT EXISTS idx_triples_predicate ON knowledge_triples(predicate)",
];

pub(crate) async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database tables created successfully");
    Ok(())
}
