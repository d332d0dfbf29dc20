//! Integration tests for the conversation, agent context and triple repositories.

use chrono::{Duration, Utc};
use memory_core::{Conversation, ContextMap, KnowledgeTriple};
use serde_json::json;
use storage::{ConversationRepository, RelationalStore, TripleQuery};

async fn open_store() -> RelationalStore {
    RelationalStore::open("sqlite::memory:")
        .await
        .expect("Failed to open store")
}

fn context(value: serde_json::Value) -> ContextMap {
    value.as_object().cloned().unwrap_or_default()
}

/// **Test: Session history is newest first and limited.**
#[tokio::test]
async fn test_conversation_history() {
    let store = open_store().await;
    let base = Utc::now();
    for i in 0..5 {
        let mut conv = Conversation::new("s1", "a1", format!("q{}", i), format!("r{}", i), ContextMap::new());
        conv.timestamp = base + Duration::seconds(i);
        ConversationRepository::insert_with(store.pool(), &conv).await.unwrap();
    }
    let other = Conversation::new("s2", "a1", "x", "y", ContextMap::new());
    ConversationRepository::insert_with(store.pool(), &other).await.unwrap();

    let history = store.conversations().list_by_session("s1", 3).await.unwrap();
    let messages: Vec<&str> = history.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["q4", "q3", "q2"]);
    assert_eq!(store.conversations().count().await.unwrap(), 6);
}

/// **Test: Conversation context round-trips.**
#[tokio::test]
async fn test_conversation_get() {
    let store = open_store().await;
    let conv = Conversation::new("s1", "a1", "hi", "hello", context(json!({"channel": "cli", "n": 2})));
    ConversationRepository::insert_with(store.pool(), &conv).await.unwrap();

    let found = store.conversations().get(&conv.id).await.unwrap().unwrap();
    assert_eq!(found.context, conv.context);
    assert!(store.conversations().get("missing").await.unwrap().is_none());
}

/// **Test: Agent context upsert replaces the previous snapshot.**
#[tokio::test]
async fn test_agent_context_upsert() {
    let store = open_store().await;
    assert!(store.contexts().get("a1").await.unwrap().is_none());

    let first_ids = vec!["m1".to_string(), "m2".to_string()];
    store
        .contexts()
        .upsert("a1", &context(json!({"task": "one"})), &first_ids, Utc::now())
        .await
        .unwrap();
    store
        .contexts()
        .upsert("a1", &context(json!({"task": "two"})), &["m3".to_string()], Utc::now())
        .await
        .unwrap();

    let snapshot = store.contexts().get("a1").await.unwrap().unwrap();
    assert_eq!(snapshot.current_context.get("task"), Some(&json!("two")));
    assert_eq!(snapshot.active_memory_ids, vec!["m3".to_string()]);
    assert!(snapshot.last_updated.is_some());

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agent_contexts")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

/// **Test: Re-asserting a triple overwrites confidence instead of duplicating.**
#[tokio::test]
async fn test_triple_upsert_last_write_wins() {
    let store = open_store().await;
    let first = KnowledgeTriple::new("sky", "has_color", "blue", 0.9, Some("m1".to_string()));
    let second = KnowledgeTriple::new("sky", "has_color", "blue", 0.4, Some("m2".to_string()));

    store.triples().upsert(&first).await.unwrap();
    store.triples().upsert(&second).await.unwrap();

    assert_eq!(store.triples().count().await.unwrap(), 1);
    let found = store.triples().get(&first.id).await.unwrap().unwrap();
    assert_eq!(found.confidence, 0.4);
    assert_eq!(found.source_memory_id.as_deref(), Some("m2"));
}

/// **Test: Triple query uses case-sensitive substring filters and confidence ordering.**
#[tokio::test]
async fn test_triple_query() {
    let store = open_store().await;
    for triple in [
        KnowledgeTriple::new("Alice", "likes", "coffee", 0.9, None),
        KnowledgeTriple::new("Alice", "likes", "tea", 0.6, None),
        KnowledgeTriple::new("alice", "likes", "juice", 0.95, None),
        KnowledgeTriple::new("Bob", "dislikes", "coffee", 0.5, None),
    ] {
        store.triples().upsert(&triple).await.unwrap();
    }

    let alice = store
        .triples()
        .query(&TripleQuery {
            subject: Some("Ali".to_string()),
            predicate: Some("like".to_string()),
            object: None,
            min_confidence: 0.6,
        })
        .await
        .unwrap();
    let objects: Vec<&str> = alice.iter().map(|t| t.object.as_str()).collect();
    assert_eq!(objects, vec!["coffee", "tea"]);

    let coffee = store
        .triples()
        .query(&TripleQuery {
            object: Some("coffee".to_string()),
            min_confidence: 0.5,
            ..TripleQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(coffee.len(), 2);
    assert_eq!(coffee[0].subject, "Alice");
    assert_eq!(coffee[1].subject, "Bob");
}

/// **Test: Deleting a triple.**
#[tokio::test]
async fn test_triple_delete() {
    let store = open_store().await;
    let triple = KnowledgeTriple::new("a", "b", "c", 0.5, None);
    store.triples().upsert(&triple).await.unwrap();
    assert!(store.triples().delete(&triple.id).await.unwrap());
    assert!(!store.triples().delete(&triple.id).await.unwrap());
}
