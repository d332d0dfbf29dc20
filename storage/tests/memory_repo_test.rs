//! Integration tests for [`storage::MemoryRepository`] through [`storage::RelationalStore`].
//!
//! Covers insert/get/delete, agent and type scans, access bookkeeping, sweep candidates,
//! counts, and durability across a reopen of a file-backed database.

use chrono::{Duration, Utc};
use memory_core::{Memory, Metadata, MetadataValue};
use storage::RelationalStore;

async fn open_store() -> RelationalStore {
    RelationalStore::open("sqlite::memory:")
        .await
        .expect("Failed to open store")
}

fn memory(agent_id: &str, content: &str, memory_type: &str, importance: f64) -> Memory {
    Memory::new(agent_id, content, memory_type, importance, vec![0.5; 4], Metadata::new())
}

/// **Test: Insert then get returns the same memory.**
///
/// **Setup:** In-memory DB; memory with metadata.
/// **Action:** `insert`, then `get(id)`.
/// **Expected:** All fields round-trip including embedding and metadata.
#[tokio::test]
async fn test_insert_and_get() {
    let store = open_store().await;
    let mut m = memory("a1", "The sky is blue", "fact", 0.5);
    m.metadata.insert("source".to_string(), MetadataValue::from("chat"));
    m.metadata.insert("turn".to_string(), MetadataValue::from(3i64));

    store.memories().insert(&m).await.expect("Failed to insert");

    let found = store
        .memories()
        .get(&m.id)
        .await
        .expect("Failed to get")
        .expect("Memory missing");
    assert_eq!(found.content, "The sky is blue");
    assert_eq!(found.embedding, vec![0.5; 4]);
    assert_eq!(found.metadata, m.metadata);
    assert_eq!(found.access_count, 0);
    assert_eq!(
        found.created_at.timestamp_micros(),
        m.created_at.timestamp_micros()
    );
}

/// **Test: Get by unknown id.**
///
/// **Expected:** Returns `None`, not an error.
#[tokio::test]
async fn test_get_not_found() {
    let store = open_store().await;
    let found = store.memories().get("missing").await.expect("Failed to query");
    assert!(found.is_none());
}

/// **Test: Duplicate id is rejected.**
#[tokio::test]
async fn test_duplicate_insert_fails() {
    let store = open_store().await;
    let m = memory("a1", "x", "fact", 0.5);
    store.memories().insert(&m).await.unwrap();
    assert!(store.memories().insert(&m).await.is_err());
}

/// **Test: Delete reports whether a row existed.**
#[tokio::test]
async fn test_delete() {
    let store = open_store().await;
    let m = memory("a1", "x", "fact", 0.5);
    store.memories().insert(&m).await.unwrap();

    assert!(store.memories().delete(&m.id).await.unwrap());
    assert!(!store.memories().delete(&m.id).await.unwrap());
    assert!(store.memories().get(&m.id).await.unwrap().is_none());
}

/// **Test: Agent scan filters by agent and optional type, in insertion order.**
#[tokio::test]
async fn test_list_by_agent() {
    let store = open_store().await;
    let first = memory("a1", "first", "fact", 0.5);
    let second = memory("a1", "second", "conversation", 0.7);
    let other = memory("a2", "other", "fact", 0.5);
    for m in [&first, &second, &other] {
        store.memories().insert(m).await.unwrap();
    }

    let all = store.memories().list_by_agent("a1", None).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);

    let facts = store.memories().list_by_agent("a1", Some("fact")).await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].content, "first");

    assert!(store.memories().list_by_agent("nobody", None).await.unwrap().is_empty());
}

/// **Test: Recording an access bumps the counter and timestamp.**
#[tokio::test]
async fn test_record_access() {
    let store = open_store().await;
    let m = memory("a1", "x", "fact", 0.5);
    store.memories().insert(&m).await.unwrap();

    let at = Utc::now() + Duration::seconds(10);
    assert!(store.memories().record_access(&m.id, at).await.unwrap());
    assert!(store.memories().record_access(&m.id, at).await.unwrap());

    let found = store.memories().get(&m.id).await.unwrap().unwrap();
    assert_eq!(found.access_count, 2);
    assert_eq!(found.last_accessed_at.timestamp_micros(), at.timestamp_micros());

    assert!(!store.memories().record_access("missing", at).await.unwrap());
}

/// **Test: Sweep candidates honour the importance and access bounds.**
#[tokio::test]
async fn test_sweep_candidates_and_delete_many() {
    let store = open_store().await;
    let low = memory("a1", "low", "fact", 0.1);
    let high = memory("a1", "high", "fact", 0.9);
    let popular = memory("a1", "popular", "fact", 0.1);
    for m in [&low, &high, &popular] {
        store.memories().insert(m).await.unwrap();
    }
    for _ in 0..5 {
        store.memories().record_access(&popular.id, Utc::now()).await.unwrap();
    }

    let candidates = store.memories().sweep_candidates(0.3, 5).await.unwrap();
    let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec![low.id.clone()]);

    let deleted = store
        .memories()
        .delete_many(&[low.id.clone(), popular.id.clone()], 5)
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(store.memories().count().await.unwrap(), 2);
}

/// **Test: Per-agent and per-type counts.**
#[tokio::test]
async fn test_counts() {
    let store = open_store().await;
    for m in [
        memory("a1", "x", "fact", 0.5),
        memory("a1", "y", "conversation", 0.7),
        memory("a2", "z", "fact", 0.5),
    ] {
        store.memories().insert(&m).await.unwrap();
    }

    assert_eq!(store.memories().count().await.unwrap(), 3);
    assert_eq!(
        store.memories().count_by_agent().await.unwrap(),
        vec![("a1".to_string(), 2), ("a2".to_string(), 1)]
    );
    assert_eq!(
        store.memories().count_by_type().await.unwrap(),
        vec![("conversation".to_string(), 1), ("fact".to_string(), 2)]
    );
}

/// **Test: Data survives closing and reopening a file database.**
///
/// **Setup:** Temporary directory; file-backed store.
/// **Action:** Insert, close, reopen the same path.
/// **Expected:** The memory is still present.
#[tokio::test]
async fn test_persists_across_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("memory.db");
    let path = db_path.to_str().unwrap().to_string();

    let m = memory("a1", "durable", "fact", 0.5);
    {
        let store = RelationalStore::open(&path).await.unwrap();
        store.memories().insert(&m).await.unwrap();
        store.close().await;
    }

    let reopened = RelationalStore::open(&path).await.unwrap();
    let found = reopened.memories().get(&m.id).await.unwrap();
    assert_eq!(found.map(|f| f.content), Some("durable".to_string()));
}
