//! Column encodings: RFC 3339 timestamps, little-endian f32 BLOBs, JSON maps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Fixed-width UTC form so text ordering matches time ordering.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::Decode(format!("invalid timestamp '{}': {}", raw, e)))
}

pub(crate) fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub(crate) fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>, StorageError> {
    if blob.len() % 4 != 0 {
        return Err(StorageError::Decode(format!(
            "embedding blob length {} is not a multiple of 4",
            blob.len()
        )));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Decode(e.to_string()))
}

pub(crate) fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Decode(format!("invalid json: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_ordering_matches_text_ordering() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 11, 2, 3, 4, 5).unwrap();
        assert!(encode_timestamp(&early) < encode_timestamp(&late));
        assert_eq!(encode_timestamp(&early), "2024-01-02T03:04:05.000000Z");
        assert_eq!(decode_timestamp(&encode_timestamp(&late)).unwrap(), late);
    }

    #[test]
    fn test_decode_timestamp_rejects_garbage() {
        assert!(matches!(decode_timestamp("yesterday"), Err(StorageError::Decode(_))));
    }

    #[test]
    fn test_embedding_blob() {
        let v = vec![0.25f32, -1.5, 3.0];
        let blob = encode_embedding(&v);
        assert_eq!(blob.len(), 12);
        assert_eq!(decode_embedding(&blob).unwrap(), v);
        assert!(decode_embedding(&blob[..5]).is_err());
    }
}
