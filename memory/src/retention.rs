//! # Retention Sweeper
//!
//! Deletes memories that are simultaneously old, unimportant and rarely accessed:
//!
//! ```text
//! created_at < now - max_age_days  AND  importance < min_importance  AND  access_count < threshold
//! ```
//!
//! The access clause is a hard override: a frequently retrieved memory survives regardless of
//! age or importance. Rows whose timestamp cannot be parsed are skipped and counted.

use chrono::{Duration, Utc};
use memory_core::{MemoryError, Result};
use serde::{Deserialize, Serialize};
use storage::RelationalStore;
use tracing::{info, instrument, warn};

pub const DEFAULT_MAX_AGE_DAYS: i64 = 90;
pub const DEFAULT_MIN_IMPORTANCE: f64 = 0.3;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub deleted: u64,
    /// Candidate rows left in place because they could not be read.
    pub skipped: u64,
}

#[derive(Clone)]
pub struct RetentionSweeper {
    store: RelationalStore,
    access_threshold: u32,
}

impl RetentionSweeper {
    pub fn new(store: RelationalStore, access_threshold: u32) -> Self {
        Self {
            store,
            access_threshold,
        }
    }

    #[instrument(skip(self))]
    pub async fn sweep(&self, max_age_days: i64, min_importance: f64) -> Result<CleanupReport> {
        if max_age_days < 0 {
            return Err(MemoryError::validation(format!(
                "max_age_days must not be negative, got {}",
                max_age_days
            )));
        }
        if !min_importance.is_finite() {
            return Err(MemoryError::validation("min_importance must be finite"));
        }

        let cutoff = Duration::try_days(max_age_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| MemoryError::validation("max_age_days is out of range"))?;
        let threshold = i64::from(self.access_threshold);
        let candidates = self
            .store
            .memories()
            .sweep_candidates(min_importance, threshold)
            .await?;

        let mut expired = Vec::new();
        let mut skipped = 0;
        for candidate in candidates {
            match candidate.created_at() {
                Ok(created_at) if created_at < cutoff => expired.push(candidate.id),
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping memory {} during sweep: {}", candidate.id, e);
                    skipped += 1;
                }
            }
        }

        let deleted = self.store.memories().delete_many(&expired, threshold).await?;

        info!(deleted, skipped, max_age_days, min_importance, "Retention sweep finished");
        Ok(CleanupReport { deleted, skipped })
    }
}
