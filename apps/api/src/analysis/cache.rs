//! Process-lifetime memo of analysis results, keyed by upload content.
//!
//! Keys are the SHA-256 of the exact upload bytes. Each key owns a
//! `tokio::sync::OnceCell`, so concurrent requests for the same resume await a
//! single in-flight computation (single-flight) and the work runs at most once.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::analysis::models::AnalysisResult;

type Slot = Arc<OnceCell<Arc<AnalysisResult>>>;

#[derive(Default)]
pub struct AnalysisCache {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Hex SHA-256 of the raw bytes. Unlike text hashing, no normalisation: one
/// changed byte is a different resume.
pub fn content_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `bytes`, running `compute` only if no
    /// result exists and no other caller is already computing it.
    pub async fn get_or_compute<F, Fut>(&self, bytes: &[u8], compute: F) -> Arc<AnalysisResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AnalysisResult>,
    {
        let key = content_key(bytes);
        let slot = self.lock().entry(key.clone()).or_default().clone();

        if let Some(hit) = slot.get() {
            debug!("Analysis cache hit for {key}");
            return hit.clone();
        }

        slot.get_or_init(|| async {
            debug!("Analysis cache miss for {key}, computing");
            Arc::new(compute().await)
        })
        .await
        .clone()
    }

    /// Drops every entry. In-flight computations still finish for their callers.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of completed results.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.initialized()).count()
    }

    // The map is only touched for short, non-panicking operations, so a
    // poisoned lock still holds a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
