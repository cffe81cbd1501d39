use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Offer;

/// One cached fetch result for a single storefront
///
/// Persisted as `{ "timestamp": "<RFC 3339>", "data": [ ... ] }` and
/// overwritten wholesale on every successful fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the offers were fetched
    pub timestamp: DateTime<Utc>,
    /// The offers as extracted from the storefront
    #[serde(rename = "data")]
    pub offers: Vec<Offer>,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            timestamp: Utc::now(),
            offers,
        }
    }

    /// Whether the snapshot is too old to reuse
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.timestamp >= max_age
    }
}
