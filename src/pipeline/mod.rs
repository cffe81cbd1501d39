//! The cache-or-fetch decision shared by every storefront.

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::cache::{Snapshot, SnapshotStore};
use crate::fetch::OfferSource;
use crate::models::{Offer, SourceId};

/// Decides whether cached offers are still usable or the storefront must
/// be asked again
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    max_age: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::days(1),
        }
    }
}

impl FreshnessPolicy {
    /// Create a policy with a custom staleness window
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Current offers for `source`, from cache when it is fresh
    ///
    /// Decision order: forced refresh, then missing/corrupt/empty cache,
    /// then age. A fetch result is persisted only when non-empty; an empty
    /// fetch leaves any previous snapshot on disk untouched and still
    /// returns the empty list for this call.
    pub async fn current_offers(
        &self,
        source: SourceId,
        fetcher: &dyn OfferSource,
        store: &SnapshotStore,
        force: bool,
    ) -> Result<Vec<Offer>> {
        if force {
            info!(%source, "forced refresh requested");
            return self.fetch_and_store(source, fetcher, store).await;
        }

        let snapshot = match store.load(source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%source, "unusable cache, refetching: {e}");
                None
            }
        };

        match snapshot {
            Some(snapshot) if snapshot.offers.is_empty() => {
                debug!(%source, "cached snapshot is empty, refetching");
                self.fetch_and_store(source, fetcher, store).await
            }
            Some(snapshot) if snapshot.is_stale(Utc::now(), self.max_age) => {
                info!(%source, "cached snapshot is stale, refetching");
                self.fetch_and_store(source, fetcher, store).await
            }
            Some(snapshot) => {
                debug!(%source, offers = snapshot.offers.len(), "using cached snapshot");
                Ok(snapshot.offers)
            }
            None => self.fetch_and_store(source, fetcher, store).await,
        }
    }

    async fn fetch_and_store(
        &self,
        source: SourceId,
        fetcher: &dyn OfferSource,
        store: &SnapshotStore,
    ) -> Result<Vec<Offer>> {
        let offers = fetcher.fetch().await?;

        if offers.is_empty() {
            info!(%source, "fetch returned no offers, keeping previous snapshot");
            return Ok(offers);
        }

        info!(%source, offers = offers.len(), "fetched fresh offers");
        store.save(source, &Snapshot::new(offers.clone()))?;
        Ok(offers)
    }
}
