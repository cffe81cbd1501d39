mod epic;
mod prime;
mod render;

pub use epic::EpicGamesClient;
pub use prime::PrimeGamingClient;
pub use render::{HeadlessRenderer, RenderError, Renderer};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Offer;

/// A storefront that can be asked for its current free offers
///
/// Implementations perform network I/O only. Recoverable upstream failures
/// (non-success status, elements missing expected fields) surface as an
/// empty or shortened list rather than an error; only infrastructure
/// failures (browser launch, malformed response body) propagate.
#[async_trait]
pub trait OfferSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Offer>>;
}
