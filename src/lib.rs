pub mod cache;
pub mod config;
pub mod dispatch;
pub mod fetch;
pub mod format;
pub mod models;
pub mod pipeline;

pub use cache::{CacheError, Snapshot, SnapshotStore};
pub use config::{AppConfig, ConfigError, SourceConfig};
pub use dispatch::{Dispatcher, Invocation};
pub use fetch::{EpicGamesClient, HeadlessRenderer, OfferSource, PrimeGamingClient, Renderer};
pub use models::{Embed, EmbedField, MessageStyle, Offer, Reply, SourceId};
pub use pipeline::FreshnessPolicy;
