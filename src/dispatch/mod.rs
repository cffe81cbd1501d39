//! Maps chat commands onto the fetch/cache/format pipeline.

use chrono::Duration;
use tracing::{error, info};

use crate::cache::SnapshotStore;
use crate::config::AppConfig;
use crate::fetch::OfferSource;
use crate::format;
use crate::models::{MessageStyle, Reply, SourceId};
use crate::pipeline::FreshnessPolicy;

/// Trailing modifier that forces a refresh, as in `"!prime fetch"`
pub const FORCE_SUFFIX: &str = " fetch";

/// Reply used when the pipeline comes back empty
pub const NO_CONTENT_NOTICE: &str = "Could not find any content. Please try again later";

const FAILURE_NOTICE: &str =
    "Something went wrong while checking the storefront. Please try again later";

/// One resolved chat command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub source: SourceId,
    pub style: MessageStyle,
    pub force: bool,
}

/// Resolves command text and runs the pipeline for it
///
/// Configuration and the snapshot store are passed in once at construction;
/// fetchers are passed per call so the chat transport decides when a
/// browser is worth launching
pub struct Dispatcher {
    config: AppConfig,
    store: SnapshotStore,
    policy: FreshnessPolicy,
}

impl Dispatcher {
    pub fn new(config: AppConfig, store: SnapshotStore) -> Self {
        let policy = FreshnessPolicy::new(Duration::hours(config.cache_max_age_hours as i64));
        Self {
            config,
            store,
            policy,
        }
    }

    /// Match incoming message text against the configured commands
    ///
    /// Unknown text is `None`; the transport ignores the message
    pub fn dispatch(&self, text: &str) -> Option<Invocation> {
        for source in [SourceId::Epic, SourceId::Prime] {
            let command = &self.config.source(source).command;
            let style = self.config.style(source);

            if text == command {
                return Some(Invocation {
                    source,
                    style,
                    force: false,
                });
            }
            if text.strip_prefix(command.as_str()) == Some(FORCE_SUFFIX) {
                return Some(Invocation {
                    source,
                    style,
                    force: true,
                });
            }
        }
        None
    }

    /// Run the pipeline for one invocation and shape the outcome as a reply
    ///
    /// Failures never escape: they become a notice for the user, so one
    /// bad invocation cannot affect the next
    pub async fn handle(&self, invocation: Invocation, fetcher: &dyn OfferSource) -> Reply {
        info!(source = %invocation.source, force = invocation.force, "handling command");

        let offers = match self
            .policy
            .current_offers(invocation.source, fetcher, &self.store, invocation.force)
            .await
        {
            Ok(offers) => offers,
            Err(e) => {
                error!(source = %invocation.source, "pipeline failed: {e:#}");
                return Reply::Notice(FAILURE_NOTICE.to_string());
            }
        };

        if offers.is_empty() {
            info!(source = %invocation.source, "no offers found");
            return Reply::Notice(NO_CONTENT_NOTICE.to_string());
        }

        let embeds = format::render(
            invocation.style,
            &invocation.source.storefront(),
            &offers,
            self.config.allow_list(invocation.source),
            &mut rand::thread_rng(),
        );

        if embeds.is_empty() {
            // Everything was filtered away by the allow-list
            return Reply::Notice(NO_CONTENT_NOTICE.to_string());
        }

        Reply::Embeds(embeds)
    }
}
