use serde::{Deserialize, Serialize};

/// A storefront listing currently priced at zero that a user can claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Display title of the listing
    pub title: String,
    /// Per-source detail: a `DD.MM.YYYY` expiry date for Epic Games,
    /// a claim link for Prime Gaming
    pub detail: String,
    /// Promotional artwork for the listing
    pub image_url: String,
}

impl Offer {
    pub fn new(title: impl Into<String>, detail: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            image_url: image_url.into(),
        }
    }

    /// Base game name used for allow-list matching: the title up to its
    /// first colon, or the whole title when no colon is present
    pub fn base_name(&self) -> &str {
        match self.title.find(':') {
            Some(idx) => &self.title[..idx],
            None => &self.title,
        }
    }
}

/// The storefronts this crate knows how to watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// Epic Games Store free games promotions (JSON API)
    Epic,
    /// Prime Gaming free loot (client-side rendered page)
    Prime,
}

impl SourceId {
    /// Parse a source identifier from a string
    /// Handles formats like "epic", "Epic Games", "prime-gaming"
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "epic" | "epic-games" | "epicgames" => Some(SourceId::Epic),
            "prime" | "prime-gaming" | "primegaming" => Some(SourceId::Prime),
            _ => None,
        }
    }

    /// Stable name used for the per-source cache file stem
    pub fn name(&self) -> &'static str {
        match self {
            SourceId::Epic => "epic-games",
            SourceId::Prime => "prime-gaming",
        }
    }

    /// Get a display-friendly name
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::Epic => "Epic Games",
            SourceId::Prime => "Prime Gaming",
        }
    }

    /// Presentation facts for this storefront
    pub fn storefront(&self) -> Storefront {
        match self {
            SourceId::Epic => Storefront {
                headline: "Now free on Epic Games",
                home_url: "https://store.epicgames.com/free-games",
                badge_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a7/Epic_Games_logo.png/527px-Epic_Games_logo.png?20180404191303",
                detail_kind: DetailKind::ExpiryDate,
            },
            SourceId::Prime => Storefront {
                headline: "Now free on prime gaming",
                home_url: "https://gaming.amazon.com/home",
                badge_url: "https://d2u4zldaqlyj2w.cloudfront.net/ba8810e8-f985-43bc-a889-8ba2b0dfea48/favicon.ico",
                detail_kind: DetailKind::ClaimLink,
            },
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Static presentation facts about a storefront, used when shaping embeds
#[derive(Debug, Clone, Copy)]
pub struct Storefront {
    /// Headline for combined announcements
    pub headline: &'static str,
    /// Where a user goes to claim offers
    pub home_url: &'static str,
    /// Small storefront icon shown as the embed thumbnail
    pub badge_url: &'static str,
    /// How an offer's `detail` field reads in chat
    pub detail_kind: DetailKind,
}

/// What an [`Offer`]'s `detail` field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    /// A `DD.MM.YYYY` date the promotion ends on
    ExpiryDate,
    /// An absolute link to the claim page
    ClaimLink,
}

/// How announcements are shaped: everything in one message, or one
/// message per offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStyle {
    /// One combined embed carrying a field per offer
    #[default]
    Single,
    /// One embed per offer
    Multi,
}

impl MessageStyle {
    /// Parse a message style from a config string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(MessageStyle::Single),
            "multi" | "multiple" => Some(MessageStyle::Multi),
            _ => None,
        }
    }
}
