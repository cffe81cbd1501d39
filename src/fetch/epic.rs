use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::fetch::OfferSource;
use crate::models::Offer;

pub const EPIC_API_URL: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";

/// The artwork variant shown as the embed illustration
const WIDE_IMAGE_TYPE: &str = "OfferImageWide";

/// Client for the Epic Games Store free games promotions API
pub struct EpicGamesClient {
    client: Client,
    country: String,
}

/// Response from the promotions API, pared down to the key paths we read
#[derive(Debug, Deserialize)]
struct PromotionsResponse {
    data: CatalogData,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(rename = "Catalog")]
    catalog: Catalog,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(rename = "searchStore")]
    search_store: SearchStore,
}

#[derive(Debug, Deserialize)]
struct SearchStore {
    #[serde(default)]
    elements: Vec<StoreElement>,
}

/// Catalog element as returned by the promotions API
#[derive(Debug, Deserialize)]
struct StoreElement {
    title: String,
    price: Option<Price>,
    #[serde(rename = "keyImages", default)]
    key_images: Vec<KeyImage>,
}

#[derive(Debug, Deserialize)]
struct Price {
    #[serde(rename = "totalPrice")]
    total_price: TotalPrice,
    #[serde(rename = "lineOffers", default)]
    line_offers: Vec<LineOffer>,
}

#[derive(Debug, Deserialize)]
struct TotalPrice {
    #[serde(rename = "discountPrice")]
    discount_price: i64,
    #[serde(rename = "originalPrice")]
    original_price: i64,
}

#[derive(Debug, Deserialize)]
struct LineOffer {
    #[serde(rename = "appliedRules", default)]
    applied_rules: Vec<AppliedRule>,
}

#[derive(Debug, Deserialize)]
struct AppliedRule {
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyImage {
    #[serde(rename = "type")]
    image_type: String,
    url: String,
}

impl EpicGamesClient {
    /// Create a new promotions API client
    pub fn new(country: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("lootwatch/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
            country: country.to_string(),
        })
    }
}

#[async_trait]
impl OfferSource for EpicGamesClient {
    /// Fetch the current free games
    ///
    /// An unreachable endpoint or non-success status yields an empty list,
    /// not an error; the caller reports it as "no content"
    async fn fetch(&self) -> Result<Vec<Offer>> {
        let url = format!("{}?country={}", EPIC_API_URL, self.country);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("promotions request failed: {e}");
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            warn!("promotions request returned HTTP {}", response.status());
            return Ok(Vec::new());
        }

        let promotions: PromotionsResponse = response
            .json()
            .await
            .context("Failed to parse promotions response")?;

        Ok(extract_offers(promotions))
    }
}

/// Keep the catalog elements that are normally priced but currently free
fn extract_offers(promotions: PromotionsResponse) -> Vec<Offer> {
    promotions
        .data
        .catalog
        .search_store
        .elements
        .into_iter()
        .filter_map(convert_element)
        .collect()
}

/// Convert one catalog element into an offer
///
/// An element missing a field the announcement needs is skipped, never
/// a fetch-wide failure
fn convert_element(element: StoreElement) -> Option<Offer> {
    if element.title.is_empty() {
        return None;
    }

    let price = element.price?;
    let total = &price.total_price;
    if total.discount_price != 0 || total.original_price == 0 {
        return None;
    }

    let end_date = match price
        .line_offers
        .first()
        .and_then(|offer| offer.applied_rules.first())
        .and_then(|rule| rule.end_date.as_deref())
    {
        Some(raw) => raw,
        None => {
            warn!(title = %element.title, "free game has no promotion end date, skipping");
            return None;
        }
    };

    let ends = match format_end_date(end_date) {
        Some(ends) => ends,
        None => {
            warn!(title = %element.title, end_date, "unparsable promotion end date, skipping");
            return None;
        }
    };

    let image_url = match pick_image(&element.key_images) {
        Some(url) => url,
        None => {
            warn!(title = %element.title, "free game has no artwork, skipping");
            return None;
        }
    };

    Some(Offer {
        title: element.title,
        detail: ends,
        image_url,
    })
}

/// Prefer the wide storefront artwork, fall back to whatever is available
fn pick_image(images: &[KeyImage]) -> Option<String> {
    images
        .iter()
        .find(|image| image.image_type == WIDE_IMAGE_TYPE)
        .or_else(|| images.first())
        .map(|image| image.url.clone())
}

/// Reformat an RFC 3339 end date into the `DD.MM.YYYY` shown in chat
fn format_end_date(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.format("%d.%m.%Y").to_string())
}
