use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::fetch::{OfferSource, Renderer};
use crate::models::Offer;

pub const PRIME_GAMING_URL: &str = "https://gaming.amazon.com/home";

/// Markup the Prime Gaming home page uses for its offer cards.
/// Any upstream change to these silently shrinks the extracted list.
const ITEM_CARD_SELECTOR: &str = "div.item-card__action";
const CLAIM_LINK_SELECTOR: &str =
    "a.tw-interactive.tw-block.tw-full-width.tw-interactable.tw-interactable--alpha";
const IMAGE_SELECTOR: &str = "img.tw-image";

/// Client for the Prime Gaming free loot page
///
/// The page assembles its content client-side, so it is rendered in a
/// headless browser before extraction
pub struct PrimeGamingClient<R> {
    renderer: R,
    settle: Duration,
}

impl<R: Renderer> PrimeGamingClient<R> {
    /// Create a client that waits `settle` after navigation for the page
    /// to finish rendering
    pub fn new(renderer: R, settle: Duration) -> Self {
        Self { renderer, settle }
    }
}

#[async_trait]
impl<R: Renderer> OfferSource for PrimeGamingClient<R> {
    async fn fetch(&self) -> Result<Vec<Offer>> {
        let html = self.renderer.render(PRIME_GAMING_URL, self.settle).await?;
        let base = Url::parse(PRIME_GAMING_URL).context("Invalid Prime Gaming URL")?;
        Ok(extract_offers(&html, &base))
    }
}

/// Pull one offer per item card out of the rendered page
///
/// A card missing any of the expected markers is skipped rather than
/// failing the whole extraction
fn extract_offers(html: &str, base_url: &Url) -> Vec<Offer> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(ITEM_CARD_SELECTOR).expect("invalid selector");
    let link_selector = Selector::parse(CLAIM_LINK_SELECTOR).expect("invalid selector");
    let image_selector = Selector::parse(IMAGE_SELECTOR).expect("invalid selector");

    let mut offers = Vec::new();

    for card in document.select(&card_selector) {
        match extract_card(&card, &link_selector, &image_selector, base_url) {
            Some(offer) => offers.push(offer),
            None => warn!("item card missing expected markup, skipping"),
        }
    }

    offers
}

/// Read title, claim link, and artwork off one item card
fn extract_card(
    card: &ElementRef<'_>,
    link_selector: &Selector,
    image_selector: &Selector,
    base_url: &Url,
) -> Option<Offer> {
    let anchor = card.select(link_selector).next()?;
    let title = anchor.value().attr("aria-label")?;
    let href = anchor.value().attr("href")?;
    let link = base_url.join(href).ok()?;

    let image_url = card
        .select(image_selector)
        .next()?
        .value()
        .attr("src")?;

    if title.is_empty() || image_url.is_empty() {
        return None;
    }

    Some(Offer {
        title: title.to_string(),
        detail: link.to_string(),
        image_url: image_url.to_string(),
    })
}
