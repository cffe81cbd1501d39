//! Turning offer lists into chat embeds.

use rand::Rng;

use crate::models::{DetailKind, Embed, EmbedField, MessageStyle, Offer, Storefront};

/// Shape a list of offers into embeds for the requested style
///
/// The allow-list, when given, is applied before either style; an empty
/// result means the caller should report "no content" instead
pub fn render(
    style: MessageStyle,
    storefront: &Storefront,
    offers: &[Offer],
    allow: Option<&[String]>,
    rng: &mut impl Rng,
) -> Vec<Embed> {
    let included = filter_allowed(offers, allow);
    match style {
        MessageStyle::Single => combined_embed(storefront, &included, rng)
            .into_iter()
            .collect(),
        MessageStyle::Multi => per_offer_embeds(storefront, &included),
    }
}

/// Apply the caller's allow-list
///
/// An offer passes when its base game name (title up to the first colon)
/// is on the list; `None` passes everything through
pub fn filter_allowed<'a>(offers: &'a [Offer], allow: Option<&[String]>) -> Vec<&'a Offer> {
    match allow {
        Some(names) => offers
            .iter()
            .filter(|offer| names.iter().any(|name| name == offer.base_name()))
            .collect(),
        None => offers.iter().collect(),
    }
}

/// One embed carrying a field per offer and a randomly chosen
/// representative image
///
/// The pick is uniform over the whole image list; a single-offer set
/// always resolves to that offer's image
pub fn combined_embed(
    storefront: &Storefront,
    offers: &[&Offer],
    rng: &mut impl Rng,
) -> Option<Embed> {
    if offers.is_empty() {
        return None;
    }

    let fields = offers
        .iter()
        .map(|offer| EmbedField::new(format!("**{}**", offer.title), detail_line(storefront, offer)))
        .collect();

    let image = offers[rng.gen_range(0..offers.len())].image_url.clone();

    Some(Embed {
        title: storefront.headline.to_string(),
        url: Some(storefront.home_url.to_string()),
        thumbnail_url: Some(storefront.badge_url.to_string()),
        fields,
        image_url: Some(image),
    })
}

/// One embed per offer, in input order
pub fn per_offer_embeds(storefront: &Storefront, offers: &[&Offer]) -> Vec<Embed> {
    offers
        .iter()
        .map(|offer| match storefront.detail_kind {
            DetailKind::ExpiryDate => Embed {
                title: storefront.headline.to_string(),
                url: Some(storefront.home_url.to_string()),
                thumbnail_url: Some(storefront.badge_url.to_string()),
                fields: vec![EmbedField::new(
                    offer.title.clone(),
                    detail_line(storefront, offer),
                )],
                image_url: Some(offer.image_url.clone()),
            },
            // Claim-link offers link straight to their own claim page
            DetailKind::ClaimLink => Embed {
                title: offer.title.clone(),
                url: Some(offer.detail.clone()),
                thumbnail_url: Some(storefront.badge_url.to_string()),
                fields: vec![EmbedField::new("**Open in browser**", offer.detail.clone())],
                image_url: Some(offer.image_url.clone()),
            },
        })
        .collect()
}

fn detail_line(storefront: &Storefront, offer: &Offer) -> String {
    match storefront.detail_kind {
        DetailKind::ExpiryDate => format!("Free until {}", offer.detail),
        DetailKind::ClaimLink => offer.detail.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn epic_offers() -> Vec<Offer> {
        vec![
            Offer::new("Alpha", "01.06.2024", "https://img.example/a.png"),
            Offer::new("Beta", "01.06.2024", "https://img.example/b.png"),
            Offer::new("Gamma", "01.06.2024", "https://img.example/c.png"),
        ]
    }

    fn prime_offers() -> Vec<Offer> {
        vec![
            Offer::new(
                "Alpha: Subtitle",
                "https://gaming.amazon.com/loot/alpha",
                "https://img.example/a.png",
            ),
            Offer::new(
                "Beta",
                "https://gaming.amazon.com/loot/beta",
                "https://img.example/b.png",
            ),
        ]
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_single_style_builds_one_embed() {
        let offers = epic_offers();
        let embeds = render(
            MessageStyle::Single,
            &SourceId::Epic.storefront(),
            &offers,
            None,
            &mut rng(),
        );

        assert_eq!(embeds.len(), 1);
        let embed = &embeds[0];
        assert_eq!(embed.title, "Now free on Epic Games");
        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.fields[0].name, "**Alpha**");
        assert_eq!(embed.fields[0].value, "Free until 01.06.2024");

        // The illustration is drawn from the input images
        let image = embed.image_url.as_deref().unwrap();
        assert!(offers.iter().any(|offer| offer.image_url == image));
    }

    #[test]
    fn test_multi_style_builds_one_embed_per_offer() {
        let offers = epic_offers();
        let embeds = render(
            MessageStyle::Multi,
            &SourceId::Epic.storefront(),
            &offers,
            None,
            &mut rng(),
        );

        assert_eq!(embeds.len(), 3);
        for (embed, offer) in embeds.iter().zip(&offers) {
            assert_eq!(embed.title, "Now free on Epic Games");
            assert_eq!(embed.fields.len(), 1);
            assert_eq!(embed.fields[0].name, offer.title);
            assert_eq!(embed.fields[0].value, format!("Free until {}", offer.detail));
            assert_eq!(embed.image_url.as_deref(), Some(offer.image_url.as_str()));
        }
    }

    #[test]
    fn test_multi_style_claim_links() {
        let offers = prime_offers();
        let embeds = render(
            MessageStyle::Multi,
            &SourceId::Prime.storefront(),
            &offers,
            None,
            &mut rng(),
        );

        assert_eq!(embeds.len(), 2);
        assert_eq!(embeds[0].title, "Alpha: Subtitle");
        assert_eq!(
            embeds[0].url.as_deref(),
            Some("https://gaming.amazon.com/loot/alpha")
        );
        assert_eq!(embeds[0].fields[0].name, "**Open in browser**");
        assert_eq!(embeds[0].fields[0].value, "https://gaming.amazon.com/loot/alpha");
    }

    #[test]
    fn test_allow_list_filters_by_base_name() {
        let offers = prime_offers();
        let allow = vec!["Alpha".to_string()];
        let included = filter_allowed(&offers, Some(&allow));

        // "Alpha: Subtitle" matches as "Alpha"; "Beta" has no colon and is
        // compared whole, which is not on the list
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].title, "Alpha: Subtitle");
    }

    #[test]
    fn test_allow_list_applies_to_both_styles() {
        let offers = prime_offers();
        let allow = vec!["Alpha".to_string()];

        let single = render(
            MessageStyle::Single,
            &SourceId::Prime.storefront(),
            &offers,
            Some(&allow),
            &mut rng(),
        );
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].fields.len(), 1);

        let multi = render(
            MessageStyle::Multi,
            &SourceId::Prime.storefront(),
            &offers,
            Some(&allow),
            &mut rng(),
        );
        assert_eq!(multi.len(), 1);
        assert_eq!(multi[0].title, "Alpha: Subtitle");
    }

    #[test]
    fn test_single_candidate_image_is_deterministic() {
        let offers = vec![Offer::new("Alpha", "01.06.2024", "https://img.example/a.png")];

        // Any seed must resolve to the only image
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let embed = render(
                MessageStyle::Single,
                &SourceId::Epic.storefront(),
                &offers,
                None,
                &mut rng,
            )
            .pop()
            .unwrap();
            assert_eq!(embed.image_url.as_deref(), Some("https://img.example/a.png"));
        }
    }

    #[test]
    fn test_empty_offers_produce_no_embeds() {
        let embeds = render(
            MessageStyle::Single,
            &SourceId::Epic.storefront(),
            &[],
            None,
            &mut rng(),
        );
        assert!(embeds.is_empty());
    }

    #[test]
    fn test_fully_filtered_set_produces_no_embeds() {
        let offers = prime_offers();
        let allow = vec!["Omega".to_string()];
        let embeds = render(
            MessageStyle::Multi,
            &SourceId::Prime.storefront(),
            &offers,
            Some(&allow),
            &mut rng(),
        );
        assert!(embeds.is_empty());
    }
}
