mod message;
mod offer;

pub use message::{Embed, EmbedField, Reply};
pub use offer::{DetailKind, MessageStyle, Offer, SourceId, Storefront};
