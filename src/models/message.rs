use serde::Serialize;

/// One embed-style chat message, ready for a transport to deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Embed title
    pub title: String,
    /// Link the title points at
    pub url: Option<String>,
    /// Small icon shown next to the title
    pub thumbnail_url: Option<String>,
    /// Name/value pairs listed in the embed body
    pub fields: Vec<EmbedField>,
    /// Large illustration at the bottom of the embed
    pub image_url: Option<String>,
}

/// A single name/value pair inside an [`Embed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What the dispatcher hands back to the chat transport for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Formatted announcements to deliver in order
    Embeds(Vec<Embed>),
    /// A plain-text status line for the user
    Notice(String),
}

impl Reply {
    /// Number of messages this reply expands to
    pub fn len(&self) -> usize {
        match self {
            Reply::Embeds(embeds) => embeds.len(),
            Reply::Notice(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Embeds(embeds) if embeds.is_empty())
    }
}
