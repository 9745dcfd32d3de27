use serde::{Deserialize, Serialize};

use super::item::ContentItem;
use super::text::esc_attr;

pub const MIN_WIDTH: u32 = 200;
pub const MAX_WIDTH: u32 = 600;
pub const MIN_HEIGHT: u32 = 200;

/// oEmbed 1.0 response record for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OEmbedResponse {
    pub version: String,
    pub provider_name: String,
    pub provider_url: String,
    pub author_name: String,
    pub author_url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: u32,
    pub height: u32,
    pub html: String,
}

/// Site-wide values that go into every response.
#[derive(Debug, Clone)]
pub struct Provider {
    pub name: String,
    pub url: String,
}

/// Width is `maxwidth` clamped to 200..=600 (600 when absent); height keeps
/// a 16:9 frame but never drops below 200.
pub fn embed_dimensions(maxwidth: Option<u32>) -> (u32, u32) {
    let width = maxwidth.unwrap_or(MAX_WIDTH).clamp(MIN_WIDTH, MAX_WIDTH);
    let height = (width * 9).div_ceil(16).max(MIN_HEIGHT);
    (width, height)
}

/// Build the response the endpoint returns before client-specific filtering.
pub fn build_oembed_response(
    provider: &Provider,
    item: &ContentItem,
    maxwidth: Option<u32>,
) -> OEmbedResponse {
    let (width, height) = embed_dimensions(maxwidth);
    let html = format!(
        "<blockquote class=\"clean-embed\"><a href=\"{}\">{}</a></blockquote>",
        esc_attr(&item.permalink),
        esc_attr(&item.title),
    );

    OEmbedResponse {
        version: "1.0".to_string(),
        provider_name: provider.name.clone(),
        provider_url: provider.url.clone(),
        author_name: item.author_name.clone(),
        author_url: provider.url.clone(),
        title: item.title.clone(),
        kind: "rich".to_string(),
        width,
        height,
        html,
    }
}

/// Case-insensitive substring test on the client's self-reported identity.
/// No attempt is made to parse the user-agent grammar.
pub fn is_discord_client(client: Option<&str>) -> bool {
    client
        .map(|ua| ua.to_lowercase().contains("discord"))
        .unwrap_or(false)
}

/// Blank `author_name` for Discord's unfurler, which otherwise prints it as
/// a redundant byline above the title.
///
/// `item` is `None` when the record does not describe an embeddable post or
/// page; the record is then returned untouched. No other field is read or
/// written.
pub fn filter_embed_record(
    mut record: OEmbedResponse,
    item: Option<&ContentItem>,
    client: Option<&str>,
) -> OEmbedResponse {
    if item.is_some() && is_discord_client(client) {
        record.author_name.clear();
    }
    record
}

impl OEmbedResponse {
    /// `format=xml` serialization.
    pub fn to_xml(&self) -> String {
        use quick_xml::escape::escape;

        let fields: [(&str, String); 10] = [
            ("version", self.version.clone()),
            ("provider_name", self.provider_name.clone()),
            ("provider_url", self.provider_url.clone()),
            ("author_name", self.author_name.clone()),
            ("author_url", self.author_url.clone()),
            ("title", self.title.clone()),
            ("type", self.kind.clone()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("html", self.html.clone()),
        ];

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n<oembed>");
        for (name, value) in &fields {
            xml.push_str(&format!("<{}>{}</{}>", name, escape(value.as_str()), name));
        }
        xml.push_str("</oembed>\n");
        xml
    }
}
