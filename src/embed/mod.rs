//! Link-preview control: Open Graph head tags, the Discord-aware oEmbed
//! filter and the settings that drive both.

pub mod config;
pub mod form;
pub mod head;
pub mod item;
pub mod oembed;
pub mod sanitize;
pub mod text;

// Re-export commonly used items
pub use config::EmbedConfig;
pub use head::{render_head_tags, PageView};
pub use item::ContentItem;
pub use oembed::{build_oembed_response, filter_embed_record, OEmbedResponse};
