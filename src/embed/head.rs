use super::config::EmbedConfig;
use super::item::ContentItem;
use super::text::{esc_attr, esc_url, truncate_chars};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 300;

const BLOCK_START: &str = "<!-- Clean Embed -->";
const BLOCK_END: &str = "<!-- End Clean Embed -->";

/// What the public page being rendered represents.
#[derive(Debug, Clone, Copy)]
pub enum PageView<'a> {
    /// Exactly one post or page.
    Singular(&'a ContentItem),
    /// Home, archive, search or any other multi-item view.
    Listing,
}

/// Plain-text `og:title`: item title, plus `" by <author>"` when enabled,
/// capped at [`TITLE_MAX_CHARS`] code points. The item already carries
/// plain text, so nothing is stripped or decoded here.
pub fn preview_title(config: &EmbedConfig, item: &ContentItem) -> String {
    let mut title = item.title.clone();
    if config.show_author {
        title.push_str(" by ");
        title.push_str(&item.author_name);
    }
    truncate_chars(&title, TITLE_MAX_CHARS)
}

/// Plain-text `og:description`: the excerpt when enabled, else empty.
pub fn preview_description(config: &EmbedConfig, item: &ContentItem) -> String {
    if !config.show_excerpt {
        return String::new();
    }
    truncate_chars(&item.excerpt, DESCRIPTION_MAX_CHARS)
}

/// Open Graph block for the page head. Empty for anything but a single item.
pub fn render_head_tags(config: &EmbedConfig, view: PageView<'_>) -> String {
    let item = match view {
        PageView::Singular(item) => item,
        PageView::Listing => return String::new(),
    };

    let title = preview_title(config, item);
    let description = preview_description(config, item);
    let url = esc_url(&item.permalink);
    let image = esc_url(&config.image_url);

    let mut out = String::new();
    out.push('\n');
    out.push_str(BLOCK_START);
    out.push('\n');
    push_meta(&mut out, "og:title", &esc_attr(&title));
    push_meta(&mut out, "og:description", &esc_attr(&description));
    push_meta(&mut out, "og:url", &url);
    if !image.is_empty() {
        push_meta(&mut out, "og:image", &image);
    }
    out.push_str(BLOCK_END);
    out.push('\n');
    out
}

fn push_meta(out: &mut String, property: &str, escaped_content: &str) {
    out.push_str(&format!(
        "<meta property=\"{}\" content=\"{}\" />\n",
        property, escaped_content
    ));
}
