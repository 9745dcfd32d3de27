use rocket::response::content::RawHtml;
use rocket::State;
use std::sync::Arc;

use crate::embed::{render_head_tags, ContentItem, EmbedConfig, PageView};
use crate::render;
use crate::store::Store;

const HOME_POSTS: i64 = 20;

// ── Homepage ───────────────────────────────────────────

#[get("/")]
pub fn homepage(store: &State<Arc<dyn Store>>) -> RawHtml<String> {
    let s: &dyn Store = &**store.inner();
    let site_name = s.setting_get_or("site_name", "Clean Embed");

    let items: Vec<ContentItem> = s
        .post_published(HOME_POSTS, 0)
        .iter()
        .filter_map(|p| ContentItem::from_post(s, p))
        .collect();

    // Listing view: the renderer yields nothing here.
    let head = render_head_tags(&EmbedConfig::load(s), PageView::Listing);
    RawHtml(render::render_listing(&site_name, &items, &head))
}

// ── Single post / page ─────────────────────────────────

#[get("/<slug>", rank = 5)]
pub fn single(store: &State<Arc<dyn Store>>, slug: &str) -> Option<RawHtml<String>> {
    let s: &dyn Store = &**store.inner();
    let post = s.post_find_by_slug(slug)?;
    if !post.is_published() {
        return None;
    }
    let item = ContentItem::from_post(s, &post)?;

    let site_name = s.setting_get_or("site_name", "Clean Embed");
    let site_url = s.setting_get_or("site_url", "http://localhost:8000");

    let config = EmbedConfig::load(s);
    let mut head = render_head_tags(&config, PageView::Singular(&item));
    head.push_str(&render::oembed_discovery_links(&site_url, &item.permalink));

    Some(RawHtml(render::render_single(&site_name, &post, &item, &head)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, single]
}
