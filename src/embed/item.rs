use crate::models::post::{Post, PostKind};
use crate::store::Store;

use super::text::{auto_excerpt, strip_tags, EXCERPT_WORDS};

/// A single post or page as seen by link-preview consumers.
///
/// Title and excerpt are plain text; escaping happens at output time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: i64,
    pub kind: PostKind,
    pub title: String,
    pub author_name: String,
    pub excerpt: String,
    pub permalink: String,
}

impl ContentItem {
    /// Build the view of `post`. `None` when the stored kind is not one
    /// that can be embedded.
    pub fn from_post(store: &dyn Store, post: &Post) -> Option<Self> {
        let kind = post.kind()?;
        let site_url = store.setting_get_or("site_url", "http://localhost:8000");

        let author_name = post
            .author_id
            .and_then(|id| store.user_get_by_id(id))
            .map(|u| u.display_name)
            .unwrap_or_default();

        let excerpt = match post.excerpt.as_deref().map(str::trim) {
            Some(manual) if !manual.is_empty() => strip_tags(manual),
            _ => auto_excerpt(&post.content_html, EXCERPT_WORDS),
        };

        Some(Self {
            id: post.id,
            kind,
            title: strip_tags(&post.title),
            author_name: strip_tags(&author_name),
            excerpt,
            permalink: permalink(&site_url, &post.slug),
        })
    }
}

pub fn permalink(site_url: &str, slug: &str) -> String {
    format!("{}/{}", site_url.trim_end_matches('/'), slug)
}

/// Inverse of [`permalink`]: the slug when `url` lives under `site_url`.
pub fn slug_from_permalink<'a>(site_url: &str, url: &'a str) -> Option<&'a str> {
    let base = site_url.trim_end_matches('/');
    let rest = url.strip_prefix(base)?.strip_prefix('/')?;
    let slug = rest
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_end_matches('/');
    if slug.is_empty() || slug.contains('/') {
        None
    } else {
        Some(slug)
    }
}
