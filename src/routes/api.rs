use rocket::http::Status;
use rocket::response::content::RawXml;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

use crate::embed::item::slug_from_permalink;
use crate::embed::oembed::Provider;
use crate::embed::{build_oembed_response, filter_embed_record, ContentItem, OEmbedResponse};
use crate::security::auth::UserAgent;
use crate::store::Store;

#[derive(Responder)]
pub enum OEmbedReply {
    Json(Json<OEmbedResponse>),
    Xml(RawXml<String>),
}

// ── oEmbed ─────────────────────────────────────────────

/// `maxheight` and any other consumer parameters are accepted and ignored.
#[get("/oembed?<url>&<format>&<maxwidth>")]
pub fn oembed(
    store: &State<Arc<dyn Store>>,
    url: &str,
    format: Option<&str>,
    maxwidth: Option<u32>,
    user_agent: UserAgent,
) -> Result<OEmbedReply, Status> {
    let s: &dyn Store = &**store.inner();
    let site_url = s.setting_get_or("site_url", "http://localhost:8000");

    let post = slug_from_permalink(&site_url, url)
        .and_then(|slug| s.post_find_by_slug(slug))
        .filter(|p| p.is_published());
    let item = match post.as_ref().and_then(|p| ContentItem::from_post(s, p)) {
        Some(item) => item,
        None => {
            log::info!("oEmbed request for unknown URL {}", url);
            return Err(Status::NotFound);
        }
    };

    let provider = Provider {
        name: s.setting_get_or("site_name", "Clean Embed"),
        url: site_url,
    };
    let record = build_oembed_response(&provider, &item, maxwidth);
    let record = filter_embed_record(record, Some(&item), user_agent.as_deref());

    match format.unwrap_or("json") {
        "json" => Ok(OEmbedReply::Json(Json(record))),
        "xml" => Ok(OEmbedReply::Xml(RawXml(record.to_xml()))),
        other => {
            log::info!("oEmbed format '{}' not supported", other);
            Err(Status::NotImplemented)
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![oembed]
}
