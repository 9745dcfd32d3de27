use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::sync::Arc;

use crate::embed::form::{
    config_from_submission, parse_submission, render_fields, DISCORD_EMBED_PAGE,
    SECTION_TITLE, SETTINGS_PAGES,
};
use crate::embed::EmbedConfig;
use crate::models::user::User;
use crate::security::auth::OptionsManager;
use crate::store::Store;

use super::admin_path;

/// Settings menu entries the user is allowed to open.
fn menu_for(user: &User) -> Vec<serde_json::Value> {
    SETTINGS_PAGES
        .iter()
        .filter(|p| user.can(p.capability))
        .map(|p| {
            json!({
                "label": p.menu_label,
                "title": p.page_title,
                "href": admin_path(&format!("/settings/{}", p.slug)),
            })
        })
        .collect()
}

// ── Settings menu ──────────────────────────────────────

#[get("/settings")]
pub fn settings_index(admin: OptionsManager) -> Template {
    Template::render(
        "admin/settings/index",
        json!({
            "page_title": "Settings",
            "user": admin.user,
            "menu": menu_for(&admin.user),
        }),
    )
}

// ── Discord Embed ──────────────────────────────────────

#[get("/settings/discord-embed")]
pub fn embed_settings_page(
    admin: OptionsManager,
    store: &State<Arc<dyn Store>>,
    flash: Option<FlashMessage<'_>>,
) -> Template {
    let config = EmbedConfig::load(&**store.inner());

    let mut context = json!({
        "page_title": DISCORD_EMBED_PAGE.page_title,
        "user": admin.user,
        "menu": menu_for(&admin.user),
        "section_title": SECTION_TITLE,
        "action": admin_path(&format!("/settings/{}", DISCORD_EMBED_PAGE.slug)),
        "fields_html": render_fields(&config),
    });

    if let Some(ref f) = flash {
        context["flash_kind"] = json!(f.kind());
        context["flash_msg"] = json!(f.message());
    }

    Template::render("admin/settings/page", &context)
}

/// The body is decoded by hand: every checkbox is preceded by a hidden
/// field of the same name and the last submitted value must win.
#[post("/settings/discord-embed", data = "<body>")]
pub fn embed_settings_save(
    admin: OptionsManager,
    store: &State<Arc<dyn Store>>,
    body: String,
) -> Flash<Redirect> {
    let back = Redirect::to(admin_path(&format!("/settings/{}", DISCORD_EMBED_PAGE.slug)));
    let fields = parse_submission(&body);

    let config = match config_from_submission(&fields) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Rejected embed settings from {}: {}", admin.user.email, e);
            return Flash::error(back, format!("Settings not saved: {}", e));
        }
    };

    match config.save(&**store.inner()) {
        Ok(()) => {
            log::info!(
                "{} saved embed settings (image: {:?}, author: {}, excerpt: {})",
                admin.user.email,
                config.image_url,
                config.show_author,
                config.show_excerpt
            );
            Flash::success(back, "Settings saved.")
        }
        Err(e) => {
            log::error!("Failed to save embed settings: {}", e);
            Flash::error(back, "Settings could not be saved.")
        }
    }
}
