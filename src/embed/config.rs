use std::collections::HashMap;

use serde::Serialize;

use crate::store::Store;

pub const OPT_IMAGE_URL: &str = "clean_embed_image_url";
pub const OPT_SHOW_AUTHOR: &str = "clean_embed_show_author";
pub const OPT_SHOW_EXCERPT: &str = "clean_embed_show_excerpt";

/// The three embed options, loaded once per request and passed explicitly
/// to the renderer and the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedConfig {
    pub image_url: String,
    pub show_author: bool,
    pub show_excerpt: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            show_author: true,
            show_excerpt: true,
        }
    }
}

impl EmbedConfig {
    /// Read the options, falling back to defaults for missing keys.
    pub fn load(store: &dyn Store) -> Self {
        let defaults = Self::default();
        Self {
            image_url: store.setting_get_or(OPT_IMAGE_URL, &defaults.image_url),
            show_author: store.setting_get_bool_or(OPT_SHOW_AUTHOR, defaults.show_author),
            show_excerpt: store.setting_get_bool_or(OPT_SHOW_EXCERPT, defaults.show_excerpt),
        }
    }

    /// Key/value form as stored in the settings table.
    pub fn to_settings(&self) -> HashMap<String, String> {
        HashMap::from([
            (OPT_IMAGE_URL.to_string(), self.image_url.clone()),
            (OPT_SHOW_AUTHOR.to_string(), bool_str(self.show_author).to_string()),
            (OPT_SHOW_EXCERPT.to_string(), bool_str(self.show_excerpt).to_string()),
        ])
    }

    /// Persist all three options in one write.
    pub fn save(&self, store: &dyn Store) -> Result<(), String> {
        store.setting_set_many(&self.to_settings())
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Seed every option that is not stored yet. Existing values are kept.
pub fn activate(store: &dyn Store) -> Result<(), String> {
    for (key, value) in EmbedConfig::default().to_settings() {
        if store.setting_add(&key, &value)? {
            log::info!("Seeded embed option {} = {:?}", key, value);
        }
    }
    Ok(())
}
