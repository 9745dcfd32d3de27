use std::collections::HashMap;

use crate::models::user::CAP_MANAGE_OPTIONS;

use super::config::{EmbedConfig, OPT_IMAGE_URL, OPT_SHOW_AUTHOR, OPT_SHOW_EXCERPT};
use super::sanitize::{sanitize_bool, sanitize_url, ValidationError};
use super::text::esc_attr;

/// An entry under the admin "Settings" menu.
#[derive(Debug, Clone, Copy)]
pub struct SettingsPage {
    pub slug: &'static str,
    pub page_title: &'static str,
    pub menu_label: &'static str,
    pub capability: &'static str,
}

pub const DISCORD_EMBED_PAGE: SettingsPage = SettingsPage {
    slug: "discord-embed",
    page_title: "Discord Embed Settings",
    menu_label: "Discord Embed",
    capability: CAP_MANAGE_OPTIONS,
};

pub const SETTINGS_PAGES: &[SettingsPage] = &[DISCORD_EMBED_PAGE];

pub const SECTION_TITLE: &str = "Main Settings";

/// The three option rows of the settings page.
pub fn render_fields(config: &EmbedConfig) -> String {
    let mut html = String::from("<table class=\"form-table\" role=\"presentation\">\n");

    push_row(
        &mut html,
        OPT_IMAGE_URL,
        "Default Embed Image URL",
        &format!(
            "<input type=\"text\" id=\"{key}\" name=\"{key}\" value=\"{value}\" size=\"50\" />\n\
             <p class=\"description\">This image will be used for all Discord embeds. Leave empty for no image.</p>",
            key = OPT_IMAGE_URL,
            value = esc_attr(&config.image_url),
        ),
    );
    push_row(
        &mut html,
        OPT_SHOW_AUTHOR,
        "Show Author Name in Title",
        &checkbox(OPT_SHOW_AUTHOR, config.show_author),
    );
    push_row(
        &mut html,
        OPT_SHOW_EXCERPT,
        "Show Post/Page Excerpt",
        &checkbox(OPT_SHOW_EXCERPT, config.show_excerpt),
    );

    html.push_str("</table>\n");
    html
}

fn push_row(html: &mut String, key: &str, label: &str, control: &str) {
    html.push_str(&format!(
        "<tr>\n<th scope=\"row\"><label for=\"{}\">{}</label></th>\n<td>\n{}\n</td>\n</tr>\n",
        key, label, control
    ));
}

/// Hidden `"0"` first so an unchecked box still submits a value; a checked
/// box follows it and wins.
fn checkbox(name: &str, checked: bool) -> String {
    format!(
        "<input type=\"hidden\" name=\"{name}\" value=\"0\" />\n\
         <input type=\"checkbox\" id=\"{name}\" name=\"{name}\" value=\"1\"{checked} />",
        name = name,
        checked = if checked { " checked=\"checked\"" } else { "" },
    )
}

/// Decode an `application/x-www-form-urlencoded` body. For repeated names
/// the last value wins, which is what makes the hidden fallback work.
pub fn parse_submission(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

/// Sanitize every submitted option. Any invalid value rejects the whole
/// submission.
pub fn config_from_submission(
    fields: &HashMap<String, String>,
) -> Result<EmbedConfig, ValidationError> {
    let image_url = sanitize_url(fields.get(OPT_IMAGE_URL).map(String::as_str).unwrap_or(""))?;
    Ok(EmbedConfig {
        image_url,
        show_author: sanitize_bool(fields.get(OPT_SHOW_AUTHOR).map(String::as_str)),
        show_excerpt: sanitize_bool(fields.get(OPT_SHOW_EXCERPT).map(String::as_str)),
    })
}
