use rocket::response::Redirect;

use crate::embed::form::DISCORD_EMBED_PAGE;
use crate::security::auth::OptionsManager;
use crate::ADMIN_MOUNT;

pub mod auth;
pub mod settings;

/// Helper: absolute path under the admin mount.
pub(crate) fn admin_path(sub: &str) -> String {
    format!("{}{}", ADMIN_MOUNT, sub)
}

#[get("/")]
pub fn dashboard(_admin: OptionsManager) -> Redirect {
    Redirect::to(admin_path(&format!("/settings/{}", DISCORD_EMBED_PAGE.slug)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard,
        auth::setup_page,
        auth::setup_submit,
        auth::login_page,
        auth::login_submit,
        auth::logout,
        auth::redirect_to_login,
        auth::redirect_post_to_login,
        settings::settings_index,
        settings::embed_settings_page,
        settings::embed_settings_save,
    ]
}
