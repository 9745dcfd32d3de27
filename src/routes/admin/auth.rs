use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::embed::sanitize::sanitize_url;
use crate::models::post::PostForm;
use crate::rate_limit::RateLimiter;
use crate::security::auth::{self, ClientIp, UserAgent};
use crate::store::Store;

use super::admin_path;

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, FromForm)]
pub struct SetupForm {
    pub site_name: String,
    pub site_url: String,
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Returns true if this is a fresh install (no users exist)
pub fn needs_setup(store: &dyn Store) -> bool {
    store.user_count() == 0
}

// ── First-run setup ────────────────────────────────────

#[get("/setup")]
pub fn setup_page(store: &State<Arc<dyn Store>>) -> Result<Template, Redirect> {
    let s: &dyn Store = &**store.inner();
    if !needs_setup(s) {
        return Err(Redirect::to(admin_path("/login")));
    }
    Ok(Template::render(
        "admin/setup",
        json!({
            "page_title": "Setup",
            "site_name": s.setting_get_or("site_name", "Clean Embed"),
            "site_url": s.setting_get_or("site_url", "http://localhost:8000"),
        }),
    ))
}

#[post("/setup", data = "<form>")]
pub fn setup_submit(
    form: Form<SetupForm>,
    store: &State<Arc<dyn Store>>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    user_agent: UserAgent,
) -> Result<Redirect, Template> {
    let s: &dyn Store = &**store.inner();
    if !needs_setup(s) {
        return Ok(Redirect::to(admin_path("/login")));
    }

    let make_err = |msg: &str| {
        Template::render(
            "admin/setup",
            json!({
                "page_title": "Setup",
                "error": msg,
                "site_name": form.site_name,
                "site_url": form.site_url,
                "display_name": form.display_name,
                "email": form.email,
            }),
        )
    };

    let site_name = form.site_name.trim();
    let display_name = form.display_name.trim();
    let email = form.email.trim();
    if site_name.is_empty() || display_name.is_empty() || email.is_empty() {
        return Err(make_err("Site name, display name and email are required."));
    }
    if !email.contains('@') {
        return Err(make_err("Please enter a valid email address."));
    }
    let site_url = match sanitize_url(&form.site_url) {
        Ok(u) if !u.is_empty() => u.trim_end_matches('/').to_string(),
        Ok(_) => return Err(make_err("Site URL is required.")),
        Err(e) => return Err(make_err(&e.to_string())),
    };
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(make_err("Password must be at least 8 characters."));
    }
    if form.password != form.confirm_password {
        return Err(make_err("Passwords do not match."));
    }

    let hash = auth::hash_password(&form.password).map_err(|e| make_err(&e))?;

    let site = HashMap::from([
        ("site_name".to_string(), site_name.to_string()),
        ("site_url".to_string(), site_url),
    ]);
    s.setting_set_many(&site).map_err(|e| make_err(&e))?;

    let user_id = s
        .user_create(email, &hash, display_name, "admin")
        .map_err(|e| make_err(&e))?;
    log::info!("Setup complete: created admin {}", email);

    let sample = PostForm {
        title: "Hello world!".to_string(),
        slug: "hello-world".to_string(),
        content_html: "<p>Welcome! Share this page on Discord to see its preview card.</p>"
            .to_string(),
        excerpt: None,
        author_id: Some(user_id),
        kind: "post".to_string(),
        status: "published".to_string(),
        published_at: None,
    };
    if let Err(e) = s.post_create(&sample) {
        log::warn!("Could not create sample post: {}", e);
    }

    match auth::create_session(s, user_id, Some(&client_ip.0), user_agent.as_deref()) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id, s);
            Ok(Redirect::to(admin_path("/settings")))
        }
        Err(e) => {
            log::error!("Session creation failed after setup: {}", e);
            Ok(Redirect::to(admin_path("/login")))
        }
    }
}

// ── Login / logout ─────────────────────────────────────

#[get("/login")]
pub fn login_page(store: &State<Arc<dyn Store>>) -> Result<Template, Redirect> {
    if needs_setup(&**store.inner()) {
        return Err(Redirect::to(admin_path("/setup")));
    }
    Ok(Template::render("admin/login", json!({ "page_title": "Log in" })))
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    form: Form<LoginForm>,
    store: &State<Arc<dyn Store>>,
    limiter: &State<RateLimiter>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    user_agent: UserAgent,
) -> Result<Redirect, Template> {
    let s: &dyn Store = &**store.inner();
    let make_err = |msg: &str| {
        Template::render(
            "admin/login",
            json!({ "page_title": "Log in", "error": msg, "email": form.email }),
        )
    };

    limiter.cleanup(LOGIN_WINDOW);
    let rate_key = format!("login:{}", auth::hash_ip(&client_ip.0));
    let max_attempts = s.setting_get_i64("login_rate_limit").max(1) as u64;
    if !limiter.check_and_record(&rate_key, max_attempts, LOGIN_WINDOW) {
        log::warn!("Login rate limit hit for {}", client_ip.0);
        return Err(make_err("Too many login attempts. Please try again in 15 minutes."));
    }

    let user = match s.user_get_by_email(&form.email) {
        Some(u) if auth::verify_password(&form.password, &u.password_hash) => u,
        _ => {
            log::info!("Failed login for {}", form.email);
            return Err(make_err("Invalid credentials"));
        }
    };
    if !user.is_active() {
        return Err(make_err("This account is suspended. Contact an administrator."));
    }

    s.session_cleanup_expired();
    let _ = s.user_touch_last_login(user.id);
    match auth::create_session(s, user.id, Some(&client_ip.0), user_agent.as_deref()) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id, s);
            limiter.reset(&rate_key);
            log::info!("{} logged in", user.email);
            Ok(Redirect::to(admin_path("/settings")))
        }
        Err(e) => {
            log::error!("Session creation failed: {}", e);
            Err(make_err("Session creation failed"))
        }
    }
}

#[get("/logout")]
pub fn logout(store: &State<Arc<dyn Store>>, cookies: &CookieJar<'_>) -> Redirect {
    if let Some(cookie) = cookies.get_private(auth::SESSION_COOKIE) {
        let _ = auth::destroy_session(&**store.inner(), cookie.value());
    }
    auth::clear_session_cookie(cookies);
    Redirect::to(admin_path("/login"))
}

/// Catch-all for any admin GET that failed the capability guard. Ranked
/// ahead of the public `/<slug>` route so a bare `/admin` lands here.
#[get("/<_path..>", rank = 4)]
pub fn redirect_to_login(_path: std::path::PathBuf, store: &State<Arc<dyn Store>>) -> Redirect {
    if needs_setup(&**store.inner()) {
        Redirect::to(admin_path("/setup"))
    } else {
        Redirect::to(admin_path("/login"))
    }
}

/// Same for form posts, so an expired session never reaches a save handler.
#[post("/<_path..>", rank = 99)]
pub fn redirect_post_to_login(_path: std::path::PathBuf) -> Redirect {
    Redirect::to(admin_path("/login"))
}
