#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod boot;
mod db;
mod embed;
mod models;
mod rate_limit;
mod render;
mod routes;
mod security;
mod store;

#[cfg(test)]
mod tests;

use rate_limit::RateLimiter;
use store::sqlite::SqliteStore;
use store::Store;

/// Where the admin pages are mounted.
pub const ADMIN_MOUNT: &str = "/admin";

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Pages", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with(ADMIN_MOUNT) {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Migrations, host defaults, then the embed options (never overwriting
/// values an administrator already saved).
pub fn prepare_store(store: &dyn Store) -> Result<(), String> {
    store.run_migrations()?;
    store.seed_defaults()?;
    embed::config::activate(store)
}

/// Assemble the app around a prepared store.
pub fn build(store: Arc<dyn Store>) -> Rocket<Build> {
    let figment = rocket::Config::figment().join(("template_dir", "website/templates"));

    rocket::custom(figment)
        .manage(store)
        .manage(RateLimiter::new())
        .attach(Template::fairing())
        .attach(NoCacheAdmin)
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .mount(ADMIN_MOUNT, routes::admin::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    if !boot::run().ok() {
        std::process::exit(1);
    }

    let store = match db::init_pool() {
        Ok(pool) => SqliteStore::new(pool),
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = prepare_store(&store) {
        log::error!("Failed to prepare database: {}", e);
        std::process::exit(1);
    }

    build(Arc::new(store))
}
