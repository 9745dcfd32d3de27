use std::collections::HashMap;

use rusqlite::params;

use crate::db::DbPool;
use crate::models::post::{Post, PostForm};
use crate::models::settings::Setting;
use crate::models::user::User;

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    fn seed_defaults(&self) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool).map_err(|e| e.to_string())
    }

    // ── Settings ────────────────────────────────────────────────────

    fn setting_get(&self, key: &str) -> Option<String> {
        Setting::get(&self.pool, key)
    }

    fn setting_set(&self, key: &str, value: &str) -> Result<(), String> {
        Setting::set(&self.pool, key, value)
    }

    fn setting_add(&self, key: &str, value: &str) -> Result<bool, String> {
        Setting::add(&self.pool, key, value)
    }

    fn setting_set_many(&self, settings: &HashMap<String, String>) -> Result<(), String> {
        Setting::set_many(&self.pool, settings)
    }

    fn setting_all(&self) -> HashMap<String, String> {
        Setting::all(&self.pool)
    }

    fn setting_delete(&self, key: &str) -> Result<(), String> {
        Setting::delete(&self.pool, key)
    }

    // ── Users ───────────────────────────────────────────────────────

    fn user_get_by_id(&self, id: i64) -> Option<User> {
        User::get_by_id(&self.pool, id)
    }

    fn user_get_by_email(&self, email: &str) -> Option<User> {
        User::get_by_email(&self.pool, email)
    }

    fn user_count(&self) -> i64 {
        User::count(&self.pool)
    }

    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String> {
        User::create(&self.pool, email, password_hash, display_name, role)
    }

    fn user_touch_last_login(&self, id: i64) -> Result<(), String> {
        User::touch_last_login(&self.pool, id)
    }

    // ── Sessions ────────────────────────────────────────────────────

    fn session_create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sessions (id, user_id, created_at, expires_at, ip_hash, user_agent)
             VALUES (?1, ?2, datetime('now'), ?3, ?4, ?5)",
            params![token, user_id, expires_at, ip_hash, user_agent],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn session_get_user(&self, token: &str) -> Option<User> {
        User::get_by_session(&self.pool, token)
    }

    fn session_delete(&self, token: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![token])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn session_cleanup_expired(&self) {
        if let Ok(conn) = self.pool.get() {
            let _ = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= datetime('now')",
                [],
            );
        }
    }

    // ── Posts ────────────────────────────────────────────────────────

    fn post_find_by_id(&self, id: i64) -> Option<Post> {
        Post::find_by_id(&self.pool, id)
    }

    fn post_find_by_slug(&self, slug: &str) -> Option<Post> {
        Post::find_by_slug(&self.pool, slug)
    }

    fn post_published(&self, limit: i64, offset: i64) -> Vec<Post> {
        Post::published(&self.pool, limit, offset)
    }

    fn post_create(&self, form: &PostForm) -> Result<i64, String> {
        Post::create(&self.pool, form)
    }
}
