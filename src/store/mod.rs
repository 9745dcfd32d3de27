use std::collections::HashMap;

use crate::models::post::{Post, PostForm};
use crate::models::user::User;

pub mod sqlite;

/// Unified data-access trait. Every database operation goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;

    // ── Settings ────────────────────────────────────────────────────
    fn setting_get(&self, key: &str) -> Option<String>;
    fn setting_get_or(&self, key: &str, default: &str) -> String {
        self.setting_get(key).unwrap_or_else(|| default.to_string())
    }
    /// Stored booleans are `"true"`/`"1"`; anything else, or a missing key,
    /// falls back to `default`.
    fn setting_get_bool_or(&self, key: &str, default: bool) -> bool {
        self.setting_get(key)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(default)
    }
    fn setting_get_bool(&self, key: &str) -> bool {
        self.setting_get_bool_or(key, false)
    }
    fn setting_get_i64(&self, key: &str) -> i64 {
        self.setting_get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
    fn setting_set(&self, key: &str, value: &str) -> Result<(), String>;
    /// Insert-if-absent. Returns `true` when the key was newly written.
    fn setting_add(&self, key: &str, value: &str) -> Result<bool, String>;
    fn setting_set_many(&self, settings: &HashMap<String, String>) -> Result<(), String>;
    fn setting_all(&self) -> HashMap<String, String>;
    fn setting_delete(&self, key: &str) -> Result<(), String>;

    // ── Users ───────────────────────────────────────────────────────
    fn user_get_by_id(&self, id: i64) -> Option<User>;
    fn user_get_by_email(&self, email: &str) -> Option<User>;
    fn user_count(&self) -> i64;
    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String>;
    fn user_touch_last_login(&self, id: i64) -> Result<(), String>;

    // ── Sessions ────────────────────────────────────────────────────
    fn session_create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String>;
    fn session_get_user(&self, token: &str) -> Option<User>;
    fn session_delete(&self, token: &str) -> Result<(), String>;
    fn session_cleanup_expired(&self);

    // ── Posts ────────────────────────────────────────────────────────
    fn post_find_by_id(&self, id: i64) -> Option<Post>;
    fn post_find_by_slug(&self, slug: &str) -> Option<Post>;
    fn post_published(&self, limit: i64, offset: i64) -> Vec<Post>;
    fn post_create(&self, form: &PostForm) -> Result<i64, String>;
}
