use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// Capability required to change site options.
pub const CAP_MANAGE_OPTIONS: &str = "manage_options";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,   // admin, editor, author, subscriber
    pub status: String, // active, suspended
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            display_name: row.get(3)?,
            role: row.get(4)?,
            status: row.get(5)?,
            last_login_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    const SELECT_COLS: &'static str =
        "id, email, password_hash, display_name, role, status, last_login_at, created_at, updated_at";

    // ── Lookups ──

    pub fn get_by_id(pool: &DbPool, id: i64) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", Self::SELECT_COLS),
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn get_by_email(pool: &DbPool, email: &str) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM users WHERE email = ?1 COLLATE NOCASE",
                Self::SELECT_COLS
            ),
            params![email.trim()],
            Self::from_row,
        )
        .ok()
    }

    /// Resolve the user behind a live (unexpired) session token.
    pub fn get_by_session(pool: &DbPool, token: &str) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM users WHERE id = (
                    SELECT user_id FROM sessions WHERE id = ?1 AND expires_at > datetime('now')
                 )",
                Self::SELECT_COLS
            ),
            params![token],
            Self::from_row,
        )
        .ok()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ── Mutations ──

    pub fn create(
        pool: &DbPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO users (email, password_hash, display_name, role)
             VALUES (?1, ?2, ?3, ?4)",
            params![email.trim(), password_hash, display_name, role],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn touch_last_login(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE users SET last_login_at = datetime('now') WHERE id = ?1",
            params![id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    // ── Roles ──

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Role → capability table.
    pub fn can(&self, capability: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        match capability {
            CAP_MANAGE_OPTIONS => self.is_admin(),
            _ => false,
        }
    }
}
