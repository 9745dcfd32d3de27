use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// Content types that can be viewed on their own page and embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    Page,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Post => "post",
            PostKind::Page => "page",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(PostKind::Post),
            "page" => Some(PostKind::Page),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub author_id: Option<i64>,
    pub kind: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub author_id: Option<i64>,
    pub kind: String,
    pub status: String,
    pub published_at: Option<String>,
}

impl Post {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Post {
            id: row.get("id")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            content_html: row.get("content_html")?,
            excerpt: row.get("excerpt")?,
            author_id: row.get("author_id")?,
            kind: row.get("kind")?,
            status: row.get("status")?,
            published_at: row.get("published_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn kind(&self) -> Option<PostKind> {
        PostKind::parse(&self.kind)
    }

    pub fn is_published(&self) -> bool {
        self.status == "published"
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM posts WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn find_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM posts WHERE slug = ?1",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn published(pool: &DbPool, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(
            "SELECT * FROM posts WHERE status = 'published' AND kind = 'post'
             ORDER BY COALESCE(published_at, created_at) DESC, id DESC LIMIT ?1 OFFSET ?2",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![limit, offset], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, form: &PostForm) -> Result<i64, String> {
        let kind = PostKind::parse(&form.kind)
            .ok_or_else(|| format!("Unknown content kind '{}'", form.kind))?;
        let slug = if form.slug.trim().is_empty() {
            slug::slugify(&form.title)
        } else {
            slug::slugify(form.slug.trim())
        };
        if slug.is_empty() {
            return Err("A slug or title is required".to_string());
        }
        let published_at = form
            .published_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.replace('T', " "));

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO posts (title, slug, content_html, excerpt, author_id, kind, status, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7,
                     CASE WHEN ?7 = 'published' THEN COALESCE(?8, datetime('now')) ELSE ?8 END)",
            params![
                form.title,
                slug,
                form.content_html,
                form.excerpt,
                form.author_id,
                kind.as_str(),
                form.status,
                published_at,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }
}
