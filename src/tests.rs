#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::embed::config::{self, EmbedConfig, OPT_IMAGE_URL, OPT_SHOW_AUTHOR, OPT_SHOW_EXCERPT};
use crate::embed::{ContentItem, OEmbedResponse};
use crate::models::post::{PostForm, PostKind};
use crate::models::user::CAP_MANAGE_OPTIONS;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Fresh in-memory store with migrations, host defaults and embed options applied.
/// Shared cache so every pooled connection sees the same data.
fn test_store() -> Arc<SqliteStore> {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .expect("Failed to create test pool");
    let store = SqliteStore::new(pool);
    crate::prepare_store(&store).expect("Failed to prepare store");
    Arc::new(store)
}

fn client_for(store: Arc<SqliteStore>) -> Client {
    let store: Arc<dyn Store> = store;
    Client::tracked(crate::build(store)).expect("valid rocket instance")
}

/// Fast bcrypt hash for tests (cost=4 instead of DEFAULT_COST).
fn fast_hash(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

fn create_user(store: &SqliteStore, email: &str, name: &str, role: &str) -> i64 {
    store
        .user_create(email, &fast_hash("password123"), name, role)
        .unwrap()
}

fn create_post(
    store: &SqliteStore,
    title: &str,
    slug: &str,
    author_id: Option<i64>,
    kind: &str,
    status: &str,
) -> i64 {
    store
        .post_create(&PostForm {
            title: title.to_string(),
            slug: slug.to_string(),
            content_html: "<p>Some <strong>body</strong> text for the preview.</p>".to_string(),
            excerpt: None,
            author_id,
            kind: kind.to_string(),
            status: status.to_string(),
            published_at: None,
        })
        .unwrap()
}

fn login(client: &Client, email: &str, password: &str) -> Status {
    client
        .post("/admin/login")
        .header(ContentType::Form)
        .body(format!(
            "email={}&password={}",
            email.replace('@', "%40"),
            password
        ))
        .dispatch()
        .status()
}

fn location(response: &rocket::local::blocking::LocalResponse<'_>) -> Option<String> {
    response.headers().get_one("Location").map(str::to_string)
}

// ═══════════════════════════════════════════════════════════
// Settings store
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_set_and_get() {
    let store = test_store();
    store.setting_set("test_key", "hello").unwrap();
    assert_eq!(store.setting_get("test_key"), Some("hello".to_string()));
    store.setting_set("test_key", "world").unwrap();
    assert_eq!(store.setting_get_or("test_key", "x"), "world");
}

#[test]
fn settings_add_never_overwrites() {
    let store = test_store();
    assert!(store.setting_add("fresh_key", "one").unwrap());
    assert!(!store.setting_add("fresh_key", "two").unwrap());
    assert_eq!(store.setting_get("fresh_key").as_deref(), Some("one"));
}

#[test]
fn settings_set_many_and_delete() {
    let store = test_store();
    let mut batch = HashMap::new();
    batch.insert("a".to_string(), "1".to_string());
    batch.insert("b".to_string(), "true".to_string());
    store.setting_set_many(&batch).unwrap();

    assert_eq!(store.setting_get_i64("a"), 1);
    assert!(store.setting_get_bool("b"));

    store.setting_delete("a").unwrap();
    assert_eq!(store.setting_get("a"), None);
    assert!(store.setting_all().contains_key("b"));
}

#[test]
fn host_defaults_seeded() {
    let store = test_store();
    assert_eq!(store.setting_get_or("site_name", ""), "Clean Embed");
    assert_eq!(store.setting_get_or("site_url", ""), "http://localhost:8000");
    assert_eq!(store.setting_get_i64("login_rate_limit"), 5);
}

// ═══════════════════════════════════════════════════════════
// Activation and EmbedConfig
// ═══════════════════════════════════════════════════════════

#[test]
fn activation_seeds_embed_defaults() {
    let store = test_store();
    assert_eq!(store.setting_get(OPT_IMAGE_URL).as_deref(), Some(""));
    assert_eq!(store.setting_get(OPT_SHOW_AUTHOR).as_deref(), Some("true"));
    assert_eq!(store.setting_get(OPT_SHOW_EXCERPT).as_deref(), Some("true"));
    assert_eq!(EmbedConfig::load(&*store), EmbedConfig::default());
}

#[test]
fn activation_keeps_saved_values() {
    let store = test_store();
    store.setting_set(OPT_IMAGE_URL, "https://cdn.example.com/card.png").unwrap();
    store.setting_set(OPT_SHOW_AUTHOR, "false").unwrap();

    config::activate(&*store).unwrap();
    crate::prepare_store(&*store).unwrap();

    let config = EmbedConfig::load(&*store);
    assert_eq!(config.image_url, "https://cdn.example.com/card.png");
    assert!(!config.show_author);
    assert!(config.show_excerpt);
}

#[test]
fn activation_restores_deleted_option() {
    let store = test_store();
    store.setting_delete(OPT_SHOW_EXCERPT).unwrap();
    config::activate(&*store).unwrap();
    assert_eq!(store.setting_get(OPT_SHOW_EXCERPT).as_deref(), Some("true"));
}

#[test]
fn embed_config_save_and_load() {
    let store = test_store();
    let config = EmbedConfig {
        image_url: "https://example.com/img.png".to_string(),
        show_author: false,
        show_excerpt: true,
    };
    config.save(&*store).unwrap();

    assert_eq!(store.setting_get(OPT_SHOW_AUTHOR).as_deref(), Some("false"));
    assert_eq!(EmbedConfig::load(&*store), config);
}

// ═══════════════════════════════════════════════════════════
// Content items
// ═══════════════════════════════════════════════════════════

#[test]
fn content_item_from_post_with_auto_excerpt() {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    let id = create_post(&store, "Hello <em>World</em>", "hello-world", Some(author), "post", "published");

    let post = store.post_find_by_id(id).unwrap();
    let item = ContentItem::from_post(&*store, &post).unwrap();

    assert_eq!(item.kind, PostKind::Post);
    assert_eq!(item.title, "Hello World");
    assert_eq!(item.author_name, "Jane");
    assert_eq!(item.excerpt, "Some body text for the preview.");
    assert_eq!(item.permalink, "http://localhost:8000/hello-world");
}

#[test]
fn content_item_prefers_manual_excerpt() {
    let store = test_store();
    let id = store
        .post_create(&PostForm {
            title: "About".to_string(),
            slug: "about".to_string(),
            content_html: "<p>Long body.</p>".to_string(),
            excerpt: Some("Short <b>summary</b>".to_string()),
            author_id: None,
            kind: "page".to_string(),
            status: "published".to_string(),
            published_at: None,
        })
        .unwrap();

    let post = store.post_find_by_id(id).unwrap();
    let item = ContentItem::from_post(&*store, &post).unwrap();
    assert_eq!(item.kind, PostKind::Page);
    assert_eq!(item.excerpt, "Short summary");
    assert_eq!(item.author_name, "");
}

#[test]
fn content_item_rejects_unknown_kind() {
    let store = test_store();
    {
        let conn = store.pool.get().unwrap();
        conn.execute(
            "INSERT INTO posts (title, slug, content_html, kind, status)
             VALUES ('Attachment', 'attachment', '', 'attachment', 'published')",
            [],
        )
        .unwrap();
    }
    let post = store.post_find_by_slug("attachment").unwrap();
    assert!(post.kind().is_none());
    assert!(ContentItem::from_post(&*store, &post).is_none());
}

#[test]
fn content_item_text_is_decoded_once() {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    create_post(&store, "Using &lt;div&gt; tags", "div-tags", Some(author), "post", "published");
    create_post(&store, "Why 1 < 2 matters", "one-less-than-two", Some(author), "post", "published");
    create_post(&store, "AT&amp;amp;T", "att", Some(author), "post", "published");
    let config = EmbedConfig::default();

    let title_for = |slug: &str| {
        let post = store.post_find_by_slug(slug).unwrap();
        let item = ContentItem::from_post(&*store, &post).unwrap();
        (item.title.clone(), crate::embed::head::preview_title(&config, &item))
    };

    assert_eq!(
        title_for("div-tags"),
        ("Using <div> tags".to_string(), "Using <div> tags by Jane".to_string())
    );
    assert_eq!(
        title_for("one-less-than-two"),
        ("Why 1 < 2 matters".to_string(), "Why 1 < 2 matters by Jane".to_string())
    );
    assert_eq!(
        title_for("att"),
        ("AT&amp;T".to_string(), "AT&amp;T by Jane".to_string())
    );
}

#[test]
fn decoded_titles_reach_head_and_oembed_intact() {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    create_post(&store, "Using &lt;div&gt; tags", "div-tags", Some(author), "post", "published");
    create_post(&store, "Why 1 < 2 matters", "one-less-than-two", Some(author), "post", "published");
    let client = client_for(store);

    let body = client.get("/div-tags").dispatch().into_string().unwrap();
    assert!(body.contains(
        "<meta property=\"og:title\" content=\"Using &lt;div&gt; tags by Jane\" />"
    ));

    let record: OEmbedResponse = client
        .get("/api/oembed?url=http%3A%2F%2Flocalhost%3A8000%2Fone-less-than-two")
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(record.title, "Why 1 < 2 matters");
}

#[test]
fn published_lists_only_published_posts() {
    let store = test_store();
    create_post(&store, "Live", "live", None, "post", "published");
    create_post(&store, "Draft", "draft", None, "post", "draft");
    create_post(&store, "Page", "page", None, "page", "published");

    let posts = store.post_published(10, 0);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "live");
}

// ═══════════════════════════════════════════════════════════
// Public pages
// ═══════════════════════════════════════════════════════════

#[test]
fn single_post_has_open_graph_tags() {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    create_post(&store, "Hello World", "hello-world", Some(author), "post", "published");
    let client = client_for(store);

    let response = client.get("/hello-world").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();

    assert!(body.contains("<!-- Clean Embed -->"));
    assert!(body.contains("<meta property=\"og:title\" content=\"Hello World by Jane\" />"));
    assert!(body.contains(
        "<meta property=\"og:description\" content=\"Some body text for the preview.\" />"
    ));
    assert!(body.contains("<meta property=\"og:url\" content=\"http://localhost:8000/hello-world\" />"));
    assert!(!body.contains("og:image"));
    assert!(body.contains("<!-- End Clean Embed -->"));
    assert!(body.contains("application/json+oembed"));
}

#[test]
fn single_page_hides_author_when_disabled() {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    create_post(&store, "Contact", "contact", Some(author), "page", "published");
    EmbedConfig {
        image_url: "https://cdn.example.com/card.png".to_string(),
        show_author: false,
        show_excerpt: false,
    }
    .save(&*store)
    .unwrap();
    let client = client_for(store);

    let body = client.get("/contact").dispatch().into_string().unwrap();
    assert!(body.contains("<meta property=\"og:title\" content=\"Contact\" />"));
    assert!(!body.contains(" by Jane"));
    assert!(body.contains("<meta property=\"og:description\" content=\"\" />"));
    assert!(body.contains(
        "<meta property=\"og:image\" content=\"https://cdn.example.com/card.png\" />"
    ));
}

#[test]
fn homepage_has_no_open_graph_tags() {
    let store = test_store();
    create_post(&store, "Hello World", "hello-world", None, "post", "published");
    let client = client_for(store);

    let response = client.get("/").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().unwrap();
    assert!(body.contains("Hello World"));
    assert!(!body.contains("og:title"));
    assert!(!body.contains("Clean Embed -->"));
}

#[test]
fn draft_and_missing_posts_are_not_found() {
    let store = test_store();
    create_post(&store, "Secret", "secret", None, "post", "draft");
    let client = client_for(store);

    assert_eq!(client.get("/secret").dispatch().status(), Status::NotFound);
    assert_eq!(client.get("/nope").dispatch().status(), Status::NotFound);
}

// ═══════════════════════════════════════════════════════════
// oEmbed endpoint
// ═══════════════════════════════════════════════════════════

const OEMBED_HELLO: &str = "/api/oembed?url=http%3A%2F%2Flocalhost%3A8000%2Fhello-world";

fn oembed_store() -> Arc<SqliteStore> {
    let store = test_store();
    let author = create_user(&store, "jane@example.com", "Jane", "author");
    create_post(&store, "Hello World", "hello-world", Some(author), "post", "published");
    store
}

#[test]
fn oembed_strips_author_for_discord() {
    let client = client_for(oembed_store());
    let response = client
        .get(OEMBED_HELLO)
        .header(Header::new(
            "User-Agent",
            "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)",
        ))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let record: OEmbedResponse = response.into_json().unwrap();
    assert_eq!(record.author_name, "");
    assert_eq!(record.title, "Hello World");
    assert_eq!(record.provider_name, "Clean Embed");
    assert_eq!(record.kind, "rich");
}

#[test]
fn oembed_keeps_author_for_other_clients() {
    let client = client_for(oembed_store());

    let record: OEmbedResponse = client
        .get(OEMBED_HELLO)
        .header(Header::new("User-Agent", "Slackbot-LinkExpanding 1.0"))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(record.author_name, "Jane");

    let record: OEmbedResponse = client.get(OEMBED_HELLO).dispatch().into_json().unwrap();
    assert_eq!(record.author_name, "Jane");
}

#[test]
fn oembed_honours_maxwidth() {
    let client = client_for(oembed_store());
    let record: OEmbedResponse = client
        .get(format!("{}&maxwidth=320&maxheight=10", OEMBED_HELLO))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(record.width, 320);
    assert_eq!(record.height, 200);
}

#[test]
fn oembed_xml_format() {
    let client = client_for(oembed_store());
    let response = client
        .get(format!("{}&format=xml", OEMBED_HELLO))
        .header(Header::new("User-Agent", "Discordbot/2.0"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::XML));

    let body = response.into_string().unwrap();
    assert!(body.contains("<oembed>"));
    assert!(body.contains("<title>Hello World</title>"));
    assert!(!body.contains("Jane"));
}

#[test]
fn oembed_unknown_format_and_url() {
    let client = client_for(oembed_store());
    assert_eq!(
        client.get(format!("{}&format=yaml", OEMBED_HELLO)).dispatch().status(),
        Status::NotImplemented
    );
    assert_eq!(
        client
            .get("/api/oembed?url=http%3A%2F%2Flocalhost%3A8000%2Fmissing")
            .dispatch()
            .status(),
        Status::NotFound
    );
    assert_eq!(
        client
            .get("/api/oembed?url=https%3A%2F%2Fother.example%2Fhello-world")
            .dispatch()
            .status(),
        Status::NotFound
    );
}

// ═══════════════════════════════════════════════════════════
// Admin settings page
// ═══════════════════════════════════════════════════════════

#[test]
fn admin_redirects_to_setup_on_fresh_install() {
    let client = client_for(test_store());
    let response = client.get("/admin/settings/discord-embed").dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response).as_deref(), Some("/admin/setup"));
}

#[test]
fn admin_redirects_to_login_without_session() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store);

    let response = client.get("/admin/settings/discord-embed").dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));

    let response = client
        .post("/admin/settings/discord-embed")
        .body("clean_embed_show_author=0")
        .dispatch();
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));
}

#[test]
fn only_active_admins_manage_options() {
    let store = test_store();
    let admin = create_user(&store, "admin@example.com", "Admin", "admin");
    let writer = create_user(&store, "writer@example.com", "Writer", "author");
    let admin = store.user_get_by_id(admin).unwrap();
    let writer = store.user_get_by_id(writer).unwrap();

    assert!(admin.can(CAP_MANAGE_OPTIONS));
    assert!(!writer.can(CAP_MANAGE_OPTIONS));
    assert!(!admin.can("edit_posts"));

    let mut suspended = admin.clone();
    suspended.status = "suspended".to_string();
    assert!(!suspended.can(CAP_MANAGE_OPTIONS));
}

#[test]
fn login_rejects_bad_password() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store);

    let response = client
        .post("/admin/login")
        .header(ContentType::Form)
        .body("email=admin%40example.com&password=wrong-password")
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("Invalid credentials"));
}

#[test]
fn admin_renders_settings_form() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store);
    assert_eq!(login(&client, "admin@example.com", "password123"), Status::SeeOther);

    let response = client.get("/admin/settings/discord-embed").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(response.headers().get_one("Cache-Control").unwrap().contains("no-store"));

    let body = response.into_string().unwrap();
    assert!(body.contains("Discord Embed Settings"));
    assert!(body.contains("Main Settings"));
    assert!(body.contains("name=\"clean_embed_image_url\""));
    assert!(body.contains("name=\"clean_embed_show_author\""));
    assert!(body.contains("name=\"clean_embed_show_excerpt\""));

    let index = client.get("/admin/settings").dispatch().into_string().unwrap();
    assert!(index.contains("/admin/settings/discord-embed"));
}

#[test]
fn admin_saves_settings_with_hidden_fallbacks() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store.clone());
    login(&client, "admin@example.com", "password123");

    // Author box unticked: only its hidden "0" arrives.
    let response = client
        .post("/admin/settings/discord-embed")
        .header(ContentType::Form)
        .body(
            "clean_embed_image_url=cdn.example.com%2Fcard.png\
             &clean_embed_show_author=0\
             &clean_embed_show_excerpt=0&clean_embed_show_excerpt=1",
        )
        .dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response).as_deref(), Some("/admin/settings/discord-embed"));

    assert_eq!(store.setting_get(OPT_SHOW_AUTHOR).as_deref(), Some("false"));
    assert_eq!(store.setting_get(OPT_SHOW_EXCERPT).as_deref(), Some("true"));
    assert_eq!(
        store.setting_get(OPT_IMAGE_URL).as_deref(),
        Some("http://cdn.example.com/card.png")
    );

    let page = client.get("/admin/settings/discord-embed").dispatch().into_string().unwrap();
    assert!(page.contains("Settings saved."));
}

#[test]
fn admin_rejects_invalid_image_url() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store.clone());
    login(&client, "admin@example.com", "password123");

    client
        .post("/admin/settings/discord-embed")
        .header(ContentType::Form)
        .body("clean_embed_image_url=not+a+url&clean_embed_show_author=0")
        .dispatch();

    // Nothing written: the whole submission is refused.
    assert_eq!(store.setting_get(OPT_IMAGE_URL).as_deref(), Some(""));
    assert_eq!(store.setting_get(OPT_SHOW_AUTHOR).as_deref(), Some("true"));

    let page = client.get("/admin/settings/discord-embed").dispatch().into_string().unwrap();
    assert!(page.contains("Settings not saved"));
}

#[test]
fn admin_denies_users_without_manage_options() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    create_user(&store, "writer@example.com", "Writer", "author");
    let client = client_for(store.clone());
    assert_eq!(login(&client, "writer@example.com", "password123"), Status::SeeOther);

    let response = client.get("/admin/settings/discord-embed").dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));

    client
        .post("/admin/settings/discord-embed")
        .header(ContentType::Form)
        .body("clean_embed_show_author=0")
        .dispatch();
    assert_eq!(store.setting_get(OPT_SHOW_AUTHOR).as_deref(), Some("true"));
}

#[test]
fn logout_ends_session() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    let client = client_for(store);
    login(&client, "admin@example.com", "password123");
    assert_eq!(client.get("/admin/settings").dispatch().status(), Status::Ok);

    let response = client.get("/admin/logout").dispatch();
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));

    let response = client.get("/admin/settings").dispatch();
    assert_eq!(response.status(), Status::SeeOther);
}

#[test]
fn setup_page_available_only_before_first_user() {
    let store = test_store();
    let client = client_for(store.clone());
    let response = client.get("/admin/setup").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("site_url"));

    create_user(&store, "admin@example.com", "Admin", "admin");
    let response = client.get("/admin/setup").dispatch();
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));
}

fn setup_body(site_url: &str, password: &str, confirm: &str) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("site_name", "My Blog")
        .append_pair("site_url", site_url)
        .append_pair("display_name", "Jane")
        .append_pair("email", "jane@example.com")
        .append_pair("password", password)
        .append_pair("confirm_password", confirm);
    form.finish()
}

fn submit_setup<'c>(
    client: &'c Client,
    body: String,
) -> rocket::local::blocking::LocalResponse<'c> {
    client
        .post("/admin/setup")
        .header(ContentType::Form)
        .body(body)
        .dispatch()
}

#[test]
fn setup_creates_admin_and_sample_post() {
    let store = test_store();
    let client = client_for(store.clone());

    let response = submit_setup(
        &client,
        setup_body("http://blog.example.com/", "longpassword", "longpassword"),
    );
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response).as_deref(), Some("/admin/settings"));

    assert_eq!(store.user_count(), 1);
    let admin = store.user_get_by_email("jane@example.com").unwrap();
    assert_eq!(admin.role, "admin");
    assert_eq!(admin.display_name, "Jane");
    assert!(crate::security::auth::verify_password("longpassword", &admin.password_hash));
    assert_eq!(store.setting_get_or("site_name", ""), "My Blog");
    assert_eq!(store.setting_get_or("site_url", ""), "http://blog.example.com");

    let sample = store.post_find_by_slug("hello-world").unwrap();
    assert!(sample.is_published());
    assert_eq!(sample.author_id, Some(admin.id));

    // Signed in straight away
    assert_eq!(client.get("/admin/settings").dispatch().status(), Status::Ok);

    let body = client.get("/hello-world").dispatch().into_string().unwrap();
    assert!(body.contains("<meta property=\"og:title\" content=\"Hello world! by Jane\" />"));
    assert!(body.contains(
        "<meta property=\"og:url\" content=\"http://blog.example.com/hello-world\" />"
    ));

    // A second run is refused
    let response = submit_setup(
        &client,
        setup_body("http://other.example.com", "anotherpass", "anotherpass"),
    );
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));
    assert_eq!(store.user_count(), 1);
}

#[test]
fn setup_rejects_weak_or_mismatched_password() {
    let store = test_store();
    let client = client_for(store.clone());

    let response = submit_setup(&client, setup_body("http://blog.example.com", "short", "short"));
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("at least 8 characters"));

    let response = submit_setup(
        &client,
        setup_body("http://blog.example.com", "longpassword", "longpassw0rd"),
    );
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("Passwords do not match."));

    assert_eq!(store.user_count(), 0);
    assert!(store.post_find_by_slug("hello-world").is_none());
    assert_eq!(store.setting_get_or("site_name", ""), "Clean Embed");
}

#[test]
fn setup_rejects_unsafe_site_url() {
    let store = test_store();
    let client = client_for(store.clone());

    let response = submit_setup(&client, setup_body("javascript:x", "longpassword", "longpassword"));
    assert_eq!(response.status(), Status::Ok);
    assert!(response.into_string().unwrap().contains("is not allowed"));

    assert_eq!(store.user_count(), 0);
    assert_eq!(store.setting_get_or("site_url", ""), "http://localhost:8000");
}

#[test]
fn login_rate_limited_after_repeated_failures() {
    let store = test_store();
    create_user(&store, "admin@example.com", "Admin", "admin");
    store.setting_set("login_rate_limit", "2").unwrap();
    let client = client_for(store);

    login(&client, "admin@example.com", "bad");
    login(&client, "admin@example.com", "bad");
    let response = client
        .post("/admin/login")
        .header(ContentType::Form)
        .body("email=admin%40example.com&password=password123")
        .dispatch();
    assert!(response.into_string().unwrap().contains("Too many login attempts"));
}
