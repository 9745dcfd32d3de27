use crate::embed::text::esc_attr;
use crate::embed::ContentItem;
use crate::models::post::Post;

/// oEmbed discovery links for a single item's head.
pub fn oembed_discovery_links(site_url: &str, permalink: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(permalink.as_bytes()).collect();
    let base = site_url.trim_end_matches('/');
    format!(
        "<link rel=\"alternate\" type=\"application/json+oembed\" href=\"{base}/api/oembed?url={url}\" />\n\
         <link rel=\"alternate\" type=\"text/xml+oembed\" href=\"{base}/api/oembed?url={url}&amp;format=xml\" />",
        base = esc_attr(base),
        url = encoded,
    )
}

/// Full document for a single post or page. `head_extra` is inserted
/// verbatim before `</head>`.
pub fn render_single(site_name: &str, post: &Post, item: &ContentItem, head_extra: &str) -> String {
    let byline = if item.author_name.is_empty() {
        String::new()
    } else {
        format!("<p class=\"byline\">by {}</p>", esc_attr(&item.author_name))
    };
    let body = format!(
        "<article class=\"{kind}\">\n<h1>{title}</h1>\n{byline}\n<div class=\"content\">{content}</div>\n</article>",
        kind = item.kind.as_str(),
        title = esc_attr(&item.title),
        byline = byline,
        content = post.content_html,
    );
    document(
        &format!("{} | {}", item.title, site_name),
        head_extra,
        site_name,
        &body,
    )
}

/// Home page: newest published posts.
pub fn render_listing(site_name: &str, items: &[ContentItem], head_extra: &str) -> String {
    let mut body = String::from("<ul class=\"post-list\">\n");
    for item in items {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a><p>{}</p></li>\n",
            esc_attr(&item.permalink),
            esc_attr(&item.title),
            esc_attr(&item.excerpt),
        ));
    }
    if items.is_empty() {
        body.push_str("<li class=\"empty\">Nothing published yet.</li>\n");
    }
    body.push_str("</ul>");
    document(site_name, head_extra, site_name, &body)
}

fn document(title: &str, head_extra: &str, site_name: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
{head_extra}
</head>
<body>
<header><a class="site-name" href="/">{site_name}</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = esc_attr(title),
        head_extra = head_extra,
        site_name = esc_attr(site_name),
        body = body,
    )
}
