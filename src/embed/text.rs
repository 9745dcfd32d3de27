//! Plain-text and escaping helpers shared by the head renderer, the oEmbed
//! builder and the settings form.

use std::sync::OnceLock;

use regex::Regex;

use super::sanitize::normalize_url;

/// Words kept when an excerpt is derived from the body.
pub const EXCERPT_WORDS: usize = 55;

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)>")
            .expect("script/style pattern compiles")
    })
}

/// Strip markup and return collapsed plain text.
///
/// `<script>`/`<style>` elements are dropped with their content, every other
/// tag is removed, common entities are decoded and whitespace runs collapse
/// to a single space. A `<` not followed by a tag name, `/`, `!` or `?` is
/// kept as text. Apply once: the output is text, not markup.
pub fn strip_tags(html: &str) -> String {
    let without_code = script_style_re().replace_all(html, " ");

    let mut out = String::with_capacity(without_code.len());
    let mut inside_tag = false;
    let mut chars = without_code.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '<' if !inside_tag => {
                if chars.peek().is_some_and(|&c| opens_tag(c)) {
                    inside_tag = true;
                } else {
                    out.push('<');
                }
            }
            '>' if inside_tag => {
                inside_tag = false;
                out.push(' ');
            }
            _ if !inside_tag => out.push(ch),
            _ => {}
        }
    }

    decode_entities(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn opens_tag(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
}

/// Decode the handful of entities that show up in titles and excerpts.
/// Unknown entities are left as written.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let name = &tail[1..end];
            decode_entity(name).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "hellip" => Some('…'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Keep at most `max` Unicode scalar values.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Excerpt derived from a post body: plain text, first `max_words` words,
/// `…` appended when anything was cut.
pub fn auto_excerpt(content_html: &str, max_words: usize) -> String {
    let text = strip_tags(content_html);
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text
    } else {
        format!("{}…", words[..max_words].join(" "))
    }
}

/// Escape a value for use inside a double- or single-quoted HTML attribute.
pub fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a URL for output in an attribute.
///
/// Anything that does not normalize to an `http`/`https` URL becomes the
/// empty string; otherwise the normalized form is returned with `&` and `'`
/// entity-encoded.
pub fn esc_url(raw: &str) -> String {
    match normalize_url(raw) {
        Ok(Some(url)) => url
            .as_str()
            .replace('&', "&#038;")
            .replace('\'', "&#039;"),
        _ => String::new(),
    }
}
