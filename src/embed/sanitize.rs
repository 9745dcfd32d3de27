use thiserror::Error;
use url::Url;

/// Longest image URL the settings form will store.
pub const URL_MAX_CHARS: usize = 300;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid URL")]
    InvalidUrl(String),
    #[error("URL scheme '{0}' is not allowed; use http or https")]
    DisallowedScheme(String),
}

/// Parse user input into an absolute http(s) URL.
///
/// Empty (after trimming) is `Ok(None)`. A bare `host/path` gets `http://`
/// prepended, matching how browsers treat typed addresses.
pub fn normalize_url(raw: &str) -> Result<Option<Url>, ValidationError> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let candidate = if !cleaned.contains("://") && looks_like_host_path(&cleaned) {
        format!("http://{}", cleaned)
    } else {
        cleaned.clone()
    };

    let url = Url::parse(&candidate).map_err(|_| ValidationError::InvalidUrl(cleaned.clone()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ValidationError::DisallowedScheme(url.scheme().to_string()));
    }
    match url.host_str() {
        Some(h) if !h.is_empty() => Ok(Some(url)),
        _ => Err(ValidationError::InvalidUrl(cleaned)),
    }
}

/// `example.com/x.png` but not `mailto:x`, `/relative` or `two words`.
fn looks_like_host_path(s: &str) -> bool {
    let host = s.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty()
        && host.contains('.')
        && !host.contains(':')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || !c.is_ascii())
}

/// Sanitizer for the image URL option: normalized and capped at
/// [`URL_MAX_CHARS`]; empty input stays empty.
pub fn sanitize_url(raw: &str) -> Result<String, ValidationError> {
    Ok(normalize_url(raw)?
        .map(|u| cap_url(u.as_str(), URL_MAX_CHARS))
        .unwrap_or_default())
}

/// Cut to `max` characters without leaving a partial `%XX` escape behind.
fn cap_url(url: &str, max: usize) -> String {
    let mut out = super::text::truncate_chars(url, max);
    if out.len() < url.len() {
        if let Some(pct) = out.rfind('%') {
            if out.len() - pct < 3 {
                out.truncate(pct);
            }
        }
    }
    out
}

/// Strict boolean: `true`, `1`, `yes`, `on` (any case); everything else,
/// including a missing value, is false.
pub fn sanitize_bool(raw: Option<&str>) -> bool {
    match raw {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        None => false,
    }
}
