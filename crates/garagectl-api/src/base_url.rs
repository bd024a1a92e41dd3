// Base URL normalization.
//
// Users type whatever they like into the settings: a bare host, a host
// with a trailing slash, surrounding whitespace. Everything downstream
// works on the normalized form.

use url::Url;

use crate::error::Error;

/// Normalize a user-supplied device address.
///
/// Trims whitespace, prepends `http://` when no scheme is present, and
/// strips trailing slashes. Blank input normalizes to an empty string,
/// which callers must treat as "not configured".
///
/// ```
/// use garagectl_api::normalize_base_url;
///
/// assert_eq!(normalize_base_url("example.com"), "http://example.com");
/// assert_eq!(normalize_base_url("https://x.test/"), "https://x.test");
/// assert_eq!(normalize_base_url("   "), "");
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    with_scheme.trim_end_matches('/').to_owned()
}

/// Join an endpoint path onto a normalized base URL.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, Error> {
    if base.trim().is_empty() {
        return Err(Error::BlankUrl);
    }
    let full = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&full)?)
}
