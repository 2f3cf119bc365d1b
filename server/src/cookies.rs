//! Minimal `Cookie` / `Set-Cookie` handling.

use axum::http::{header, HeaderMap};

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// An HttpOnly cookie for the whole site.
///
/// `secure` selects `SameSite=None; Secure`, which browsers require for
/// cookies sent to an API on another origin.
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let same_site = if secure {
        "SameSite=None; Secure"
    } else {
        "SameSite=Lax"
    };
    format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; {same_site}")
}

/// A cookie that tells the browser to drop `name` right away.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_get_cookie_finds_value_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc123 ; lang=en"),
        );
        assert_eq!(get_cookie(&headers, "access_token"), Some("abc123"));
        assert_eq!(get_cookie(&headers, "lang"), Some("en"));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_get_cookie_reads_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(get_cookie(&headers, "b"), Some("2"));
    }

    #[test]
    fn test_get_cookie_does_not_match_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token_old=x"));
        assert_eq!(get_cookie(&headers, "access_token"), None);
    }

    #[test]
    fn test_build_cookie_attributes() {
        assert_eq!(
            build_cookie("n", "v", 60, false),
            "n=v; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );
        assert_eq!(
            build_cookie("n", "v", 60, true),
            "n=v; Path=/; Max-Age=60; HttpOnly; SameSite=None; Secure"
        );
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_cookie("access_token", false).starts_with("access_token=; Path=/; Max-Age=0;"));
    }
}
