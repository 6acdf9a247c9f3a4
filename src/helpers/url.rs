//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a path segment or query value
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/posts/hello") // -> "/blog/posts/hello"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Resolve a site-relative URL against the site's base URL
///
/// `site` is expected to be an origin (scheme and host). A sub-path belongs
/// in `root`, which `url_for` has already applied to `path`; a path left on
/// `site` is kept as-is and would be doubled with `root`.
///
/// # Examples
/// ```ignore
/// absolute_url("https://example.com/", "/posts/a") // -> "https://example.com/posts/a"
/// ```
pub fn absolute_url(site: &str, path: &str) -> String {
    let base = site.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Percent-encode each `/`-separated segment of a path, keeping the separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode a single path segment or query value
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "/posts/hello"), "/posts/hello");
        assert_eq!(url_for("/blog/", "posts/hello"), "/blog/posts/hello");
        assert_eq!(url_for("/blog", ""), "/blog/");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://example.com", "/posts/a?src=rss"),
            "https://example.com/posts/a?src=rss"
        );
        assert_eq!(
            absolute_url("https://example.com/", "posts/a"),
            "https://example.com/posts/a"
        );
    }

    #[test]
    fn test_absolute_url_with_root() {
        let path = url_for("/blog/", "posts/a");
        assert_eq!(
            absolute_url("https://example.com", &path),
            "https://example.com/blog/posts/a"
        );
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("2024/hello-world"), "2024/hello-world");
        assert_eq!(encode_path("caf\u{e9} au lait"), "caf%C3%A9%20au%20lait");
    }
}
