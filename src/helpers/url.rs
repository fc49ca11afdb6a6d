//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Route prefix for post pages
pub const BLOG_ROOT: &str = "/blog";

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL path of a post page
///
/// # Examples
/// ```ignore
/// post_url(&["tutorials", "getting started"]) // -> "/blog/tutorials/getting%20started"
/// ```
pub fn post_url<S: AsRef<str>>(slug: &[S]) -> String {
    let mut url = BLOG_ROOT.to_string();
    for segment in slug {
        url.push('/');
        url.push_str(&encode_segment(segment.as_ref()));
    }
    url
}

/// Split a (decoded) route tail such as `a/b/` into slug segments
pub fn slug_from_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/hello") // -> "https://example.com/blog/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_url() {
        assert_eq!(post_url(&["hello"]), "/blog/hello");
        assert_eq!(
            post_url(&["tutorials", "getting started"]),
            "/blog/tutorials/getting%20started"
        );
        assert_eq!(post_url(&["a?b", "c#d"]), "/blog/a%3Fb/c%23d");
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path("tutorials/getting-started/"), vec!["tutorials", "getting-started"]);
        assert_eq!(slug_from_path("//hello"), vec!["hello"]);
        assert!(slug_from_path("").is_empty());
    }

    #[test]
    fn test_full_url_for() {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        assert_eq!(
            full_url_for(&config, "/blog/hello"),
            "https://example.com/blog/hello"
        );
    }
}
