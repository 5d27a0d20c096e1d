use regex::Regex;
use url::Url;

/// Extract the article id from a blog permalink such as
/// `https://blog.example/archives/hello-world/`.
///
/// Query strings and fragments are ignored. Returns `None` for URLs that do not
/// follow the `/archives/<id>` layout; callers use the id for log correlation only.
#[must_use]
pub fn extract_article_id(article_url: &str) -> Option<String> {
    static ARCHIVE_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"/archives/([^/]+)/?$")
            .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
    });

    let url = Url::parse(article_url).ok()?;
    ARCHIVE_RE
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_with_and_without_trailing_slash() {
        assert_eq!(
            extract_article_id("https://blog.example/archives/rust-notes/").as_deref(),
            Some("rust-notes")
        );
        assert_eq!(
            extract_article_id("https://blog.example/archives/42").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn ignores_query_and_fragment() {
        assert_eq!(
            extract_article_id("https://blog.example/archives/42?ref=home#comments").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn rejects_other_layouts() {
        assert_eq!(extract_article_id("https://blog.example/posts/42"), None);
        assert_eq!(extract_article_id("not a url"), None);
    }
}
