//! Card URL injection into existing social-image meta tags.
//!
//! Only two tag shapes are recognised, each matched literally:
//!
//! ```text
//! <meta property="og:image" content="URL">
//! <meta name="twitter:image:src" content="URL" />
//! ```
//!
//! `URL` must consist of ASCII letters, digits and `; : / ? .`. A tag whose
//! current URL falls outside that set (a hyphen, an underscore, a `%`) is left
//! alone. Tags are never inserted; a document without them keeps its markup.
//! Only the first match of each pattern is replaced.

use regex::Regex;
use std::sync::LazyLock;

static OG_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s*property="og:image"\s*content="([A-Za-z0-9;:/?.]*)"\s*/?>"#)
        .expect("og:image pattern")
});

static TWITTER_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s*name="twitter:image:src"\s*content="([A-Za-z0-9;:/?.]*)"\s*/?>"#)
        .expect("twitter:image:src pattern")
});

/// Point the document's `og:image` and `twitter:image:src` tags at `url`.
pub fn rewrite_card_url(html: &str, url: &str) -> String {
    let html = replace_first_capture(&OG_IMAGE_REGEX, html, url);
    replace_first_capture(&TWITTER_IMAGE_REGEX, &html, url)
}

/// Replace the first capture group of the first match, leaving the rest of
/// the tag byte-for-byte intact.
fn replace_first_capture(regex: &Regex, haystack: &str, replacement: &str) -> String {
    let Some(url) = regex.captures(haystack).and_then(|caps| caps.get(1)) else {
        return haystack.to_string();
    };
    let mut out = String::with_capacity(haystack.len() + replacement.len());
    out.push_str(&haystack[..url.start()]);
    out.push_str(replacement);
    out.push_str(&haystack[url.end()..]);
    out
}
