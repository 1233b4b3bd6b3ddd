//! Card text extraction from HTML documents.
//!
//! Each card carries two pieces of text, each resolved independently:
//!
//! - **Title**: the text content of the document's `<title>` element. When a
//!   document has several, their text is concatenated in document order.
//! - **Description**: the `content` attribute of the first
//!   `<meta name="description">` element. Absent tag means empty description.
//!
//! Either default can be replaced by a resolver in
//! [`RenderOptions`](crate::options::RenderOptions). Whatever the source, the
//! result goes through [`sanitize`](crate::sanitize::sanitize) before it is
//! drawn.
//!
//! [`HtmlQuery`] is the queryable view handed to resolvers. It parses once per
//! document with `kuchiki` (html5ever), so malformed markup is recovered the
//! way a browser would rather than rejected.

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;

/// Parsed, CSS-selectable view of an HTML document.
pub struct HtmlQuery {
    root: NodeRef,
}

impl HtmlQuery {
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
        }
    }

    /// Text content of every element matching `selector`, concatenated.
    ///
    /// An invalid selector matches nothing.
    pub fn text(&self, selector: &str) -> String {
        let Ok(matches) = self.root.select(selector) else {
            tracing::debug!(selector, "invalid selector");
            return String::new();
        };
        matches.map(|node| node.as_node().text_contents()).collect()
    }

    /// Attribute `name` of the first element matching `selector`.
    pub fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let node = self.root.select_first(selector).ok()?;
        let attributes = node.attributes.borrow();
        attributes.get(name).map(str::to_string)
    }

    /// Value of the first element matching `selector`: its `content`
    /// attribute when present (meta tags), otherwise its text content.
    pub fn value(&self, selector: &str) -> Option<String> {
        let node = self.root.select_first(selector).ok()?;
        let content = node.attributes.borrow().get("content").map(str::to_string);
        Some(content.unwrap_or_else(|| node.as_node().text_contents()))
    }
}

/// Default title: the concatenated `<title>` text.
pub fn extract_title(query: &HtmlQuery) -> String {
    query.text("title")
}

/// Default description: `<meta name="description" content="...">`.
pub fn extract_description(query: &HtmlQuery) -> Option<String> {
    query.attr("meta[name='description']", "content")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>Hello World</title>
  <meta name="description" content="A page about greetings">
  <meta property="og:title" content="OG Title">
</head>
<body><h1 class="headline">Greetings</h1><p>Body text</p></body>
</html>"#;

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn title_from_title_element() {
        assert_eq!(extract_title(&HtmlQuery::parse(PAGE)), "Hello World");
    }

    #[test]
    fn title_missing_is_empty() {
        let q = HtmlQuery::parse("<html><body>no title</body></html>");
        assert_eq!(extract_title(&q), "");
    }

    #[test]
    fn title_minimal_document() {
        let q = HtmlQuery::parse("<html><title>Hello World</title></html>");
        assert_eq!(extract_title(&q), "Hello World");
    }

    #[test]
    fn title_concatenates_all_title_elements() {
        let q = HtmlQuery::parse("<html><head><title>Page</title><title>Two</title></head></html>");
        assert_eq!(extract_title(&q), "PageTwo");
    }

    #[test]
    fn title_entities_are_decoded() {
        let q = HtmlQuery::parse("<title>Fish &amp; Chips</title>");
        assert_eq!(extract_title(&q), "Fish & Chips");
    }

    #[test]
    fn description_from_meta_content() {
        assert_eq!(
            extract_description(&HtmlQuery::parse(PAGE)),
            Some("A page about greetings".to_string())
        );
    }

    #[test]
    fn description_missing_is_none() {
        let q = HtmlQuery::parse("<html><title>T</title></html>");
        assert_eq!(extract_description(&q), None);
    }

    #[test]
    fn description_uses_first_meta() {
        let q = HtmlQuery::parse(
            r#"<meta name="description" content="first"><meta name="description" content="second">"#,
        );
        assert_eq!(extract_description(&q), Some("first".to_string()));
    }

    // =========================================================================
    // HtmlQuery
    // =========================================================================

    #[test]
    fn value_prefers_content_attribute() {
        let q = HtmlQuery::parse(PAGE);
        assert_eq!(
            q.value("meta[property='og:title']"),
            Some("OG Title".to_string())
        );
    }

    #[test]
    fn value_falls_back_to_text() {
        let q = HtmlQuery::parse(PAGE);
        assert_eq!(q.value("h1.headline"), Some("Greetings".to_string()));
    }

    #[test]
    fn value_no_match_is_none() {
        let q = HtmlQuery::parse(PAGE);
        assert_eq!(q.value("h2"), None);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let q = HtmlQuery::parse(PAGE);
        assert_eq!(q.text("[[["), "");
        assert_eq!(q.attr("[[[", "content"), None);
        assert_eq!(q.value("[[["), None);
    }

    #[test]
    fn attr_missing_attribute_is_none() {
        let q = HtmlQuery::parse(PAGE);
        assert_eq!(q.attr("h1", "content"), None);
    }
}
