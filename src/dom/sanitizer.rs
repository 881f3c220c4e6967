use crate::dom::document::Document;
use scraper::Node;
use tracing::debug;

/// Elements dropped together with their subtrees.
pub const REMOVED_TAGS: &[&str] = &["style", "script", "head", "svg", "iframe"];

fn is_removable(node: &Node) -> bool {
    match node {
        Node::Comment(_) => true,
        Node::Element(element) => REMOVED_TAGS.contains(&element.name()),
        _ => false,
    }
}

/// Strip noise subtrees in place. Returns the number of nodes removed.
pub fn sanitize_document(document: &mut Document) -> usize {
    let removable = document.node_ids_where(is_removable);
    for id in &removable {
        document.detach(*id);
    }

    // Whitespace directly under <html> does not survive a reparse once <head>
    // is gone, so drop it to keep the output stable.
    let root = document.root_id();
    let stray_whitespace = document.child_ids_where(root, |node| match node {
        Node::Text(text) => text.trim().is_empty(),
        _ => false,
    });
    for id in &stray_whitespace {
        document.detach(*id);
    }

    debug!(removed = removable.len(), "Sanitized document");
    removable.len()
}

pub fn sanitize(html: &str) -> String {
    let mut document = Document::parse(html);
    sanitize_document(&mut document);
    document.to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Shop</title>
    <style>body { color: red; }</style>
    <script src="/app.js"></script>
  </head>
  <body>
    <!-- navigation -->
    <nav><a href="/">Home</a><svg viewBox="0 0 10 10"><path d="M0 0"></path></svg></nav>
    <script>window.track();</script>
    <form>
      <input name="q" type="search">
      <select name="sort"><option>Price</option></select>
      <textarea name="note"></textarea>
      <button type="submit">Search</button>
    </form>
    <div role="banner">Sale</div>
    <iframe src="https://ads.example.com"></iframe>
    <style>.x {}</style>
  </body>
</html>"#;

    #[test]
    fn test_removes_noise() {
        let out = sanitize(PAGE);

        for needle in [
            "<style", "<script", "<head", "<svg", "<path", "<iframe", "<!--", "<title",
            "window.track",
        ] {
            assert!(!out.contains(needle), "{} survived: {}", needle, out);
        }
    }

    #[test]
    fn test_keeps_testable_elements() {
        let out = sanitize(PAGE);

        for needle in [
            r#"<a href="/">Home</a>"#,
            r#"<input name="q" type="search">"#,
            r#"<select name="sort">"#,
            r#"<textarea name="note">"#,
            r#"<button type="submit">Search</button>"#,
            "<form>",
            r#"<div role="banner">Sale</div>"#,
        ] {
            assert!(out.contains(needle), "{} missing: {}", needle, out);
        }
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize(PAGE);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_on_fragment() {
        let once = sanitize("<p>a<script>x()</script>b</p><!-- c --><button>Ok</button>");
        assert_eq!(sanitize(&once), once);
        assert!(once.contains("<p>ab</p>"));
    }

    #[test]
    fn test_removes_iframe_inside_noscript() {
        let page = r#"<body><noscript><iframe src="https://www.googletagmanager.com/ns.html?id=GTM-X" height="0" width="0"></iframe></noscript><button>Buy</button></body>"#;

        let once = sanitize(page);

        assert!(!once.contains("iframe"), "iframe survived: {}", once);
        assert!(once.contains("<noscript></noscript>"));
        assert!(once.contains("<button>Buy</button>"));
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_idempotent_with_noscript_content() {
        let once = sanitize(r#"<body><noscript><a href="/basic">Basic site</a> &amp; more</noscript></body>"#);
        assert_eq!(sanitize(&once), once);
        assert!(once.contains(r#"<a href="/basic">Basic site</a>"#));
    }

    #[test]
    fn test_counts_removed_nodes() {
        let mut doc = Document::parse("<body><script></script><!-- x --><p>y</p></body>");
        // head, script, comment
        assert_eq!(sanitize_document(&mut doc), 3);
        assert_eq!(sanitize_document(&mut doc), 0);
    }
}
