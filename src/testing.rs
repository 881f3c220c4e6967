use crate::dom::document::{attr, text_of, Document};
use crate::dom::generator::is_testable;
use crate::dom::RelevanceEntry;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

pub struct TestHelper;

impl TestHelper {
    pub fn count_elements_by_type(document: &Document, tag_name: &str) -> usize {
        document
            .elements()
            .filter(|e| e.value().name() == tag_name)
            .count()
    }

    /// Testable elements that still lack a usable identifier.
    pub fn testable_without_id<'a>(document: &'a Document, attribute: &str) -> Vec<ElementRef<'a>> {
        document
            .elements()
            .filter(|e| is_testable(e) && attr(e, attribute).is_none())
            .collect()
    }

    pub fn find_elements_with_text<'a>(document: &'a Document, text: &str) -> Vec<ElementRef<'a>> {
        let needle = text.to_lowercase();
        document
            .elements()
            .filter(|e| text_of(e).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn find_entry_by_test_id<'a>(
        entries: &'a [RelevanceEntry],
        test_id: &str,
    ) -> Option<&'a RelevanceEntry> {
        entries
            .iter()
            .find(|entry| entry.descriptor.test_id.as_deref() == Some(test_id))
    }

    pub fn get_page_stats(document: &Document, attribute: &str) -> PageStats {
        let mut stats = PageStats::default();
        for element in document.elements() {
            stats.total_elements += 1;
            if is_testable(&element) {
                stats.testable_elements += 1;
            }
            if attr(&element, attribute).is_some() {
                stats.with_test_id += 1;
            }
            match element.value().name() {
                "img" => stats.images += 1,
                "a" => stats.links += 1,
                "button" => stats.buttons += 1,
                "form" => stats.forms += 1,
                "input" | "select" | "textarea" => stats.inputs += 1,
                _ => {}
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub total_elements: usize,
    pub testable_elements: usize,
    pub with_test_id: usize,
    pub images: usize,
    pub links: usize,
    pub buttons: usize,
    pub forms: usize,
    pub inputs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<body>
        <form>
            <input name="q"><select></select><textarea></textarea>
            <button data-testid="go">Go</button>
        </form>
        <a href="/">Home</a>
        <img src="/logo.png">
        <div role="alert">Saved</div>
    </body>"#;

    #[test]
    fn test_page_stats() {
        let doc = Document::parse(PAGE);
        let stats = TestHelper::get_page_stats(&doc, "data-testid");

        assert_eq!(stats.forms, 1);
        assert_eq!(stats.inputs, 3);
        assert_eq!(stats.buttons, 1);
        assert_eq!(stats.links, 1);
        assert_eq!(stats.images, 1);
        assert_eq!(stats.testable_elements, 8);
        assert_eq!(stats.with_test_id, 1);
    }

    #[test]
    fn test_testable_without_id() {
        let doc = Document::parse(PAGE);
        let missing = TestHelper::testable_without_id(&doc, "data-testid");
        assert_eq!(missing.len(), 7);
        assert_eq!(TestHelper::count_elements_by_type(&doc, "textarea"), 1);
    }

    #[test]
    fn test_find_elements_with_text() {
        let doc = Document::parse(PAGE);
        let found = TestHelper::find_elements_with_text(&doc, "saved");
        // html, body and the alert div
        assert_eq!(found.len(), 3);
    }
}
