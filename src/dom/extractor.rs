use crate::dom::document::{attr, Document};
use indexmap::IndexSet;

/// Distinct values of `attribute` in first-encounter order.
///
/// Elements whose attribute value is empty or whitespace are ignored.
pub fn extract_test_ids(document: &Document, attribute: &str) -> Vec<String> {
    let ids: IndexSet<String> = document
        .elements()
        .filter_map(|element| attr(&element, attribute).map(str::to_string))
        .collect();

    ids.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTR: &str = "data-testid";

    #[test]
    fn test_extracts_in_first_encounter_order() {
        let doc = Document::parse(
            r#"<body>
                <button data-testid="submit">Go</button>
                <a data-testid="home" href="/">Home</a>
                <div data-testid="submit"></div>
                <input data-testid="email">
            </body>"#,
        );

        let ids = extract_test_ids(&doc, ATTR);
        assert_eq!(ids, vec!["submit", "home", "email"]);
    }

    #[test]
    fn test_no_identifiers_yields_empty() {
        let doc = Document::parse("<body><button>Go</button></body>");
        assert!(extract_test_ids(&doc, ATTR).is_empty());

        let empty = Document::parse("");
        assert!(extract_test_ids(&empty, ATTR).is_empty());
    }

    #[test]
    fn test_ignores_empty_values() {
        let doc = Document::parse(r#"<button data-testid="">Go</button><p data-testid="x"></p>"#);
        assert_eq!(extract_test_ids(&doc, ATTR), vec!["x"]);

        let doc = Document::parse(r#"<button data-testid="  ">Go</button>"#);
        assert!(extract_test_ids(&doc, ATTR).is_empty());
    }

    #[test]
    fn test_custom_attribute() {
        let doc = Document::parse(r#"<button data-cy="login">Login</button>"#);
        assert_eq!(extract_test_ids(&doc, "data-cy"), vec!["login"]);
        assert!(extract_test_ids(&doc, ATTR).is_empty());
    }
}
