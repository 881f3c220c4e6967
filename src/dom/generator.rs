use crate::dom::document::{attr, text_of, Document};
use crate::dom::extractor::extract_test_ids;
use ego_tree::NodeId;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Tags considered interesting for test automation. Any element carrying a
/// `role` attribute is testable as well.
pub const TESTABLE_TAGS: &[&str] = &[
    "button", "a", "input", "select", "textarea", "img", "form",
];

pub fn is_testable(element: &ElementRef) -> bool {
    let value = element.value();
    TESTABLE_TAGS.contains(&value.name()) || value.attr("role").is_some()
}

/// Where the suffix of a synthesized identifier comes from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    Text,
    Name,
    Id,
    Role,
    TypeOrClass,
}

impl LabelSource {
    pub const PRIORITY: [LabelSource; 5] = [
        LabelSource::Text,
        LabelSource::Name,
        LabelSource::Id,
        LabelSource::Role,
        LabelSource::TypeOrClass,
    ];

    pub fn label(&self, element: &ElementRef) -> Option<String> {
        match self {
            LabelSource::Text => {
                let slug = slugify(&text_of(element));
                (!slug.is_empty()).then_some(slug)
            }
            LabelSource::Name => attr(element, "name").map(str::to_string),
            LabelSource::Id => attr(element, "id").map(str::to_string),
            LabelSource::Role => attr(element, "role").map(str::to_string),
            LabelSource::TypeOrClass => {
                let parts: Vec<String> = ["type", "class"]
                    .iter()
                    .filter_map(|name| attr(element, name))
                    .map(str::to_lowercase)
                    .collect();
                (!parts.is_empty()).then(|| parts.join("-"))
            }
        }
    }
}

/// Lower-case, collapse whitespace runs into `-`, drop anything outside `[a-z0-9-]`.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Base identifier for an element: its tag plus the first label source that
/// yields something.
pub fn suggest_id(element: &ElementRef) -> String {
    let tag = element.value().name().to_lowercase();
    match LabelSource::PRIORITY
        .iter()
        .find_map(|source| source.label(element))
    {
        Some(label) => format!("{}-{}", tag, label),
        None => tag,
    }
}

/// Identifiers already taken within one generation pass.
#[derive(Debug, Default)]
pub struct IdRegistry {
    assigned: HashSet<String>,
}

impl IdRegistry {
    pub fn seeded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assigned: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Claim `candidate`, or the first free `candidate-N` for N = 1, 2, ...
    pub fn claim(&mut self, candidate: &str) -> String {
        let mut final_id = candidate.to_string();
        let mut counter = 1;
        while self.assigned.contains(&final_id) {
            final_id = format!("{}-{}", candidate, counter);
            counter += 1;
        }
        self.assigned.insert(final_id.clone());
        final_id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.assigned.contains(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedIds {
    pub generated_ids: Vec<String>,
    pub modified_html: String,
}

/// Give every testable element lacking `attribute` a synthesized identifier.
///
/// The collision set starts with `known` plus every identifier already present
/// in the document, so a generated id never shadows a pre-existing one.
pub fn generate_test_ids(document: &mut Document, attribute: &str, known: &[String]) -> Vec<String> {
    let mut registry = IdRegistry::seeded(
        known
            .iter()
            .cloned()
            .chain(extract_test_ids(document, attribute)),
    );

    let assignments: Vec<(NodeId, String)> = document
        .elements()
        .filter(|element| is_testable(element) && attr(element, attribute).is_none())
        .map(|element| (element.id(), registry.claim(&suggest_id(&element))))
        .collect();

    for (node, id) in &assignments {
        debug!(test_id = %id, "Assigned generated test id");
        document.set_attribute(*node, attribute, id);
    }

    assignments.into_iter().map(|(_, id)| id).collect()
}

pub fn generate_test_ids_html(html: &str, attribute: &str, known: &[String]) -> GeneratedIds {
    let mut document = Document::parse(html);
    let generated_ids = generate_test_ids(&mut document, attribute, known);
    GeneratedIds {
        generated_ids,
        modified_html: document.to_html(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::document::selector;

    const ATTR: &str = "data-testid";

    fn first<'a>(doc: &'a Document, css: &str) -> ElementRef<'a> {
        let sel = selector(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Submit Now!"), "submit-now");
        assert_eq!(slugify("  Sign\n\t in  "), "sign-in");
        assert_eq!(slugify("Café & Bar"), "caf--bar");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_button_text() {
        let generated = generate_test_ids_html("<button>Submit Now!</button>", ATTR, &[]);
        assert_eq!(generated.generated_ids, vec!["button-submit-now"]);
        assert!(generated
            .modified_html
            .contains(r#"data-testid="button-submit-now""#));
    }

    #[test]
    fn test_label_priority() {
        let doc = Document::parse(
            r#"<body>
                <input name="email" id="email-field" role="textbox" type="email">
                <input id="pwd" role="textbox" type="password">
                <div role="dialog"></div>
                <select class="Country Picker"></select>
                <img>
            </body>"#,
        );

        assert_eq!(suggest_id(&first(&doc, "input[name]")), "input-email");
        assert_eq!(suggest_id(&first(&doc, "#pwd")), "input-pwd");
        assert_eq!(suggest_id(&first(&doc, "div")), "div-dialog");
        assert_eq!(suggest_id(&first(&doc, "select")), "select-country picker");
        assert_eq!(suggest_id(&first(&doc, "img")), "img");
    }

    #[test]
    fn test_type_and_class_are_both_used() {
        let doc = Document::parse(r#"<input type="Submit" class="btn">"#);
        assert_eq!(suggest_id(&first(&doc, "input")), "input-submit-btn");
    }

    #[test]
    fn test_punctuation_only_text_falls_through() {
        let doc = Document::parse(r#"<button name="go">!!!</button>"#);
        assert_eq!(suggest_id(&first(&doc, "button")), "button-go");
    }

    #[test]
    fn test_collisions_are_suffixed() {
        let generated = generate_test_ids_html(
            r#"<input type="text"><input type="text"><input type="text">"#,
            ATTR,
            &[],
        );
        assert_eq!(
            generated.generated_ids,
            vec!["input-text", "input-text-1", "input-text-2"]
        );
    }

    #[test]
    fn test_existing_ids_are_kept_and_avoided() {
        let mut doc = Document::parse(
            r#"<body>
                <button data-testid="button-save">Save</button>
                <button>Save</button>
                <a href="/">Home</a>
            </body>"#,
        );

        let generated = generate_test_ids(&mut doc, ATTR, &["a-home".to_string()]);

        assert_eq!(generated, vec!["button-save-1", "a-home-1"]);
        let ids = extract_test_ids(&doc, ATTR);
        assert_eq!(ids, vec!["button-save", "button-save-1", "a-home-1"]);
    }

    #[test]
    fn test_empty_attribute_value_is_replaced() {
        let generated = generate_test_ids_html(r#"<a data-testid="" href="/">Home</a>"#, ATTR, &[]);
        assert_eq!(generated.generated_ids, vec!["a-home"]);
    }

    #[test]
    fn test_whitespace_attribute_value_is_replaced() {
        let generated =
            generate_test_ids_html(r#"<button data-testid="  ">Go</button>"#, ATTR, &[]);

        assert_eq!(generated.generated_ids, vec!["button-go"]);
        assert!(generated
            .modified_html
            .contains(r#"<button data-testid="button-go">Go</button>"#));
    }

    #[test]
    fn test_non_testable_elements_untouched() {
        let generated = generate_test_ids_html("<div>Text</div><p>More</p>", ATTR, &[]);
        assert!(generated.generated_ids.is_empty());
        assert!(!generated.modified_html.contains(ATTR));
    }

    #[test]
    fn test_empty_document() {
        let generated = generate_test_ids_html("", ATTR, &[]);
        assert!(generated.generated_ids.is_empty());
    }

    #[test]
    fn test_registry_skips_taken_suffixes() {
        let mut registry = IdRegistry::seeded(["x", "x-1"]);
        assert_eq!(registry.claim("x"), "x-2");
        assert_eq!(registry.claim("y"), "y");
        assert!(registry.contains("x-2"));
    }
}
