use crate::config::DomConfig;
use crate::dom::document::{attr, parent_tag, text_of, Document};
use crate::dom::element::{ElementDescriptor, ElementDetail, RelevanceEntry, Strategy};
use indexmap::IndexMap;
use scraper::ElementRef;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceMode {
    /// Only elements bearing one of the known test ids.
    Targeted,
    /// Every element, grouped by a structural key.
    Exhaustive,
}

impl RelevanceMode {
    pub fn select(known_ids: &[String], attributes: &[String], test_id_attribute: &str) -> Self {
        let ids_only = attributes.len() == 1 && attributes[0] == test_id_attribute;
        if ids_only && !known_ids.is_empty() {
            RelevanceMode::Targeted
        } else {
            RelevanceMode::Exhaustive
        }
    }
}

/// Grouping key for exhaustive extraction. Keys of different strategies never
/// alias each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    TestId(String),
    TagText(String, String),
    InputTypeName(String, String, Option<String>),
}

pub struct RelevanceExtractor {
    test_id_attribute: String,
    attributes: Vec<String>,
    max_key_text_len: usize,
}

impl RelevanceExtractor {
    pub fn new(config: &DomConfig) -> Self {
        Self {
            test_id_attribute: config.test_id_attribute.clone(),
            attributes: config.relevance_attributes.clone(),
            max_key_text_len: config.max_key_text_len,
        }
    }

    pub fn mode(&self, known_ids: &[String]) -> RelevanceMode {
        RelevanceMode::select(known_ids, &self.attributes, &self.test_id_attribute)
    }

    pub fn extract(&self, document: &Document, known_ids: &[String]) -> Vec<RelevanceEntry> {
        let mode = self.mode(known_ids);
        let entries = match mode {
            RelevanceMode::Targeted => self.extract_targeted(document, known_ids),
            RelevanceMode::Exhaustive => self.extract_exhaustive(document),
        };
        debug!(?mode, entries = entries.len(), "Extracted relevant elements");
        entries
    }

    pub fn extract_html(&self, html: &str, known_ids: &[String]) -> Vec<RelevanceEntry> {
        self.extract(&Document::parse(html), known_ids)
    }

    /// One entry per known id that is present in the document. The count is
    /// the number of structurally distinct occurrences.
    pub fn extract_targeted(&self, document: &Document, known_ids: &[String]) -> Vec<RelevanceEntry> {
        let mut by_id: IndexMap<&str, Vec<ElementRef>> = IndexMap::new();
        for element in document.elements() {
            if let Some(id) = attr(&element, &self.test_id_attribute) {
                by_id.entry(id).or_default().push(element);
            }
        }

        let mut entries: IndexMap<&str, RelevanceEntry> = IndexMap::new();
        for id in known_ids {
            if entries.contains_key(id.as_str()) {
                continue;
            }
            let Some(elements) = by_id.get(id.as_str()) else {
                continue;
            };
            let Some(first) = elements.first() else {
                continue;
            };

            let mut entry = RelevanceEntry::new(self.describe(first).0);
            for element in elements {
                entry.record(detail_of(element));
            }
            entry.count = entry.details.len();
            entries.insert(id.as_str(), entry);
        }

        entries.into_values().collect()
    }

    /// Every element, grouped by identifier or structure. The count is the
    /// number of raw occurrences in the group.
    pub fn extract_exhaustive(&self, document: &Document) -> Vec<RelevanceEntry> {
        let mut entries: IndexMap<GroupKey, RelevanceEntry> = IndexMap::new();

        for element in document.elements() {
            let (descriptor, key) = self.describe(&element);
            let entry = entries
                .entry(key)
                .or_insert_with(|| RelevanceEntry::new(descriptor));
            entry.count += 1;
            entry.record(detail_of(&element));
        }

        entries.into_values().collect()
    }

    fn describe(&self, element: &ElementRef) -> (ElementDescriptor, GroupKey) {
        let tag = element.value().name().to_lowercase();
        let parent = parent_tag(element);

        if let Some(test_id) = attr(element, &self.test_id_attribute) {
            let mut descriptor = ElementDescriptor::new(Strategy::TestId, tag)
                .with_test_id(test_id.to_string())
                .with_text(text_of(element))
                .with_parent_tag(parent);
            descriptor.input_type = attr(element, "type").map(str::to_string);
            descriptor.name = attr(element, "name").map(str::to_string);
            descriptor.value = attr(element, "value").map(str::to_string);
            return (descriptor, GroupKey::TestId(test_id.to_string()));
        }

        let name = element.value().name();
        match (name, attr(element, "type")) {
            ("button" | "a", _) => {
                let text = text_of(element);
                let key = GroupKey::TagText(tag.clone(), text.clone());
                let descriptor = ElementDescriptor::new(Strategy::TagText, tag)
                    .with_text(text)
                    .with_parent_tag(parent);
                (descriptor, key)
            }
            ("input", Some(input_type)) => {
                let input_name = attr(element, "name").map(str::to_string);
                let key = GroupKey::InputTypeName(
                    tag.clone(),
                    input_type.to_string(),
                    input_name.clone(),
                );
                let mut descriptor =
                    ElementDescriptor::new(Strategy::InputTypeName, tag).with_parent_tag(parent);
                descriptor.input_type = Some(input_type.to_string());
                descriptor.name = input_name;
                (descriptor, key)
            }
            _ => {
                let text: String = text_of(element)
                    .chars()
                    .take(self.max_key_text_len)
                    .collect();
                let key = GroupKey::TagText(tag.clone(), text.clone());
                let descriptor = ElementDescriptor::new(Strategy::TagText, tag)
                    .with_text(text)
                    .with_parent_tag(parent);
                (descriptor, key)
            }
        }
    }
}

fn detail_of(element: &ElementRef) -> ElementDetail {
    ElementDetail {
        text: text_of(element),
        input_type: attr(element, "type").map(str::to_string),
        name: attr(element, "name").map(str::to_string),
        value: attr(element, "value").map(str::to_string),
        parent_tag: parent_tag(element),
    }
}
