use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How an element group was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "data-testid")]
    TestId,
    #[serde(rename = "tag-text")]
    TagText,
    #[serde(rename = "input-type-name")]
    InputTypeName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub strategy: Strategy,
    #[serde(rename = "dataTestId", skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_tag: Option<String>,
}

/// One structurally distinct occurrence. Equality covers every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDetail {
    pub text: String,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub parent_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceEntry {
    #[serde(flatten)]
    pub descriptor: ElementDescriptor,
    pub count: usize,
    pub details: IndexSet<ElementDetail>,
}

impl ElementDescriptor {
    pub fn new(strategy: Strategy, tag: String) -> Self {
        Self {
            strategy,
            test_id: None,
            tag,
            text: None,
            input_type: None,
            name: None,
            value: None,
            parent_tag: None,
        }
    }

    pub fn with_test_id(mut self, test_id: String) -> Self {
        self.test_id = Some(test_id);
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_parent_tag(mut self, parent_tag: Option<String>) -> Self {
        self.parent_tag = parent_tag;
        self
    }
}

impl RelevanceEntry {
    pub fn new(descriptor: ElementDescriptor) -> Self {
        Self {
            descriptor,
            count: 0,
            details: IndexSet::new(),
        }
    }

    /// Add a detail record unless an identical one is already present.
    pub fn record(&mut self, detail: ElementDetail) -> bool {
        self.details.insert(detail)
    }
}
