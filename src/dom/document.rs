use crate::errors::{QaError, Result};
use ego_tree::NodeId;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{namespace_url, ns, parse_document, LocalName, ParseOpts, QualName};
use scraper::html::Select;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

/// Parsed page owned by a single analysis run.
///
/// Thin wrapper over [`scraper::Html`] that adds the mutations the pipeline
/// needs (attribute writes and subtree removal) on top of scraper's read-only
/// selector API.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse leniently. html5ever recovers from any input, so this never fails.
    pub fn parse(source: &str) -> Self {
        let html = parse_html(source);
        if !html.errors.is_empty() {
            debug!(errors = html.errors.len(), "Recovered from HTML parse errors");
        }
        Self { html }
    }

    /// Parse and refuse any document the parser had to repair.
    pub fn parse_strict(source: &str) -> Result<Self> {
        let html = parse_html(source);
        if let Some(first) = html.errors.first() {
            return Err(QaError::MalformedDocument(format!(
                "{} parse error(s), first: {}",
                html.errors.len(),
                first
            )));
        }
        Ok(Self { html })
    }

    pub fn parse_with(source: &str, strict: bool) -> Result<Self> {
        if strict {
            Self::parse_strict(source)
        } else {
            Ok(Self::parse(source))
        }
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Every attached element in document order, starting with `<html>`.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    pub fn get(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Set (or overwrite) an attribute in the null namespace.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };
        element.attrs.insert(
            QualName::new(None, ns!(), LocalName::from(name)),
            StrTendril::from_slice(value),
        );
    }

    /// Detach a node together with its subtree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Ids of every attached node matching `predicate`, in document order.
    pub fn node_ids_where(&self, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| predicate(node.value()))
            .map(|node| node.id())
            .collect()
    }

    /// Ids of the direct children of `id` matching `predicate`.
    pub fn child_ids_where(&self, id: NodeId, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|node| {
                node.children()
                    .filter(|child| predicate(child.value()))
                    .map(|child| child.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn root_id(&self) -> NodeId {
        self.html.root_element().id()
    }

    pub fn to_html(&self) -> String {
        self.html.html()
    }
}

/// Parse with scripting disabled so `<noscript>` content becomes elements
/// rather than raw text.
fn parse_html(source: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(Html::new_document(), opts).one(source)
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| QaError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Concatenated descendant text, trimmed.
pub fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Attribute value, treating an empty or whitespace-only value as absent.
pub fn attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

/// Tag name of the parent element, if the parent is an element.
pub fn parent_tag(element: &ElementRef) -> Option<String> {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name().to_string())
}
