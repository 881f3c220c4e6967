pub mod document;
pub mod element;
pub mod extractor;
pub mod generator;
pub mod processor;
pub mod relevance;
pub mod sanitizer;

pub use document::Document;
pub use element::{ElementDescriptor, ElementDetail, RelevanceEntry, Strategy};
pub use extractor::extract_test_ids;
pub use generator::{generate_test_ids, generate_test_ids_html, GeneratedIds, IdRegistry, LabelSource};
pub use processor::{DomProcessor, PageAnalysis};
pub use relevance::{RelevanceExtractor, RelevanceMode};
pub use sanitizer::{sanitize, sanitize_document};
