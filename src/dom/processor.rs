use crate::config::DomConfig;
use crate::dom::document::Document;
use crate::dom::element::RelevanceEntry;
use crate::dom::extractor::extract_test_ids;
use crate::dom::generator::generate_test_ids;
use crate::dom::relevance::RelevanceExtractor;
use crate::dom::sanitizer::sanitize_document;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything learned about one page snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub cleaned_html: String,
    /// Markup after generated ids were written back. `None` when generation is off.
    pub annotated_html: Option<String>,
    pub existing_ids: Vec<String>,
    pub generated_ids: Vec<String>,
    pub entries: Vec<RelevanceEntry>,
}

impl PageAnalysis {
    /// Existing identifiers followed by generated ones.
    pub fn known_ids(&self) -> Vec<String> {
        self.existing_ids
            .iter()
            .chain(self.generated_ids.iter())
            .cloned()
            .collect()
    }

    /// The markup the relevance summary was computed from.
    pub fn final_html(&self) -> &str {
        self.annotated_html.as_deref().unwrap_or(&self.cleaned_html)
    }
}

/// Runs sanitize -> extract/generate -> relevance over one document.
pub struct DomProcessor {
    config: DomConfig,
    relevance: RelevanceExtractor,
}

impl DomProcessor {
    pub fn new(config: DomConfig) -> Self {
        let relevance = RelevanceExtractor::new(&config);
        Self { config, relevance }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    pub fn analyze(&self, html: &str) -> Result<PageAnalysis> {
        let attribute = self.config.test_id_attribute.as_str();

        let mut document = Document::parse_with(html, self.config.strict_parsing)?;
        let removed = sanitize_document(&mut document);
        let cleaned_html = document.to_html();

        let existing_ids = extract_test_ids(&document, attribute);

        let (generated_ids, annotated_html) = if self.config.generate_missing_ids {
            let generated = generate_test_ids(&mut document, attribute, &existing_ids);
            (generated, Some(document.to_html()))
        } else {
            (Vec::new(), None)
        };

        let known_ids: Vec<String> = existing_ids
            .iter()
            .chain(generated_ids.iter())
            .cloned()
            .collect();
        let entries = self.relevance.extract(&document, &known_ids);

        info!(
            removed,
            existing = existing_ids.len(),
            generated = generated_ids.len(),
            entries = entries.len(),
            "Analyzed page"
        );

        Ok(PageAnalysis {
            cleaned_html,
            annotated_html,
            existing_ids,
            generated_ids,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::Strategy;

    const PAGE: &str = r#"<html><head><script>x()</script></head><body>
        <form>
          <input data-testid="email" type="email" name="email">
          <button>Sign in</button>
        </form>
        <a href="/help">Help</a>
        <svg></svg>
    </body></html>"#;

    #[test]
    fn test_analyze_without_generation() {
        let processor = DomProcessor::new(DomConfig::default());

        let analysis = processor.analyze(PAGE).unwrap();

        assert_eq!(analysis.existing_ids, vec!["email"]);
        assert!(analysis.generated_ids.is_empty());
        assert!(analysis.annotated_html.is_none());
        assert!(!analysis.cleaned_html.contains("<script"));
        assert!(!analysis.cleaned_html.contains("<svg"));
        assert_eq!(analysis.entries.len(), 1);
        assert_eq!(analysis.entries[0].descriptor.strategy, Strategy::TestId);
    }

    #[test]
    fn test_analyze_with_generation() {
        let processor = DomProcessor::new(DomConfig {
            generate_missing_ids: true,
            ..Default::default()
        });

        let analysis = processor.analyze(PAGE).unwrap();

        assert_eq!(analysis.generated_ids, vec!["form-sign-in", "button-sign-in", "a-help"]);
        assert_eq!(
            analysis.known_ids(),
            vec!["email", "form-sign-in", "button-sign-in", "a-help"]
        );
        assert_eq!(analysis.entries.len(), 4);
        assert!(analysis.final_html().contains(r#"data-testid="a-help""#));
        assert!(!analysis.cleaned_html.contains("a-help"));
    }

    #[test]
    fn test_analyze_falls_back_to_exhaustive() {
        let processor = DomProcessor::new(DomConfig::default());

        let analysis = processor.analyze("<body><a>Home</a><a>Home</a></body>").unwrap();

        assert!(analysis.existing_ids.is_empty());
        let link = analysis
            .entries
            .iter()
            .find(|e| e.descriptor.tag == "a")
            .unwrap();
        assert_eq!(link.count, 2);
    }

    #[test]
    fn test_strict_parsing_surfaces_errors() {
        let processor = DomProcessor::new(DomConfig {
            strict_parsing: true,
            ..Default::default()
        });

        assert!(processor.analyze("<div><span></div>").is_err());
    }
}
