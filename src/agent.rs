use crate::artifacts::{ArtifactStore, CLEANED_SNAPSHOT_FILE, RAW_SNAPSHOT_FILE};
use crate::browser::BrowserSession;
use crate::config::Config;
use crate::dom::{Document, DomProcessor, RelevanceEntry};
use crate::errors::Result;
use crate::llm::TestPlanner;
use crate::testing::{PageStats, TestHelper};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    pub run_id: Uuid,
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub existing_ids: Vec<String>,
    pub generated_ids: Vec<String>,
    pub entries: Vec<RelevanceEntry>,
    pub test_steps: String,
    pub script_path: Option<PathBuf>,
    pub screenshot_path: Option<PathBuf>,
    pub stats: PageStats,
}

impl AgentReport {
    pub fn known_ids(&self) -> Vec<String> {
        self.existing_ids
            .iter()
            .chain(self.generated_ids.iter())
            .cloned()
            .collect()
    }
}

/// Drives one page through fetch, analysis, planning and script generation.
pub struct QaAgent<P: TestPlanner> {
    config: Config,
    planner: P,
    processor: DomProcessor,
    artifacts: ArtifactStore,
}

impl<P: TestPlanner> QaAgent<P> {
    pub fn new(config: Config, planner: P) -> Self {
        let processor = DomProcessor::new(config.dom.clone());
        let artifacts = ArtifactStore::new(&config.output);
        Self {
            config,
            planner,
            processor,
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Open `url` in Chrome and run the whole pipeline on the rendered page.
    pub async fn run(&self, url: &str) -> Result<AgentReport> {
        info!("Starting AI Agent for QA...");
        let target = Url::parse(url)?;
        self.prepare_output().await;

        info!("Opening page: {}", url);
        let browser = BrowserSession::new(self.config.browser.clone()).await?;
        browser.open(url).await?;
        let html = browser.page_source().await?;

        info!("Taking screenshot...");
        let screenshot_path = match browser.take_screenshot().await {
            Ok(png) => self.artifacts.write_screenshot(&target, &png).await,
            Err(e) => {
                warn!("Screenshot skipped: {}", e);
                None
            }
        };

        self.process(url, target, &html, screenshot_path).await
    }

    /// Run the pipeline on markup that was fetched elsewhere.
    pub async fn run_on_html(&self, url: &str, html: &str) -> Result<AgentReport> {
        let target = Url::parse(url)?;
        self.prepare_output().await;
        self.process(url, target, html, None).await
    }

    async fn prepare_output(&self) {
        if let Err(e) = self.artifacts.ensure_dirs().await {
            warn!("Could not create output directories: {}", e);
        }
    }

    async fn process(
        &self,
        url: &str,
        target: Url,
        html: &str,
        screenshot_path: Option<PathBuf>,
    ) -> Result<AgentReport> {
        let started_at = Utc::now();
        // Results are keyed by the URL as given, not its normalized form.
        let url = url.to_string();
        let attribute = self.config.dom.test_id_attribute.as_str();

        self.artifacts.write_snapshot(RAW_SNAPSHOT_FILE, html).await;

        info!("Cleaning up HTML and extracting test ids...");
        let analysis = self.processor.analyze(html)?;
        self.artifacts
            .write_snapshot(CLEANED_SNAPSHOT_FILE, &analysis.cleaned_html)
            .await;
        self.artifacts.write_relevance(&analysis.entries).await;

        let stats = TestHelper::get_page_stats(&Document::parse(analysis.final_html()), attribute);
        info!(
            testable = stats.testable_elements,
            with_test_id = stats.with_test_id,
            "Page inventory"
        );

        let known_ids = analysis.known_ids();

        info!("Analyzing HTML with the LLM...");
        let summary = serde_json::to_string_pretty(&analysis.entries)?;
        let test_steps = match self.planner.analyze_page(&summary, &known_ids).await {
            Ok(steps) => steps,
            Err(e) => {
                error!("Error during LLM analysis: {}", e);
                String::new()
            }
        };

        let script_path = if known_ids.is_empty() {
            info!("Can not generate test, because {} is empty...", attribute);
            None
        } else {
            info!("Generating test script...");
            self.generate_script(&target, &test_steps).await
        };

        info!(ids = ?known_ids, "{} results", attribute);
        self.artifacts.save_test_ids(&url, &known_ids).await;

        Ok(AgentReport {
            run_id: Uuid::new_v4(),
            url,
            started_at,
            existing_ids: analysis.existing_ids,
            generated_ids: analysis.generated_ids,
            entries: analysis.entries,
            test_steps,
            script_path,
            screenshot_path,
            stats,
        })
    }

    async fn generate_script(&self, target: &Url, test_steps: &str) -> Option<PathBuf> {
        let script = match self
            .planner
            .generate_test_script(test_steps, target.as_str())
            .await
        {
            Ok(script) => script,
            Err(e) => {
                error!("Error generating test script: {}", e);
                return None;
            }
        };

        match self.artifacts.write_test_script(target, &script).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Error writing test script: {}", e);
                None
            }
        }
    }
}
