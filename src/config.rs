use crate::errors::{QaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TEST_ID_ATTRIBUTE: &str = "data-testid";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub dom: DomConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
    pub args: Vec<String>,
    pub page_load_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Attribute holding the stable test identifier.
    pub test_id_attribute: String,
    /// Synthesize identifiers for testable elements that lack one.
    pub generate_missing_ids: bool,
    /// Reject documents html5ever had to recover from.
    pub strict_parsing: bool,
    /// Targeted relevance extraction only runs when this is exactly the
    /// test id attribute.
    pub relevance_attributes: Vec<String>,
    pub max_key_text_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub generated_dir: PathBuf,
    pub test_dir: PathBuf,
    pub results_file: String,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Overlay settings taken from the process environment.
    pub fn apply_env(mut self) -> Self {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("QA_RAGENT_MODEL") {
            self.llm.model = model;
        }
        if let Ok(api_url) = std::env::var("QA_RAGENT_API_URL") {
            self.llm.api_url = api_url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.dom.test_id_attribute.trim().is_empty() {
            return Err(QaError::Configuration(
                "test id attribute must not be empty".to_string(),
            ));
        }
        if self.browser.viewport.width == 0 || self.browser.viewport.height == 0 {
            return Err(QaError::Configuration(format!(
                "invalid viewport {}x{}",
                self.browser.viewport.width, self.browser.viewport.height
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(QaError::Configuration("model must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            disable_images: false,
            args: vec![],
            page_load_timeout_ms: 30000,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            test_id_attribute: DEFAULT_TEST_ID_ATTRIBUTE.to_string(),
            generate_missing_ids: false,
            strict_parsing: false,
            relevance_attributes: vec![DEFAULT_TEST_ID_ATTRIBUTE.to_string()],
            max_key_text_len: 50,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            temperature: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generated_dir: PathBuf::from("generated"),
            test_dir: PathBuf::from("test"),
            results_file: "test_results.json".to_string(),
        }
    }
}
