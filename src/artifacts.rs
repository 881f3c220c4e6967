use crate::config::OutputConfig;
use crate::dom::RelevanceEntry;
use crate::errors::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

pub const RAW_SNAPSHOT_FILE: &str = "generated_html.txt";
pub const CLEANED_SNAPSHOT_FILE: &str = "generated_html_cleanup.txt";
pub const RELEVANCE_FILE: &str = "generated_tag_relevant.json";

/// Diagnostic side files written during a run.
///
/// Everything except the generated test script is best effort: failures are
/// logged and the run carries on.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    generated_dir: PathBuf,
    test_dir: PathBuf,
    results_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            generated_dir: config.generated_dir.clone(),
            test_dir: config.test_dir.clone(),
            results_path: config.generated_dir.join(&config.results_file),
        }
    }

    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.generated_dir).await?;
        tokio::fs::create_dir_all(&self.test_dir).await?;
        Ok(())
    }

    pub async fn write_snapshot(&self, file_name: &str, html: &str) -> Option<PathBuf> {
        write_logged(self.generated_dir.join(file_name), html.as_bytes()).await
    }

    pub async fn write_relevance(&self, entries: &[RelevanceEntry]) -> Option<PathBuf> {
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error serializing relevant info: {}", e);
                return None;
            }
        };
        write_logged(self.generated_dir.join(RELEVANCE_FILE), json.as_bytes()).await
    }

    pub fn screenshot_path(&self, url: &Url) -> PathBuf {
        self.generated_dir.join(format!("{}.png", host_of(url)))
    }

    pub async fn write_screenshot(&self, url: &Url, png: &[u8]) -> Option<PathBuf> {
        write_logged(self.screenshot_path(url), png).await
    }

    /// Merge `ids` under key `url` into the cumulative results file.
    pub async fn save_test_ids(&self, url: &str, ids: &[String]) -> Option<PathBuf> {
        let mut results = match tokio::fs::read_to_string(&self.results_path).await {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            Err(_) => Map::new(),
        };

        results.insert(
            url.to_string(),
            Value::Array(ids.iter().cloned().map(Value::String).collect()),
        );

        let json = match serde_json::to_string_pretty(&Value::Object(results)) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error serializing test ids: {}", e);
                return None;
            }
        };
        write_logged(self.results_path.clone(), json.as_bytes()).await
    }

    pub async fn write_test_script(&self, url: &Url, script: &str) -> Result<PathBuf> {
        let path = self.test_dir.join(script_file_name(url));
        tokio::fs::write(&path, script).await?;
        info!("Test script generated at: {}", path.display());
        Ok(path)
    }
}

/// `shop.example.com` becomes `shop_example_com.spec.js`.
pub fn script_file_name(url: &Url) -> String {
    format!("{}.spec.js", host_of(url).replace('.', "_"))
}

fn host_of(url: &Url) -> &str {
    url.host_str().unwrap_or("page")
}

async fn write_logged(path: PathBuf, contents: &[u8]) -> Option<PathBuf> {
    match tokio::fs::write(&path, contents).await {
        Ok(()) => {
            info!("Saved {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Error writing {}: {}", path.display(), e);
            None
        }
    }
}
