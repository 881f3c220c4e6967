pub mod markdown;
pub mod openai;
pub mod prompts;

use crate::errors::Result;
use async_trait::async_trait;

pub use markdown::remove_markdown;
pub use openai::OpenAiPlanner;

const TEST_CASE_MARKER: &str = "Test Case:";

/// Turns a page summary into a test plan, and a test plan into a script.
///
/// Implementors only need [`TestPlanner::complete`]; the two pipeline steps
/// are built on top of it.
#[async_trait]
pub trait TestPlanner: Send + Sync {
    /// Send one system prompt and return the raw reply.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Name of the identifier attribute the prompts should mention.
    fn test_id_attribute(&self) -> &str {
        crate::config::DEFAULT_TEST_ID_ATTRIBUTE
    }

    async fn analyze_page(&self, summary_json: &str, test_ids: &[String]) -> Result<String> {
        let prompt = prompts::analysis_prompt(summary_json, test_ids, self.test_id_attribute());
        let reply = self.complete(&prompt).await?;
        Ok(extract_test_steps(&reply))
    }

    async fn generate_test_script(&self, test_steps: &str, url: &str) -> Result<String> {
        let prompt = prompts::script_prompt(test_steps, url, self.test_id_attribute());
        let reply = self.complete(&prompt).await?;
        Ok(remove_markdown(&reply))
    }
}

/// Everything after the first "Test Case:" marker, trimmed. Empty if the
/// reply contains no test case at all.
pub fn extract_test_steps(reply: &str) -> String {
    match reply.split_once(TEST_CASE_MARKER) {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}
