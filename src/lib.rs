pub mod agent;
pub mod artifacts;
pub mod browser;
pub mod config;
pub mod dom;
pub mod errors;
pub mod llm;
pub mod testing;

pub use agent::{AgentReport, QaAgent};
pub use browser::BrowserSession;
pub use config::Config;
pub use dom::{DomProcessor, PageAnalysis, RelevanceEntry};
pub use errors::{QaError, Result};
pub use llm::{OpenAiPlanner, TestPlanner};
