use clap::Parser;
use qa_ragent::{Config, OpenAiPlanner, QaAgent};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qa-ragent", version, about = "Draft Playwright tests for a web page")]
struct Cli {
    /// Page to analyze
    url: String,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Assign generated test ids to testable elements that lack one
    #[arg(long)]
    generate_ids: bool,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Override the chat model
    #[arg(long)]
    model: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .apply_env();

    if cli.generate_ids {
        config.dom.generate_missing_ids = true;
    }
    if cli.headful {
        config.browser.headless = false;
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    config.validate()?;

    let planner = OpenAiPlanner::new(&config.llm)?
        .with_test_id_attribute(config.dom.test_id_attribute.clone());
    let agent = QaAgent::new(config, planner);

    match agent.run(&cli.url).await {
        Ok(report) => {
            info!("{} test ids: {:?}", report.url, report.known_ids());
            info!("Test Steps:\n{}", report.test_steps);
            if let Some(path) = &report.script_path {
                info!("Test script: {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("An error occurred: {}", e);
            Err(e.into())
        }
    }
}
