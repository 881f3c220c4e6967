use crate::config::BrowserConfig;
use crate::errors::{QaError, Result};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A single Chrome tab used to fetch the page under test.
pub struct BrowserSession {
    // Dropping the browser kills the Chrome process.
    _browser: Browser,
    tab: Arc<Tab>,
    config: BrowserConfig,
}

impl BrowserSession {
    pub async fn new(config: BrowserConfig) -> Result<Self> {
        // Create strings first to ensure they live long enough
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        if config.disable_images {
            args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| QaError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| QaError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| QaError::LaunchFailed(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
            config,
        })
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.tab
            .navigate_to(url)
            .map_err(|e| QaError::NavigationFailed(e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| QaError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    /// Navigate and block until `document.readyState` is `complete`.
    pub async fn open(&self, url: &str) -> Result<()> {
        self.navigate(url).await?;
        self.wait_for_page_load(self.config.page_load_timeout_ms)
            .await
    }

    pub async fn wait_for_page_load(&self, timeout_ms: u64) -> Result<()> {
        let js_code = r#"
            (function() {
                return document.readyState === 'complete';
            })()
        "#;

        let start_time = std::time::Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        while start_time.elapsed() < timeout {
            let result = self
                .tab
                .evaluate(js_code, false)
                .map_err(|e| QaError::DomExtractionFailed(e.to_string()))?;

            if let Some(value) = result.value {
                if value.as_bool() == Some(true) {
                    return Ok(());
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(QaError::NavigationFailed("Page load timeout".to_string()))
    }

    pub async fn page_source(&self) -> Result<String> {
        let js_result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .map_err(|e| QaError::DomExtractionFailed(e.to_string()))?;

        js_result
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .ok_or_else(|| QaError::DomExtractionFailed("Failed to get page source".to_string()))
    }

    /// Full-page PNG.
    pub async fn take_screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| QaError::ScreenshotFailed(e.to_string()))
    }
}
