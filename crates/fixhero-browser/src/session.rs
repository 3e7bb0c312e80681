//! Browser lifecycle management using Chrome DevTools Protocol

use fixhero_core::config::BrowserSettings;
use fixhero_core::{InspectorError, PageContext, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            timeout_seconds: 30,
        }
    }
}

impl From<&BrowserSettings> for BrowserConfig {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            headless: settings.headless,
            window_width: settings.window_width,
            window_height: settings.window_height,
            timeout_seconds: settings.timeout_seconds,
        }
    }
}

/// Active browser session for one capture run
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Session identifier for logging and artifact grouping
    session_id: Uuid,
}

impl BrowserSession {
    /// Launch a new browser instance with default configuration
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| InspectorError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| InspectorError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| InspectorError::Browser(format!("Failed to create tab: {}", e)))?;

        let session_id = Uuid::new_v4();
        info!("Browser launched (session {})", session_id);

        Ok(Self {
            browser,
            tab,
            session_id,
        })
    }

    /// Connect to an existing browser instance
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    pub async fn connect(port: u16) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let browser = Browser::connect(format!("http://127.0.0.1:{}", port))
            .map_err(|e| InspectorError::Browser(format!("Failed to connect to browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| InspectorError::Browser(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            session_id: Uuid::new_v4(),
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Navigate to a URL and wait for the load to settle
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| InspectorError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| InspectorError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;

        info!("Navigated to {}", url);
        Ok(())
    }

    /// Execute JavaScript in the page context
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| InspectorError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Execute JavaScript that returns `JSON.stringify(...)` output and
    /// deserialize it.
    ///
    /// Evaluating to a string keeps arbitrarily nested results intact across
    /// the protocol; plain object results come back as remote references.
    pub async fn evaluate_json<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let value = self.evaluate_script(script).await?;
        let text = value.as_str().ok_or_else(|| {
            InspectorError::Browser(format!(
                "Expected a JSON string from page script, got {}",
                value
            ))
        })?;
        serde_json::from_str(text)
            .map_err(|e| InspectorError::Browser(format!("Malformed page script result: {}", e)))
    }

    /// Get the current page title
    pub async fn get_title(&self) -> Result<String> {
        let result = self.evaluate_script("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get the current URL
    pub async fn get_url(&self) -> Result<String> {
        let result = self.evaluate_script("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Page identity for issue stamping
    pub async fn page_context(&self) -> Result<PageContext> {
        Ok(PageContext::new(self.get_url().await?, self.get_title().await?))
    }

    /// Check if an element exists
    pub async fn element_exists(&self, selector: &str) -> bool {
        self.tab.wait_for_element(selector).is_ok()
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session {}", self.session_id);
        // Browser is dropped and cleaned up automatically
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = BrowserSettings {
            headless: false,
            window_width: 1024,
            window_height: 768,
            timeout_seconds: 60,
        };
        let config = BrowserConfig::from(&settings);
        assert!(!config.headless);
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.timeout_seconds, 60);
    }
}
