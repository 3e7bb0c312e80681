//! Screenshot capture using Chrome DevTools Protocol

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use fixhero_core::{InspectorError, Result};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use tracing::debug;

use crate::session::BrowserSession;

/// Screenshot capture options
#[derive(Debug, Clone, Default)]
pub struct ScreenshotOptions {
    /// CSS selector for element screenshot (None for the page)
    pub selector: Option<String>,
    /// Capture the full scroll height instead of the viewport
    pub full_page: bool,
}

impl ScreenshotOptions {
    /// Visible viewport only
    pub fn viewport() -> Self {
        Self::default()
    }

    /// Full scroll height of the page
    pub fn full_page() -> Self {
        Self {
            selector: None,
            full_page: true,
        }
    }

    /// A single element
    pub fn element(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_string()),
            full_page: false,
        }
    }
}

/// Capture a PNG screenshot and encode it as a data URL
pub async fn capture_data_url(
    session: &BrowserSession,
    options: ScreenshotOptions,
) -> Result<String> {
    let png = capture_png(session, &options).await?;
    debug!("Captured screenshot ({} bytes)", png.len());
    Ok(to_data_url(&png))
}

/// Capture raw PNG bytes
pub async fn capture_png(session: &BrowserSession, options: &ScreenshotOptions) -> Result<Vec<u8>> {
    if let Some(ref selector) = options.selector {
        capture_element_png(session, selector).await
    } else {
        capture_page_png(session, options.full_page).await
    }
}

async fn capture_page_png(session: &BrowserSession, full_page: bool) -> Result<Vec<u8>> {
    session
        .tab()
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, full_page)
        .map_err(|e| InspectorError::Screenshot(format!("CDP capture failed: {}", e)))
}

async fn capture_element_png(session: &BrowserSession, selector: &str) -> Result<Vec<u8>> {
    let element = session
        .tab()
        .wait_for_element(selector)
        .map_err(|_e| InspectorError::ElementNotFound(selector.to_string()))?;

    element
        .capture_screenshot(CaptureScreenshotFormatOption::Png)
        .map_err(|e| InspectorError::Screenshot(format!("Element capture failed: {}", e)))
}

/// Encode PNG bytes as a `data:image/png;base64,` URL
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_viewport_default() {
        let options = ScreenshotOptions::viewport();
        assert!(options.selector.is_none());
        assert!(!options.full_page);
    }

    #[test]
    fn test_options_element() {
        let options = ScreenshotOptions::element("#main");
        assert_eq!(options.selector.as_deref(), Some("#main"));
        assert!(!options.full_page);
    }

    #[test]
    fn test_options_full_page() {
        let options = ScreenshotOptions::full_page();
        assert!(options.selector.is_none());
        assert!(options.full_page);
    }

    #[test]
    fn test_data_url_encoding() {
        assert_eq!(to_data_url(b"hi"), "data:image/png;base64,aGk=");
        assert!(to_data_url(&[]).starts_with("data:image/png;base64,"));
    }
}
