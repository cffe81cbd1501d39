//! Headless browser rendering for storefront pages that build their DOM
//! client-side.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to the browser
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to navigate to the page
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to serialize the rendered DOM
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),
}

/// Renders a URL to its post-JavaScript HTML
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to `url`, wait `settle` for client-side rendering, and
    /// return the serialized DOM
    async fn render(&self, url: &str, settle: Duration) -> Result<String, RenderError>;
}

/// Headless Chrome/Chromium renderer using chromiumoxide
pub struct HeadlessRenderer {
    browser: chromiumoxide::Browser,
}

impl HeadlessRenderer {
    /// Launch a headless browser instance
    ///
    /// A background task drains Chrome DevTools Protocol events for the
    /// lifetime of the browser
    pub async fn new() -> Result<Self, RenderError> {
        use chromiumoxide::browser::{Browser, BrowserConfig};
        use futures_util::StreamExt;

        let (browser, mut handler) = Browser::launch(
            BrowserConfig::builder()
                .no_sandbox()
                .build()
                .map_err(RenderError::BrowserLaunch)?,
        )
        .await
        .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl Renderer for HeadlessRenderer {
    async fn render(&self, url: &str, settle: Duration) -> Result<String, RenderError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        tokio::time::sleep(settle).await;

        let html = page
            .content()
            .await
            .map_err(|e| RenderError::ContentRetrieval(e.to_string()))?;

        page.close().await.ok();
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_headless_renderer_new() {
        let renderer = HeadlessRenderer::new().await;
        assert!(renderer.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_render_simple_page() {
        let renderer = HeadlessRenderer::new().await.unwrap();
        let html = renderer
            .render("https://example.com", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(html.contains("<html"));
    }
}
