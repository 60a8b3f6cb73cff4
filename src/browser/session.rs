//! Browser session abstraction and its chromium implementation
//!
//! The fetch layer only needs a handful of page operations; they are
//! gathered behind [`BrowserSession`] so the crawl logic can run against a
//! scripted fake in tests. [`ChromiumSession`] drives a real headless
//! Chrome over CDP.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    ClearBrowserCookiesParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] CdpError),

    #[error("Navigation timed out for {url}")]
    NavigationTimeout { url: String },
}

/// The page operations the crawl needs from a browser.
///
/// One session means one open tab; the crawl is strictly sequential, so a
/// single page is reused for every fetch.
pub trait BrowserSession {
    /// Navigates the page, waiting at most `timeout`. Returns the HTTP
    /// status of the document response when it could be observed.
    fn navigate(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<Option<u16>, SessionError>> + Send;

    /// The rendered HTML of the current page.
    fn current_html(&self) -> impl std::future::Future<Output = Result<String, SessionError>> + Send;

    /// Clicks the first element matching the selector.
    fn click(&self, selector: &str)
        -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Waits until an element matching the selector exists, up to `timeout`.
    /// Returns whether one appeared.
    fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<bool, SessionError>> + Send;

    /// Scrolls the page vertically by `delta` pixels (negative is up).
    fn scroll_by(&self, delta: f64)
        -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Drops all cookies held by the browser.
    fn clear_cookies(&self) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

/// Headless-Chrome session over CDP.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches the browser and opens the single page the crawl reuses.
    pub async fn launch(config: &crate::config::BrowserConfig) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The CDP message pump has to run for the life of the browser
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        if let Some(user_agent) = &config.user_agent {
            page.set_user_agent(user_agent.as_str()).await?;
        }

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Closes the browser and stops the message pump.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        self.browser.close().await?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Option<u16>, SessionError> {
        // Listen before navigating so the document response is not missed
        let mut responses = self.page.event_listener::<EventResponseReceived>().await?;

        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| SessionError::NavigationTimeout {
                url: url.to_string(),
            })??;

        // Best effort: the document response event usually arrived during
        // the navigation and is already buffered
        let status = tokio::time::timeout(Duration::from_secs(2), async {
            while let Some(event) = responses.next().await {
                if event.r#type == ResourceType::Document {
                    return Some(event.response.status as u16);
                }
            }
            None
        })
        .await
        .unwrap_or(None);

        Ok(status)
    }

    async fn current_html(&self) -> Result<String, SessionError> {
        Ok(self.page.content().await?)
    }

    async fn click(&self, selector: &str) -> Result<(), SessionError> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    async fn scroll_by(&self, delta: f64) -> Result<(), SessionError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {});", delta))
            .await?;
        Ok(())
    }

    async fn clear_cookies(&self) -> Result<(), SessionError> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await?;
        Ok(())
    }
}
