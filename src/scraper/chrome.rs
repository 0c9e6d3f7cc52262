use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::{MurmurError, Result};
use crate::domain::{ContentUnit, ProfileSnapshot};
use crate::scraper::config::ScraperConfig;
use crate::scraper::script::SnapshotScripts;
use crate::scraper::{close_on_error, FeedSource, OpenedProfile, Scraper};

/// Chrome-based scraper using chromiumoxide
pub struct ChromeScraper {
    browser: Browser,
    handler: JoinHandle<()>,
    config: ScraperConfig,
}

impl ChromeScraper {
    /// Attach to a running browser, or launch one when `config.launch` is set
    pub async fn new(config: ScraperConfig) -> Result<Self> {
        let (browser, mut handler) = if config.launch {
            Self::launch(&config).await?
        } else {
            Self::attach(&config).await?
        };

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            config,
        })
    }

    async fn launch(
        config: &ScraperConfig,
    ) -> Result<(Browser, chromiumoxide::Handler)> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(config.timeout());

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(ref ua) = config.user_agent {
            builder = builder.arg(format!("--user-agent={}", ua));
        }

        let browser_config = builder
            .build()
            .map_err(|e| MurmurError::Browser(format!("Failed to build browser config: {}", e)))?;

        info!("Launching browser");
        Browser::launch(browser_config).await.map_err(|e| {
            MurmurError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })
    }

    /// Discovers the websocket endpoint of a browser started with
    /// `--remote-debugging-port` and connects to it.
    async fn attach(config: &ScraperConfig) -> Result<(Browser, chromiumoxide::Handler)> {
        let endpoint = config.version_endpoint();
        let body = reqwest::get(&endpoint)
            .await
            .map_err(|e| {
                MurmurError::Browser(format!(
                    "No browser listening on {}: {}. Start Chrome with --remote-debugging-port={}",
                    endpoint, e, config.debug_port
                ))
            })?
            .text()
            .await?;
        let version: serde_json::Value = serde_json::from_str(&body)?;
        let ws_url = version["webSocketDebuggerUrl"]
            .as_str()
            .ok_or_else(|| MurmurError::Browser("No webSocketDebuggerUrl in response".to_string()))?;

        info!("Attaching to browser at {}", ws_url);
        Browser::connect(ws_url)
            .await
            .map_err(|e| MurmurError::Browser(format!("Browser connect failed: {}", e)))
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(page: &Page, script: String) -> Result<T> {
        page.evaluate(script)
            .await
            .map_err(|e| MurmurError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| MurmurError::Browser(format!("Failed to parse result: {:?}", e)))
    }
}

impl Drop for ChromeScraper {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl Scraper for ChromeScraper {
    type Feed = ProfilePage;

    async fn open_profile(&self, username: &str) -> Result<OpenedProfile<ProfilePage>> {
        let url = self.config.profile_url(username)?;
        let username = username.trim_start_matches('@').to_string();

        let page = self
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| MurmurError::Browser(format!("Failed to create page: {}", e)))?;

        let scripts = SnapshotScripts::new(self.config.selectors.clone());
        let mut feed = ProfilePage {
            page: Some(page),
            username,
            units_script: scripts.units_script(),
            scroll_pixels: self.config.scroll_pixels,
            end_confirmations: self.config.end_confirmations,
            bottom_streak: 0,
        };

        let header = feed
            .read_header(self.config.wait_after_load(), scripts.profile_script())
            .await;
        let snapshot = close_on_error(&mut feed, header).await?;
        debug!(?snapshot, "profile header");

        Ok(OpenedProfile {
            url: url.to_string(),
            snapshot,
            feed,
        })
    }
}

/// An open profile tab, read pass by pass.
pub struct ProfilePage {
    page: Option<Page>,
    username: String,
    units_script: String,
    scroll_pixels: u32,
    end_confirmations: u32,
    bottom_streak: u32,
}

impl ProfilePage {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| MurmurError::Browser("page already closed".to_string()))
    }

    /// Waits for the profile to load and snapshots its header.
    async fn read_header(&self, settle: Duration, script: String) -> Result<ProfileSnapshot> {
        let page = self.page()?;
        page.wait_for_navigation()
            .await
            .map_err(|e| MurmurError::Browser(format!("Navigation failed: {}", e)))?;

        // Additional wait for the timeline to render
        tokio::time::sleep(settle).await;

        ChromeScraper::evaluate(page, script).await
    }
}

#[async_trait]
impl FeedSource for ProfilePage {
    fn subject(&self) -> &str {
        &self.username
    }

    async fn content_units(&mut self) -> Result<Vec<ContentUnit>> {
        let page = self.page()?;
        ChromeScraper::evaluate(page, self.units_script.clone()).await
    }

    async fn trigger_more(&mut self) -> Result<()> {
        let page = self.page()?;
        let _: bool = ChromeScraper::evaluate(page, SnapshotScripts::scroll_script(self.scroll_pixels)).await?;
        Ok(())
    }

    /// The feed counts as ended after the viewport stayed at the bottom of
    /// the document for `end_confirmations` consecutive checks.
    async fn is_at_feed_end(&mut self) -> Result<bool> {
        let page = self.page()?;
        let at_bottom: bool =
            ChromeScraper::evaluate(page, SnapshotScripts::at_bottom_script().to_string()).await?;
        if at_bottom {
            self.bottom_streak += 1;
        } else {
            self.bottom_streak = 0;
        }
        Ok(self.bottom_streak >= self.end_confirmations)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            page.close()
                .await
                .map_err(|e| MurmurError::Browser(format!("Failed to close page: {}", e)))?;
        }
        Ok(())
    }
}
