//! Browser side of collection: opening profiles and reading their feeds.
//!
//! # Architecture
//!
//! ```text
//! Scraper::open_profile → ProfileSnapshot + FeedSource → Collector passes
//! ```
//!
//! The page content is read by evaluating generated JavaScript that returns
//! JSON snapshots ([`ContentUnit`], [`ProfileSnapshot`]); nothing else in the
//! crate touches the DOM.
//!
//! # Usage
//!
//! ```rust,ignore
//! use murmur::scraper::{ChromeScraper, Scraper, ScraperConfig};
//!
//! let scraper = ChromeScraper::new(ScraperConfig::default()).await?;
//! let opened = scraper.open_profile("jane").await?;
//! let units = opened.feed.content_units().await?;
//! ```

mod chrome;
mod config;
mod script;

pub use chrome::{ChromeScraper, ProfilePage};
pub use config::{ScraperConfig, SelectorConfig};
pub use script::SnapshotScripts;

use crate::app::Result;
use crate::domain::{ContentUnit, ProfileSnapshot};
use async_trait::async_trait;
use tracing::warn;

/// A lazily loading feed of posts for one subject.
#[async_trait]
pub trait FeedSource: Send {
    /// Username the feed belongs to
    fn subject(&self) -> &str;

    /// Posts currently rendered; may be empty while content loads
    async fn content_units(&mut self) -> Result<Vec<ContentUnit>>;

    /// Asks for more content (scroll). Rendering happens asynchronously.
    async fn trigger_more(&mut self) -> Result<()>;

    /// Best-effort end-of-feed signal; errors mean "unknown", never "ended"
    async fn is_at_feed_end(&mut self) -> Result<bool>;

    /// Releases the underlying page
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Passes `result` through, closing `feed` first when it is an error.
pub async fn close_on_error<F, T>(feed: &mut F, result: Result<T>) -> Result<T>
where
    F: FeedSource + ?Sized,
{
    if result.is_err() {
        if let Err(e) = feed.close().await {
            warn!("Failed to release page for @{}: {}", feed.subject(), e);
        }
    }
    result
}

/// A profile page that has been opened and is ready for collection.
pub struct OpenedProfile<F> {
    pub url: String,
    pub snapshot: ProfileSnapshot,
    pub feed: F,
}

/// Trait for browser implementations
#[async_trait]
pub trait Scraper: Send + Sync {
    type Feed: FeedSource;

    /// Navigate to a subject's profile and read its header
    async fn open_profile(&self, username: &str) -> Result<OpenedProfile<Self::Feed>>;
}
