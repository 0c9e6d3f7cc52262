//! # Murmur
//!
//! Collects public profiles and their recent posts from a social-media web
//! application by driving a real browser.
//!
//! ## Architecture
//!
//! Murmur follows a one-directional pipeline:
//!
//! ```text
//! Scraper → content units → Normalizer → Collector → Store / JSON
//! ```
//!
//! - [`scraper`]: Browser attachment and page snapshots via chromiumoxide
//! - [`normalizer`]: Turns one noisy content unit into a candidate post
//! - [`collector`]: Pass-by-pass accumulation, dedup and stop decisions
//! - [`store`]: SQLite persistence layer
//!
//! ## Quick Start
//!
//! ```bash
//! # Start Chrome with remote debugging, log in, then:
//! murmur collect jane bob --max-posts 100 --json
//!
//! # List what was collected
//! murmur list
//!
//! # Print one profile's posts
//! murmur show jane
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`domain`]: Core domain models (PostRecord, ProfileRecord, ContentUnit)
//! - [`export`]: JSON documents
//! - [`harvest`]: Sequential multi-profile runs

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the loaded configuration and the results directory.
pub mod app;

/// Command-line interface using clap.
///
/// - `collect <usernames…>` - Collect profiles and posts
/// - `list` - List collected profiles
/// - `show <username>` - Print the latest collection for a profile
/// - `export <path>` - Write every profile's latest collection as JSON
pub mod cli;

/// Incremental collection.
///
/// - [`Collector`](collector::Collector): Per-run state machine
/// - [`collect`](collector::collect): Async driver over a [`FeedSource`](scraper::FeedSource)
pub mod collector;

/// Configuration loaded from `~/.config/murmur/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`PostRecord`](domain::PostRecord): One extracted post
/// - [`ProfileRecord`](domain::ProfileRecord): Profile header plus ordered posts
/// - [`ContentUnit`](domain::ContentUnit): Snapshot of one rendered post element
pub mod domain;

/// JSON rendering of collected profiles.
pub mod export;

/// Sequential collection over several profiles with interrupt handling.
pub mod harvest;

/// Text normalization.
///
/// Primary text, published-date label and engagement counts are derived
/// from a [`ContentUnit`](domain::ContentUnit) by layered heuristics.
pub mod normalizer;

/// Browser integration.
///
/// - [`ChromeScraper`](scraper::ChromeScraper): Chrome-based scraper
/// - [`ScraperConfig`](scraper::ScraperConfig): Configuration options
/// - [`Scraper`](scraper::Scraper) and [`FeedSource`](scraper::FeedSource): Collaborator traits
pub mod scraper;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
