//! Sequential collection over several subjects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::app::{MurmurError, Result};
use crate::collector::{Collector, CollectorConfig};
use crate::domain::ProfileRecord;
use crate::normalizer::normalize_profile;
use crate::scraper::{FeedSource, Scraper};

/// Outcome of a batch: collected profiles plus the subjects that failed.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub profiles: Vec<ProfileRecord>,
    pub failed: Vec<(String, MurmurError)>,
    pub interrupted: bool,
}

impl HarvestReport {
    pub fn post_count(&self) -> usize {
        self.profiles.iter().map(|p| p.recent_tweets.len()).sum()
    }
}

/// Collects subjects one after another, each with a fresh collector.
pub struct Harvester<'a, S: Scraper> {
    scraper: &'a S,
    config: CollectorConfig,
    delay: Duration,
    reference: Option<NaiveDate>,
    interrupt: Arc<AtomicBool>,
}

impl<'a, S: Scraper> Harvester<'a, S> {
    pub fn new(scraper: &'a S, config: CollectorConfig, delay: Duration) -> Self {
        Self {
            scraper,
            config,
            delay,
            reference: None,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Dates yearless labels against `date` instead of today.
    pub fn with_reference(mut self, date: NaiveDate) -> Self {
        self.reference = Some(date);
        self
    }

    /// Flag checked between passes and between subjects; set it to stop early.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Sets the interrupt flag on SIGINT/SIGTERM (Ctrl-C on Windows).
    pub fn install_signal_handlers(&self) {
        let interrupt = self.interrupt.clone();

        #[cfg(unix)]
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (Ok(mut sigterm), Ok(mut sigint)) =
                (signal(SignalKind::terminate()), signal(SignalKind::interrupt()))
            else {
                warn!("Failed to set up signal handlers");
                return;
            };

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            info!("Interrupt received, finishing current pass");
            interrupt.store(true, Ordering::SeqCst);
        });

        #[cfg(windows)]
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            interrupt.store(true, Ordering::SeqCst);
        });
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    /// Collects one subject's profile header and posts.
    pub async fn harvest_one(&self, username: &str) -> Result<ProfileRecord> {
        let mut opened = self.scraper.open_profile(username).await?;
        let reference = self.reference.unwrap_or_else(|| Local::now().date_naive());

        let result = Collector::new(self.config.clone())
            .run(&mut opened.feed, &self.interrupt, reference)
            .await;

        if let Err(e) = opened.feed.close().await {
            warn!("Failed to close page for @{}: {}", username, e);
        }

        let collection = result?;
        let subject = opened.feed.subject().to_string();
        Ok(normalize_profile(
            &subject,
            &opened.url,
            &opened.snapshot,
            collection.posts,
        ))
    }

    /// Collects every subject in order, handing each profile to `sink` as soon
    /// as it is ready. A failed subject never affects the others.
    pub async fn run<F>(&self, usernames: &[String], mut sink: F) -> HarvestReport
    where
        F: FnMut(&ProfileRecord) -> Result<()>,
    {
        let mut report = HarvestReport::default();

        for (i, username) in usernames.iter().enumerate() {
            if self.is_interrupted() {
                report.interrupted = true;
                break;
            }

            info!("[{}/{}] Collecting @{}", i + 1, usernames.len(), username);
            match self.harvest_one(username).await {
                Ok(profile) => match sink(&profile) {
                    Ok(()) => report.profiles.push(profile),
                    Err(e) => {
                        error!("Failed to save @{}: {}", username, e);
                        report.failed.push((username.clone(), e));
                    }
                },
                Err(e) => {
                    error!("Failed to collect @{}: {}", username, e);
                    report.failed.push((username.clone(), e));
                }
            }

            if i + 1 < usernames.len() && !self.is_interrupted() {
                tokio::time::sleep(self.delay).await;
            }
        }

        if self.is_interrupted() {
            report.interrupted = true;
        }

        info!(
            "Batch complete: {} succeeded, {} failed, {} posts",
            report.profiles.len(),
            report.failed.len(),
            report.post_count()
        );
        report
    }
}
