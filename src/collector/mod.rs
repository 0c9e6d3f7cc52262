//! Incremental collection of posts from a lazily loading feed.
//!
//! A [`Collector`] owns the state of one run for one subject. Each pass feeds
//! it the units currently rendered; it normalizes them, drops misses, fresh
//! posts and duplicates, and decides when to stop. [`collect`] drives a
//! [`FeedSource`] through passes until the collector is done.

mod config;
mod repost;

pub use config::{CollectorConfig, FreshnessPolicy, SortOrder};
pub use repost::{is_repost, REPOST_MARKERS};

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::app::{MurmurError, Result};
use crate::domain::{ContentUnit, DedupKey, PostRecord};
use crate::normalizer::{relative_age, resolve_label, Normalizer};
use crate::scraper::FeedSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Running,
    Done,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    TimedOut,
    PassLimit,
    Stagnated,
    FeedEnded,
    Interrupted,
    SourceFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::TargetReached => "target reached",
            StopReason::TimedOut => "timed out",
            StopReason::PassLimit => "pass limit reached",
            StopReason::Stagnated => "no new posts",
            StopReason::FeedEnded => "end of feed",
            StopReason::Interrupted => "interrupted",
            StopReason::SourceFailed => "source failed",
        };
        f.write_str(label)
    }
}

/// Outcome of a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pass: u32,
    pub units: usize,
    pub accepted: usize,
    pub duplicates: usize,
    pub extraction_misses: usize,
    pub freshness_filtered: usize,
    pub overflow: usize,
}

/// Counters accumulated across all passes of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub passes: u32,
    pub accepted: usize,
    pub duplicates: usize,
    pub extraction_misses: usize,
    pub freshness_filtered: usize,
    pub overflow: usize,
    pub empty_batches: u32,
}

impl CollectStats {
    fn absorb(&mut self, report: &PassReport) {
        self.passes = report.pass;
        self.accepted += report.accepted;
        self.duplicates += report.duplicates;
        self.extraction_misses += report.extraction_misses;
        self.freshness_filtered += report.freshness_filtered;
        self.overflow += report.overflow;
        if report.units == 0 {
            self.empty_batches += 1;
        }
    }
}

/// Finalized result of a run.
#[derive(Debug, Clone)]
pub struct Collection {
    pub posts: Vec<PostRecord>,
    pub stats: CollectStats,
    pub stop_reason: StopReason,
}

pub struct Collector {
    config: CollectorConfig,
    normalizer: Normalizer,
    accumulated: Vec<PostRecord>,
    seen_keys: HashSet<DedupKey>,
    no_progress_streak: u32,
    pass_count: u32,
    started: Instant,
    located_any: bool,
    stats: CollectStats,
    stop_reason: Option<StopReason>,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(),
            accumulated: Vec::new(),
            seen_keys: HashSet::new(),
            no_progress_streak: 0,
            pass_count: 0,
            started: Instant::now(),
            located_any: false,
            stats: CollectStats::default(),
            stop_reason: None,
        }
    }

    pub fn state(&self) -> CollectorState {
        if self.stop_reason.is_some() {
            CollectorState::Done
        } else {
            CollectorState::Running
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() == CollectorState::Done
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn stats(&self) -> &CollectStats {
        &self.stats
    }

    pub fn accumulated(&self) -> &[PostRecord] {
        &self.accumulated
    }

    /// Ends the run early; later passes are ignored.
    pub fn stop(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
        }
    }

    fn is_fresh(&self, post: &PostRecord) -> bool {
        match self.config.freshness {
            Some(policy) => relative_age(&post.raw_text).is_some_and(|age| age < policy.window),
            None => false,
        }
    }

    /// Processes one batch of rendered units and re-evaluates the stop condition.
    ///
    /// Does nothing once the collector is done.
    pub fn ingest_pass(&mut self, units: &[ContentUnit], at_feed_end: bool) -> PassReport {
        if self.is_done() {
            return PassReport {
                pass: self.pass_count,
                ..Default::default()
            };
        }

        self.pass_count += 1;
        let mut report = PassReport {
            pass: self.pass_count,
            units: units.len(),
            ..Default::default()
        };
        if !units.is_empty() {
            self.located_any = true;
        }

        for unit in units {
            let mut post = match self.normalizer.normalize(unit) {
                Ok(post) => post,
                Err(miss) => {
                    debug!(pass = self.pass_count, "skipping unit: {}", miss);
                    report.extraction_misses += 1;
                    continue;
                }
            };

            if self.is_fresh(&post) {
                report.freshness_filtered += 1;
                continue;
            }

            post.is_repost = is_repost(unit, &post.primary_text);

            let key = post.dedup_key();
            if self.seen_keys.contains(&key) {
                report.duplicates += 1;
                continue;
            }

            if self.accumulated.len() >= self.config.target_count {
                report.overflow += 1;
                continue;
            }

            self.seen_keys.insert(key);
            self.accumulated.push(post);
            report.accepted += 1;
        }

        if report.accepted > 0 {
            self.no_progress_streak = 0;
        } else {
            self.no_progress_streak += 1;
        }

        self.stats.absorb(&report);
        if let Some(reason) = self.check_stop(at_feed_end) {
            self.stop(reason);
        }

        report
    }

    fn check_stop(&self, at_feed_end: bool) -> Option<StopReason> {
        if self.accumulated.len() >= self.config.target_count {
            Some(StopReason::TargetReached)
        } else if at_feed_end {
            Some(StopReason::FeedEnded)
        } else if self.no_progress_streak >= self.config.max_no_progress {
            Some(StopReason::Stagnated)
        } else if self.pass_count >= self.config.max_passes {
            Some(StopReason::PassLimit)
        } else if self.started.elapsed() >= self.config.max_wait {
            Some(StopReason::TimedOut)
        } else {
            None
        }
    }

    /// Orders the accumulated posts and numbers them 1..N.
    pub fn finalize(self, reference: NaiveDate) -> Collection {
        let posts = finalize_posts(self.accumulated, self.config.order, reference);
        Collection {
            posts,
            stats: self.stats,
            stop_reason: self.stop_reason.unwrap_or(StopReason::Interrupted),
        }
    }

    /// Runs passes against `source` until the collector is done.
    ///
    /// `interrupt` is checked between passes; whatever was accumulated is kept.
    /// Fails with [`MurmurError::NoData`] when nothing could be collected at all.
    pub async fn run<S>(
        mut self,
        source: &mut S,
        interrupt: &AtomicBool,
        reference: NaiveDate,
    ) -> Result<Collection>
    where
        S: FeedSource + ?Sized,
    {
        let subject = source.subject().to_string();

        while !self.is_done() {
            if interrupt.load(Ordering::SeqCst) {
                info!("Collection for @{} interrupted", subject);
                self.stop(StopReason::Interrupted);
                break;
            }

            let units = match source.content_units().await {
                Ok(units) => units,
                Err(e) => {
                    self.source_failed(&subject, e)?;
                    break;
                }
            };

            let at_end = source.is_at_feed_end().await.unwrap_or_else(|e| {
                debug!("feed end check failed: {}", e);
                false
            });

            let report = self.ingest_pass(&units, at_end);
            debug!(
                pass = report.pass,
                units = report.units,
                accepted = report.accepted,
                duplicates = report.duplicates,
                total = self.accumulated.len(),
                "pass complete"
            );

            if self.is_done() {
                break;
            }

            if let Err(e) = source.trigger_more().await {
                self.source_failed(&subject, e)?;
                break;
            }
            tokio::time::sleep(self.config.scroll_wait).await;
        }

        if !self.located_any && self.stop_reason != Some(StopReason::Interrupted) {
            return Err(MurmurError::NoData {
                subject,
                reason: format!("no posts rendered after {} passes", self.pass_count),
            });
        }

        let collection = self.finalize(reference);
        info!(
            "Collected {} posts for @{} ({})",
            collection.posts.len(),
            subject,
            collection.stop_reason
        );
        Ok(collection)
    }

    fn source_failed(&mut self, subject: &str, error: MurmurError) -> Result<()> {
        if self.accumulated.is_empty() {
            return Err(MurmurError::NoData {
                subject: subject.to_string(),
                reason: error.to_string(),
            });
        }
        warn!("Source failed for @{}, keeping partial results: {}", subject, error);
        self.stop(StopReason::SourceFailed);
        Ok(())
    }
}

/// Runs a fresh collector over `source`, dating posts relative to today.
pub async fn collect<S>(
    source: &mut S,
    config: &CollectorConfig,
    interrupt: &AtomicBool,
) -> Result<Collection>
where
    S: FeedSource + ?Sized,
{
    Collector::new(config.clone())
        .run(source, interrupt, Local::now().date_naive())
        .await
}

/// Sorts posts with a resolvable date first, in `order`, then the rest in
/// discovery order, and assigns `sequence_index` 1..N.
pub fn finalize_posts(
    posts: Vec<PostRecord>,
    order: SortOrder,
    reference: NaiveDate,
) -> Vec<PostRecord> {
    let mut keyed: Vec<(Option<NaiveDate>, PostRecord)> = posts
        .into_iter()
        .map(|post| (resolve_label(&post.published_label, reference), post))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        },
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    });

    keyed
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut post))| {
            post.sequence_index = Some(i as u32 + 1);
            post
        })
        .collect()
}
