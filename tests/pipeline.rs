use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use murmur::app::{MurmurError, Result};
use murmur::collector::{CollectorConfig, SortOrder, StopReason};
use murmur::domain::{ContentUnit, ControlLabels, ProfileSnapshot, UNKNOWN_LABEL};
use murmur::export;
use murmur::harvest::Harvester;
use murmur::scraper::{FeedSource, OpenedProfile, Scraper};
use murmur::store::{SqliteStore, Store};

/// Reveals one more page of posts per scroll, like a lazily loading timeline.
struct PagedFeed {
    username: String,
    pages: Vec<Vec<ContentUnit>>,
    revealed: usize,
}

#[async_trait]
impl FeedSource for PagedFeed {
    fn subject(&self) -> &str {
        &self.username
    }

    async fn content_units(&mut self) -> Result<Vec<ContentUnit>> {
        Ok(self.pages.iter().take(self.revealed).flatten().cloned().collect())
    }

    async fn trigger_more(&mut self) -> Result<()> {
        self.revealed = (self.revealed + 1).min(self.pages.len());
        Ok(())
    }

    async fn is_at_feed_end(&mut self) -> Result<bool> {
        Ok(false)
    }
}

fn post(body: &str, date: &str, counts: &str) -> ContentUnit {
    ContentUnit {
        full_text: format!("Jane Doe\n@jane · {}\n{}\n{}", date, body, counts),
        body_text: Some(body.to_string()),
        ..Default::default()
    }
}

fn timeline() -> Vec<Vec<ContentUnit>> {
    vec![
        vec![
            post("Shipping the parser rewrite", "Aug 9", "12 3 1 2.1K"),
            ContentUnit {
                social_context: Some("Jane Doe reposted".into()),
                ..post("Shipping the parser rewrite", "Aug 9", "40 9 2 10K")
            },
        ],
        vec![
            post("Shipping the parser rewrite", "Aug 9", "12 3 1 2.1K"),
            post("Notes on lexer design", "Aug 1", "5 1"),
            ContentUnit {
                controls: ControlLabels {
                    like: vec!["77 Likes. Like".into()],
                    view: vec!["1.5万 Views".into()],
                    ..Default::default()
                },
                ..post("Undated thoughts about testing", "", "")
            },
        ],
        vec![post("ok", "Aug 3", "")],
    ]
}

struct TimelineScraper;

#[async_trait]
impl Scraper for TimelineScraper {
    type Feed = PagedFeed;

    async fn open_profile(&self, username: &str) -> Result<OpenedProfile<PagedFeed>> {
        if username == "ghost" {
            return Ok(OpenedProfile {
                url: "https://x.com/ghost".into(),
                snapshot: ProfileSnapshot::default(),
                feed: PagedFeed {
                    username: username.into(),
                    pages: Vec::new(),
                    revealed: 0,
                },
            });
        }
        Ok(OpenedProfile {
            url: format!("https://x.com/{}", username),
            snapshot: ProfileSnapshot {
                display_name: Some("Jane Doe\n@jane".into()),
                followers: vec!["1,024 Followers".into()],
                following: vec!["88 Following".into()],
                post_count: vec!["1,203 posts".into()],
                verified: true,
                ..Default::default()
            },
            feed: PagedFeed {
                username: username.into(),
                pages: timeline(),
                revealed: 1,
            },
        })
    }
}

fn config() -> CollectorConfig {
    CollectorConfig {
        scroll_wait: Duration::ZERO,
        max_no_progress: 3,
        ..Default::default()
    }
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
}

#[tokio::test]
async fn test_collects_orders_and_persists_profile() {
    let scraper = TimelineScraper;
    let harvester = Harvester::new(&scraper, config(), Duration::ZERO).with_reference(reference());
    let store = SqliteStore::in_memory().unwrap();

    let report = harvester
        .run(&["jane".to_string()], |profile| store.save_profile(profile).map(|_| ()))
        .await;
    assert!(report.failed.is_empty());

    let profile = &report.profiles[0];
    assert_eq!(profile.display_name, "Jane Doe");
    assert_eq!(profile.followers, "1024");
    assert_eq!(profile.following, "88");
    assert_eq!(profile.post_count, "1203");
    assert!(profile.verified);

    let posts = &profile.recent_tweets;
    let summary: Vec<(&str, &str, bool)> = posts
        .iter()
        .map(|p| (p.primary_text.as_str(), p.published_label.as_str(), p.is_repost))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Notes on lexer design", "Aug 1", false),
            ("Shipping the parser rewrite", "Aug 9", false),
            ("Shipping the parser rewrite", "Aug 9", true),
            ("Undated thoughts about testing", UNKNOWN_LABEL, false),
        ]
    );
    let indexes: Vec<u32> = posts.iter().filter_map(|p| p.sequence_index).collect();
    assert_eq!(indexes, vec![1, 2, 3, 4]);

    assert_eq!(posts[1].engagement.likes, "12");
    assert_eq!(posts[1].engagement.views, "2.1K");
    assert_eq!(posts[3].engagement.likes, "77");
    assert_eq!(posts[3].engagement.views, "1.5万");

    let stored = store.latest_profile("jane").unwrap().unwrap();
    assert_eq!(stored.recent_tweets, profile.recent_tweets);
}

#[tokio::test]
async fn test_descending_order_and_json_document() {
    let scraper = TimelineScraper;
    let config = CollectorConfig {
        order: SortOrder::Descending,
        ..config()
    };
    let harvester = Harvester::new(&scraper, config, Duration::ZERO).with_reference(reference());
    let report = harvester.run(&["jane".to_string()], |_| Ok(())).await;

    let labels: Vec<&str> = report.profiles[0]
        .recent_tweets
        .iter()
        .map(|p| p.published_label.as_str())
        .collect();
    assert_eq!(labels, vec!["Aug 9", "Aug 9", "Aug 1", UNKNOWN_LABEL]);

    let dir = tempfile::tempdir().unwrap();
    let path = export::write_batch(dir.path(), &report.profiles).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value[0]["recent_tweets"][0]["index"], 1);
    assert_eq!(value[0]["recent_tweets"][2]["is_retweet"], false);
    assert_eq!(value[0]["following"], "88");
    assert_eq!(value[0]["tweets_count"], "1203");
}

#[tokio::test]
async fn test_target_count_caps_results() {
    let scraper = TimelineScraper;
    let config = CollectorConfig {
        target_count: 2,
        ..config()
    };
    let harvester = Harvester::new(&scraper, config, Duration::ZERO).with_reference(reference());
    let report = harvester.run(&["jane".to_string()], |_| Ok(())).await;

    assert_eq!(report.profiles[0].recent_tweets.len(), 2);
}

#[tokio::test]
async fn test_empty_profile_reports_no_data_and_batch_continues() {
    let scraper = TimelineScraper;
    let harvester = Harvester::new(&scraper, config(), Duration::ZERO).with_reference(reference());
    let report = harvester
        .run(&["ghost".to_string(), "jane".to_string()], |_| Ok(()))
        .await;

    assert_eq!(report.profiles.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, MurmurError::NoData { .. }));
}

#[tokio::test]
async fn test_collect_driver_reports_stop_reason() {
    let mut feed = PagedFeed {
        username: "jane".into(),
        pages: timeline(),
        revealed: 1,
    };
    let interrupt = std::sync::atomic::AtomicBool::new(false);
    let collection = murmur::collector::collect(&mut feed, &config(), &interrupt)
        .await
        .unwrap();

    assert_eq!(collection.posts.len(), 4);
    assert_eq!(collection.stop_reason, StopReason::Stagnated);
    assert_eq!(collection.stats.extraction_misses, 3);
}
