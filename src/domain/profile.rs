use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PostRecord;

/// Placeholder for profile fields the page did not expose.
pub const UNKNOWN_FIELD: &str = "unknown";

fn zero_count() -> String {
    "0".into()
}

/// One collected subject: profile header plus its finalized posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: String,
    pub display_name: String,
    pub followers: String,
    #[serde(default = "zero_count")]
    pub following: String,
    #[serde(rename = "tweets_count", default = "zero_count")]
    pub post_count: String,
    pub description: String,
    pub location: String,
    pub verified: bool,
    pub scraped_at: DateTime<Utc>,
    pub url: String,
    pub page_title: String,
    pub recent_tweets: Vec<PostRecord>,
}

impl ProfileRecord {
    pub fn new(username: impl Into<String>, url: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            page_title: format!("@{}", username),
            username,
            display_name: UNKNOWN_FIELD.into(),
            followers: "0".into(),
            following: "0".into(),
            post_count: "0".into(),
            description: String::new(),
            location: UNKNOWN_FIELD.into(),
            verified: false,
            scraped_at: Utc::now(),
            url: url.into(),
            recent_tweets: Vec::new(),
        }
    }

    pub fn repost_count(&self) -> usize {
        self.recent_tweets.iter().filter(|p| p.is_repost).count()
    }

    pub fn original_count(&self) -> usize {
        self.recent_tweets.len() - self.repost_count()
    }
}
