pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::domain::{PostRecord, ProfileRecord};

pub use sqlite::SqliteStore;

/// One stored collection run, without its posts.
#[derive(Debug, Clone)]
pub struct ProfileSummary {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub followers: String,
    pub scraped_at: DateTime<Utc>,
    pub post_count: usize,
}

pub trait Store {
    // Profile operations
    fn save_profile(&self, profile: &ProfileRecord) -> Result<i64>;
    fn get_profiles(&self) -> Result<Vec<ProfileSummary>>;
    fn latest_profile(&self, username: &str) -> Result<Option<ProfileRecord>>;
    fn latest_profiles(&self) -> Result<Vec<ProfileRecord>>;

    // Post operations
    fn get_posts(&self, profile_id: i64) -> Result<Vec<PostRecord>>;
}
