use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{MurmurError, Result};
use crate::domain::{Engagement, PostRecord, ProfileRecord};
use crate::store::{ProfileSummary, Store};

const PROFILE_COLUMNS: &str =
    "id, username, display_name, followers, following, post_count, description, location, verified, scraped_at, url, page_title";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            MurmurError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| MurmurError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    /// Maps a row selected with [`PROFILE_COLUMNS`]; posts are loaded separately.
    fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, ProfileRecord)> {
        Ok((
            row.get(0)?,
            ProfileRecord {
                username: row.get(1)?,
                display_name: row.get(2)?,
                followers: row.get(3)?,
                following: row.get(4)?,
                post_count: row.get(5)?,
                description: row.get(6)?,
                location: row.get(7)?,
                verified: row.get(8)?,
                scraped_at: row
                    .get::<_, String>(9)
                    .ok()
                    .and_then(|s| Self::parse_datetime(&s))
                    .unwrap_or_else(Utc::now),
                url: row.get(10)?,
                page_title: row.get(11)?,
                recent_tweets: Vec::new(),
            },
        ))
    }

    fn posts_for(conn: &Connection, profile_id: i64) -> Result<Vec<PostRecord>> {
        let mut stmt = conn.prepare(
            "SELECT text, full_text, date, likes, retweets, replies, views, is_retweet, sequence_index
             FROM posts WHERE profile_id = ?1
             ORDER BY sequence_index IS NULL, sequence_index, rowid",
        )?;

        let posts = stmt
            .query_map(params![profile_id], |row| {
                Ok(PostRecord {
                    primary_text: row.get(0)?,
                    raw_text: row.get(1)?,
                    published_label: row.get(2)?,
                    engagement: Engagement {
                        likes: row.get(3)?,
                        reposts: row.get(4)?,
                        replies: row.get(5)?,
                        views: row.get(6)?,
                    },
                    is_repost: row.get(7)?,
                    sequence_index: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(posts)
    }
}

impl Store for SqliteStore {
    fn save_profile(&self, profile: &ProfileRecord) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO profiles (username, display_name, followers, following, post_count, description, location, verified, scraped_at, url, page_title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                profile.username,
                profile.display_name,
                profile.followers,
                profile.following,
                profile.post_count,
                profile.description,
                profile.location,
                profile.verified,
                profile.scraped_at.to_rfc3339(),
                profile.url,
                profile.page_title
            ],
        )?;
        let profile_id = tx.last_insert_rowid();

        for post in &profile.recent_tweets {
            tx.execute(
                "INSERT OR IGNORE INTO posts (id, profile_id, sequence_index, text, full_text, date, likes, retweets, replies, views, length, is_retweet)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    PostRecord::generate_id(&profile.username, &post.primary_text, post.is_repost),
                    profile_id,
                    post.sequence_index,
                    post.primary_text,
                    post.raw_text,
                    post.published_label,
                    post.engagement.likes,
                    post.engagement.reposts,
                    post.engagement.replies,
                    post.engagement.views,
                    post.text_len() as i64,
                    post.is_repost
                ],
            )?;
        }

        tx.commit()?;
        Ok(profile_id)
    }

    fn get_profiles(&self) -> Result<Vec<ProfileSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT p.id, p.username, p.display_name, p.followers, p.scraped_at, COUNT(t.id)
             FROM profiles p
             LEFT JOIN posts t ON t.profile_id = p.id
             GROUP BY p.id
             ORDER BY p.scraped_at DESC, p.id DESC",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(ProfileSummary {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    display_name: row.get(2)?,
                    followers: row.get(3)?,
                    scraped_at: row
                        .get::<_, String>(4)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                    post_count: row.get::<_, i64>(5)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    fn latest_profile(&self, username: &str) -> Result<Option<ProfileRecord>> {
        let conn = self.lock()?;

        let found = conn
            .query_row(
                &format!(
                    "SELECT {PROFILE_COLUMNS} FROM profiles
                     WHERE username = ?1 COLLATE NOCASE
                     ORDER BY scraped_at DESC, id DESC LIMIT 1"
                ),
                params![username.trim_start_matches('@')],
                Self::profile_from_row,
            )
            .optional()?;

        match found {
            Some((id, mut profile)) => {
                profile.recent_tweets = Self::posts_for(&conn, id)?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    fn latest_profiles(&self) -> Result<Vec<ProfileRecord>> {
        let conn = self.lock()?;

        let rows = {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROFILE_COLUMNS} FROM profiles p
                 WHERE id = (SELECT id FROM profiles q WHERE q.username = p.username
                             ORDER BY q.scraped_at DESC, q.id DESC LIMIT 1)
                 ORDER BY username"
            ))?;
            let rows = stmt
                .query_map([], Self::profile_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter()
            .map(|(id, mut profile)| {
                profile.recent_tweets = Self::posts_for(&conn, id)?;
                Ok(profile)
            })
            .collect()
    }

    fn get_posts(&self, profile_id: i64) -> Result<Vec<PostRecord>> {
        let conn = self.lock()?;
        Self::posts_for(&conn, profile_id)
    }
}
