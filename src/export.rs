//! JSON rendering of collected profiles.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::app::Result;
use crate::domain::ProfileRecord;

/// Default file name for a batch finished at `at`.
pub fn results_file_name(at: DateTime<Utc>) -> String {
    format!("profiles_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `profiles` as a pretty-printed JSON array, creating parent directories.
pub fn write_profiles(path: &Path, profiles: &[ProfileRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(profiles)?;
    fs::write(path, json)?;
    info!("Wrote {} profiles to {}", profiles.len(), path.display());
    Ok(())
}

/// Writes a batch into `dir` under a timestamped name and returns the path.
pub fn write_batch(dir: &Path, profiles: &[ProfileRecord]) -> Result<PathBuf> {
    let path = dir.join(results_file_name(Utc::now()));
    write_profiles(&path, profiles)?;
    Ok(path)
}

pub fn read_profiles(path: &Path) -> Result<Vec<ProfileRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::{Engagement, PostRecord};

    fn sample() -> ProfileRecord {
        let mut profile = ProfileRecord::new("jane", "https://x.com/jane");
        let mut post = PostRecord::new(
            "Great news",
            "Great news · Aug 9 1,234 56 12 3.4K",
            "Aug 9",
            Engagement {
                likes: "1234".into(),
                reposts: "56".into(),
                replies: "12".into(),
                views: "3.4K".into(),
            },
        );
        post.sequence_index = Some(1);
        profile.recent_tweets.push(post);
        profile
    }

    #[test]
    fn test_results_file_name() {
        let at = Utc.with_ymd_and_hms(2025, 10, 19, 8, 30, 5).unwrap();
        assert_eq!(results_file_name(at), "profiles_20251019_083005.json");
    }

    #[test]
    fn test_document_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_profiles(&path, &[sample()]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let post = &value[0]["recent_tweets"][0];
        assert_eq!(value[0]["username"], "jane");
        assert_eq!(post["index"], 1);
        assert_eq!(post["text"], "Great news");
        assert_eq!(post["date"], "Aug 9");
        assert_eq!(post["interactions"]["retweets"], "56");
        assert_eq!(post["length"], 10);
        assert_eq!(post["is_retweet"], false);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_batch(&dir.path().join("nested"), &[sample()]).unwrap();
        assert!(path.exists());

        let profiles = read_profiles(&path).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].recent_tweets, sample().recent_tweets);
    }
}
