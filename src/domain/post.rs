use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Label used when no date pattern matches a post's raw text.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Shortest primary text (in characters) a post may carry.
pub const MIN_TEXT_CHARS: usize = 5;

/// Engagement counts exactly as rendered, e.g. `"1.2K"` or `"3万"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: String,
    #[serde(rename = "retweets", alias = "reposts")]
    pub reposts: String,
    pub replies: String,
    pub views: String,
}

impl Default for Engagement {
    fn default() -> Self {
        Self {
            likes: "0".into(),
            reposts: "0".into(),
            replies: "0".into(),
            views: "0".into(),
        }
    }
}

impl Engagement {
    /// True when every count still holds its default.
    pub fn is_unset(&self) -> bool {
        [&self.likes, &self.reposts, &self.replies, &self.views]
            .iter()
            .all(|v| v.as_str() == "0")
    }
}

/// Identity of a post within one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub text: String,
    pub is_repost: bool,
}

/// One extracted post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PostDocument", from = "PostDocument")]
pub struct PostRecord {
    pub primary_text: String,
    pub raw_text: String,
    pub published_label: String,
    pub engagement: Engagement,
    pub is_repost: bool,
    /// 1-based position, assigned once the run is finalized.
    pub sequence_index: Option<u32>,
}

impl PostRecord {
    pub fn new(
        primary_text: impl Into<String>,
        raw_text: impl Into<String>,
        published_label: impl Into<String>,
        engagement: Engagement,
    ) -> Self {
        Self {
            primary_text: primary_text.into(),
            raw_text: raw_text.into(),
            published_label: published_label.into(),
            engagement,
            is_repost: false,
            sequence_index: None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            text: self.primary_text.clone(),
            is_repost: self.is_repost,
        }
    }

    /// Length of the primary text in characters.
    pub fn text_len(&self) -> usize {
        self.primary_text.chars().count()
    }

    pub fn has_known_date(&self) -> bool {
        self.published_label != UNKNOWN_LABEL
    }

    /// Deterministic row ID for a post belonging to `username`.
    pub fn generate_id(username: &str, primary_text: &str, is_repost: bool) -> String {
        let mut hasher = Sha256::new();
        hasher.update(username.as_bytes());
        hasher.update(primary_text.as_bytes());
        hasher.update([u8::from(is_repost)]);
        hex::encode(hasher.finalize())
    }
}

/// Serialized shape of a post inside a profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub text: String,
    pub full_text: String,
    pub date: String,
    pub interactions: Engagement,
    pub length: usize,
    pub is_retweet: bool,
}

impl From<PostRecord> for PostDocument {
    fn from(post: PostRecord) -> Self {
        let length = post.text_len();
        Self {
            index: post.sequence_index,
            text: post.primary_text,
            full_text: post.raw_text,
            date: post.published_label,
            interactions: post.engagement,
            length,
            is_retweet: post.is_repost,
        }
    }
}

impl From<PostDocument> for PostRecord {
    fn from(doc: PostDocument) -> Self {
        Self {
            primary_text: doc.text,
            raw_text: doc.full_text,
            published_label: doc.date,
            engagement: doc.interactions,
            is_repost: doc.is_retweet,
            sequence_index: doc.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PostRecord {
        PostRecord::new(
            "Shipping the new release today",
            "Jane\n@jane\n·\nAug 9\nShipping the new release today\n12\n3\n1",
            "Aug 9",
            Engagement::default(),
        )
    }

    #[test]
    fn test_engagement_defaults_to_zero() {
        let e = Engagement::default();
        assert_eq!(e.likes, "0");
        assert_eq!(e.views, "0");
        assert!(e.is_unset());
    }

    #[test]
    fn test_dedup_key_distinguishes_repost() {
        let original = sample();
        let mut repost = sample();
        repost.is_repost = true;
        assert_ne!(original.dedup_key(), repost.dedup_key());
        assert_eq!(original.dedup_key(), sample().dedup_key());
    }

    #[test]
    fn test_text_len_counts_chars() {
        let post = PostRecord::new("今天天气很好", "", UNKNOWN_LABEL, Engagement::default());
        assert_eq!(post.text_len(), 6);
        assert!(!post.has_known_date());
    }

    #[test]
    fn test_id_generation_deterministic_and_repost_aware() {
        let a = PostRecord::generate_id("jane", "hello world", false);
        let b = PostRecord::generate_id("jane", "hello world", false);
        let c = PostRecord::generate_id("jane", "hello world", true);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut post = sample();
        post.sequence_index = Some(3);
        post.is_repost = true;
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["index"], 3);
        assert_eq!(value["text"], "Shipping the new release today");
        assert_eq!(value["date"], "Aug 9");
        assert_eq!(value["length"], 30);
        assert_eq!(value["is_retweet"], true);
        assert_eq!(value["interactions"]["retweets"], "0");
        assert!(value["interactions"].get("reposts").is_none());
    }

    #[test]
    fn test_unfinalized_post_omits_index() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("index").is_none());
    }
}
