use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Direction for posts with a resolvable date. Undated posts always go last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Skips posts whose relative timestamp ("· 2h", "· now") is younger than `window`.
///
/// Posts with an absolute date are never considered fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    #[serde(with = "secs")]
    pub window: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(24 * 3_600),
        }
    }
}

/// Limits and policies for one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub target_count: usize,
    #[serde(with = "secs")]
    pub max_wait: Duration,
    pub max_passes: u32,
    pub max_no_progress: u32,
    #[serde(with = "secs")]
    pub scroll_wait: Duration,
    pub freshness: Option<FreshnessPolicy>,
    pub order: SortOrder,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            target_count: 50,
            max_wait: Duration::from_secs(300),
            max_passes: 500,
            max_no_progress: 8,
            scroll_wait: Duration::from_secs(2),
            freshness: None,
            order: SortOrder::Ascending,
        }
    }
}

/// Durations are written as whole seconds in config files.
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
