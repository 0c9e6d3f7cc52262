use serde::{Deserialize, Serialize};
use std::time::Duration;

fn selectors(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// CSS selectors used to snapshot posts and the profile header.
///
/// Every list is tried in order; the first selector that matches wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selectors for one rendered post
    pub unit: Vec<String>,
    /// Dedicated post body inside a unit
    pub body: Vec<String>,
    /// Language-tagged text inside a unit
    pub localized: Vec<String>,
    /// Inline text fragments inside a unit
    pub fragment: Vec<String>,
    /// "X reposted" style header inside a unit
    pub social_context: Vec<String>,
    pub like: Vec<String>,
    pub repost: Vec<String>,
    pub reply: Vec<String>,
    pub view: Vec<String>,
    pub display_name: Vec<String>,
    pub description: Vec<String>,
    pub location: Vec<String>,
    pub verified: Vec<String>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub post_count: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            unit: selectors(&["article[data-testid=\"tweet\"]", "[data-testid=\"tweet\"]", "article"]),
            body: selectors(&["[data-testid=\"tweetText\"]"]),
            localized: selectors(&["[lang]"]),
            fragment: selectors(&["span"]),
            social_context: selectors(&["[data-testid=\"socialContext\"]"]),
            like: selectors(&[
                "[data-testid=\"like\"]",
                "[data-testid=\"unlike\"]",
                "[aria-label*=\"Like\"]",
                "[aria-label*=\"点赞\"]",
            ]),
            repost: selectors(&[
                "[data-testid=\"retweet\"]",
                "[data-testid=\"unretweet\"]",
                "[aria-label*=\"Repost\"]",
                "[aria-label*=\"转发\"]",
            ]),
            reply: selectors(&[
                "[data-testid=\"reply\"]",
                "[aria-label*=\"Reply\"]",
                "[aria-label*=\"回复\"]",
            ]),
            view: selectors(&[
                "[data-testid=\"analytics\"]",
                "[aria-label*=\"View\"]",
                "[aria-label*=\"浏览\"]",
            ]),
            display_name: selectors(&["[data-testid=\"UserName\"]"]),
            description: selectors(&["[data-testid=\"UserDescription\"]", "[data-testid=\"UserBio\"]"]),
            location: selectors(&[
                "[data-testid=\"UserLocation\"]",
                "[data-testid=\"UserProfileHeader_Items\"] span",
            ]),
            verified: selectors(&["[data-testid=\"UserVerifiedBadge\"]", "[data-testid=\"icon-verified\"]"]),
            followers: selectors(&[
                "a[href*=\"/verified_followers\"] span",
                "a[href*=\"/followers\"] span",
                "[data-testid=\"UserFollowersCount\"]",
                "a[href*=\"/followers\"]",
            ]),
            following: selectors(&[
                "a[href*=\"/following\"] span",
                "[data-testid=\"UserFollowingCount\"]",
                "[data-testid=\"UserProfileStats\"] a[href*=\"/following\"] span",
                "a[href*=\"/following\"]",
            ]),
            post_count: selectors(&[
                "[data-testid=\"UserTweetsCount\"]",
                "[data-testid=\"UserProfileStats\"] span",
                "[data-testid=\"primaryColumn\"] h2 + div",
            ]),
        }
    }
}

/// Configuration for the browser scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Host of an already running browser's remote-debugging endpoint
    pub debug_host: String,

    /// Remote-debugging port (default: 9222)
    pub debug_port: u16,

    /// Launch a new browser instead of attaching to a running one (default: false)
    pub launch: bool,

    /// Run a launched browser headless (default: true)
    pub headless: bool,

    /// Site root profiles are resolved against
    pub base_url: String,

    /// Page load timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait after navigation for the timeline to render, in milliseconds (default: 5000)
    pub wait_after_load_ms: u64,

    /// Pixels scrolled per pass (default: 600)
    pub scroll_pixels: u32,

    /// Consecutive passes at the bottom of the page before the feed counts as ended (default: 3)
    pub end_confirmations: u32,

    /// Pause between subjects in a batch, in seconds (default: 3)
    pub subject_delay_secs: u64,

    /// User agent for launched browsers
    pub user_agent: Option<String>,

    pub selectors: SelectorConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            debug_host: "127.0.0.1".to_string(),
            debug_port: 9222,
            launch: false,
            headless: true,
            base_url: "https://x.com".to_string(),
            timeout_secs: 30,
            wait_after_load_ms: 5000,
            scroll_pixels: 600,
            end_confirmations: 3,
            subject_delay_secs: 3,
            user_agent: None,
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }

    pub fn subject_delay(&self) -> Duration {
        Duration::from_secs(self.subject_delay_secs)
    }

    /// Endpoint that advertises the browser's websocket debugger URL
    pub fn version_endpoint(&self) -> String {
        format!("http://{}:{}/json/version", self.debug_host, self.debug_port)
    }

    /// Profile page for `username`
    pub fn profile_url(&self, username: &str) -> crate::app::Result<url::Url> {
        let base = url::Url::parse(&self.base_url)?;
        Ok(base.join(username.trim_start_matches('@'))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ScraperConfig::default();
        assert_eq!(config.debug_port, 9222);
        assert!(!config.launch);
        assert!(config.headless);
        assert_eq!(config.scroll_pixels, 600);
        assert_eq!(config.end_confirmations, 3);
        assert!(!config.selectors.unit.is_empty());
        assert!(!config.selectors.like.is_empty());
    }

    #[test]
    fn test_durations() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.wait_after_load(), Duration::from_millis(5000));
        assert_eq!(config.subject_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_version_endpoint() {
        let config = ScraperConfig {
            debug_port: 9333,
            ..Default::default()
        };
        assert_eq!(config.version_endpoint(), "http://127.0.0.1:9333/json/version");
    }

    #[test]
    fn test_profile_url_strips_at_sign() {
        let config = ScraperConfig::default();
        assert_eq!(config.profile_url("@jane").unwrap().as_str(), "https://x.com/jane");
        assert_eq!(config.profile_url("jane").unwrap().as_str(), "https://x.com/jane");
    }

    #[test]
    fn test_partial_selectors_keep_defaults() {
        let config: ScraperConfig = toml::from_str(
            r#"
debug_port = 9000

[selectors]
unit = ["div.post"]
"#,
        )
        .unwrap();
        assert_eq!(config.debug_port, 9000);
        assert_eq!(config.selectors.unit, vec!["div.post".to_string()]);
        assert_eq!(config.selectors.body, SelectorConfig::default().body);
    }
}
