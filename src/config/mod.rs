//! Configuration management for Murmur.
//!
//! Configuration is read from `~/.config/murmur/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::collector::CollectorConfig;
use crate::scraper::ScraperConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub collector: CollectorConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load configuration from `config_path`, creating it when absent.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/murmur/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("murmur").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Murmur Configuration

[scraper]
# Attach to a browser started with --remote-debugging-port
debug_host = "127.0.0.1"
debug_port = 9222

# Launch a new browser instead of attaching
launch = false

# Run a launched browser without a visible window
headless = true

base_url = "https://x.com"

# Page load timeout in seconds
timeout_secs = 30

# Wait after opening a profile for the timeline to render (milliseconds)
wait_after_load_ms = 5000

# Pixels scrolled between passes
scroll_pixels = 600

# Passes spent at the bottom of the page before the feed counts as ended
end_confirmations = 3

# Pause between subjects in a batch (seconds)
subject_delay_secs = 3

# CSS selectors can be overridden under [scraper.selectors], e.g.
# unit = ["article[data-testid=\"tweet\"]"]

[collector]
# Stop once this many posts are collected
target_count = 50

# Give up after this many seconds
max_wait = 300

# Give up after this many scroll passes
max_passes = 500

# Give up after this many passes without a new post
max_no_progress = 8

# Seconds to wait after each scroll
scroll_wait = 2

# Newest or oldest first: "ascending" or "descending"
order = "ascending"

# Skip posts younger than `window` seconds (relative timestamps such as "2h")
# [collector.freshness]
# window = 86400
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
