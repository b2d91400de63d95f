use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::EngagementWeights;
use crate::services::{FeedSettings, SelectorSettings};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Items shown before a session ends
    #[serde(default = "default_max_videos")]
    pub max_videos: usize,

    /// Items that must be shown before personalization
    #[serde(default = "default_min_profiling_videos")]
    pub min_profiling_videos: usize,

    /// Total engagement score required before personalization
    #[serde(default = "default_min_engagement_total")]
    pub min_engagement_total: f64,

    /// Visibility in milliseconds before a long view is credited
    #[serde(default = "default_dwell_threshold_ms")]
    pub dwell_threshold_ms: u64,

    /// Sessions untouched for this many seconds are evicted
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,

    /// JSON catalog file; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Fixed RNG seed for reproducible sessions
    #[serde(default)]
    pub rng_seed: Option<u64>,

    #[serde(default = "default_like_weight")]
    pub like_weight: f64,

    #[serde(default = "default_comment_weight")]
    pub comment_weight: f64,

    #[serde(default = "default_share_weight")]
    pub share_weight: f64,

    #[serde(default = "default_long_view_weight")]
    pub long_view_weight: f64,

    #[serde(default = "default_completed_view_weight")]
    pub completed_view_weight: f64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_videos() -> usize {
    10
}

fn default_min_profiling_videos() -> usize {
    6
}

fn default_min_engagement_total() -> f64 {
    10.0
}

fn default_dwell_threshold_ms() -> u64 {
    3000
}

fn default_session_idle_timeout_secs() -> u64 {
    1800
}

fn default_like_weight() -> f64 {
    EngagementWeights::default().like
}

fn default_comment_weight() -> f64 {
    EngagementWeights::default().comment
}

fn default_share_weight() -> f64 {
    EngagementWeights::default().share
}

fn default_long_view_weight() -> f64 {
    EngagementWeights::default().long_view
}

fn default_completed_view_weight() -> f64 {
    EngagementWeights::default().completed_view
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_videos == 0 {
            anyhow::bail!("MAX_VIDEOS must be at least 1");
        }
        if self.session_idle_timeout_secs == 0 {
            anyhow::bail!("SESSION_IDLE_TIMEOUT_SECS must be at least 1");
        }
        let weights = [
            self.like_weight,
            self.comment_weight,
            self.share_weight,
            self.long_view_weight,
            self.completed_view_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            anyhow::bail!("Engagement weights must be positive");
        }
        Ok(())
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    /// Session settings derived from this configuration
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            selector: SelectorSettings {
                min_profiling_videos: self.min_profiling_videos,
                min_engagement_total: self.min_engagement_total,
                ..Default::default()
            },
            weights: EngagementWeights {
                like: self.like_weight,
                comment: self.comment_weight,
                share: self.share_weight,
                long_view: self.long_view_weight,
                completed_view: self.completed_view_weight,
                ..Default::default()
            },
            max_videos: self.max_videos,
            dwell_threshold: Duration::from_millis(self.dwell_threshold_ms),
            rng_seed: self.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_videos, 10);
        assert!(config.catalog_path.is_none());

        let settings = config.feed_settings();
        assert_eq!(settings.selector.min_profiling_videos, 6);
        assert_eq!(settings.weights.completed_view, 7.0);
        assert_eq!(settings.dwell_threshold, Duration::from_secs(3));
        assert_eq!(config.session_idle_timeout(), Duration::from_secs(1800));
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("MAX_VIDEOS".to_string(), "20".to_string()),
            ("LIKE_WEIGHT".to_string(), "5".to_string()),
            ("RNG_SEED".to_string(), "42".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        let settings = config.feed_settings();
        assert_eq!(settings.max_videos, 20);
        assert_eq!(settings.weights.like, 5.0);
        assert_eq!(settings.rng_seed, Some(42));
    }

    #[test]
    fn test_rejects_zero_max_videos() {
        let vars = vec![("MAX_VIDEOS".to_string(), "0".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();
        assert!(config.validate().is_err());
    }
}
