use std::time::Duration;

use serde::Deserialize;

/// Engine configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the remote ranking service
    #[serde(default = "default_ranking_api_url")]
    pub ranking_api_url: String,

    /// Upper bound on the remote ranking call, in seconds
    #[serde(default = "default_ranking_timeout_secs")]
    pub ranking_timeout_secs: u64,

    /// Minimum number of recommendations the orchestrator tries to return
    #[serde(default = "default_min_recommendations")]
    pub min_recommendations: usize,

    /// Neighbours considered by collaborative filtering
    #[serde(default = "default_similar_users")]
    pub similar_users: usize,

    /// Number of recent interactions sent to the remote ranker
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Trending score above which an event is flagged as trending
    #[serde(default = "default_trending_threshold")]
    pub trending_threshold: f64,
}

fn default_ranking_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_ranking_timeout_secs() -> u64 {
    60
}

fn default_min_recommendations() -> usize {
    10
}

fn default_similar_users() -> usize {
    10
}

fn default_history_limit() -> usize {
    100
}

fn default_trending_threshold() -> f64 {
    70.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking_api_url: default_ranking_api_url(),
            ranking_timeout_secs: default_ranking_timeout_secs(),
            min_recommendations: default_min_recommendations(),
            similar_users: default_similar_users(),
            history_limit: default_history_limit(),
            trending_threshold: default_trending_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn ranking_timeout(&self) -> Duration {
        Duration::from_secs(self.ranking_timeout_secs)
    }

    /// Knobs consumed by the orchestrator
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            min_recommendations: self.min_recommendations,
            similar_users: self.similar_users,
            history_limit: self.history_limit,
        }
    }
}

/// Per-request tuning of the recommendation orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub min_recommendations: usize,
    pub similar_users: usize,
    pub history_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Config::default().engine_settings()
    }
}
