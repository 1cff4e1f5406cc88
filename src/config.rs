use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language code sent with every metadata lookup
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Prefix prepended to TMDB poster paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Placeholder image used when no poster is available
    #[serde(default = "default_fallback_poster_url")]
    pub fallback_poster_url: String,

    /// Path to the precomputed catalog (JSON)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Path to the precomputed similarity matrix (JSON)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Number of recommendations returned per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Per-attempt timeout for metadata requests, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Total attempts per metadata request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Seconds a session may sit unchanged before it is evicted
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_fallback_poster_url() -> String {
    "https://via.placeholder.com/500x750?text=No+Image".to_string()
}

fn default_movies_path() -> String {
    "movies.json".to_string()
}

fn default_similarity_path() -> String {
    "similarity.json".to_string()
}

fn default_recommendation_count() -> usize {
    5
}

fn default_request_timeout_ms() -> u64 {
    3000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
