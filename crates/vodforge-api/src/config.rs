//! API configuration.

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared secret the worker tier presents on callbacks and progress
    /// writes. A capability boundary, not a user credential.
    pub callback_token: String,
    /// Root directory media items live under; default thumbnail paths are
    /// derived from it
    pub media_root: String,
    /// SQLite database URL
    pub database_url: String,
    /// Redis URL (progress cache)
    pub redis_url: String,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            callback_token: String::new(),
            media_root: "data/videos".to_string(),
            database_url: "sqlite://vodforge.db".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            max_body_size: 1024 * 1024, // 1MB; payloads here are tiny JSON
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            callback_token: std::env::var("CALLBACK_TOKEN").unwrap_or_default(),
            media_root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "data/videos".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://vodforge.db".to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
