//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
///
/// Routing-critical values are optional on purpose: a misconfigured gateway
/// degrades to forwarding traffic untouched instead of failing closed, and
/// the defect is surfaced in logs.
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    /// Root domain of the platform, e.g. "quiverhq.com" for *.quiverhq.com
    /// tenant routing. When unset, every request is forwarded unmodified.
    pub base_host: Option<String>,

    // Database (organization lookups)
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Sessions
    /// HS256 secret the auth service signs access tokens with. When unset,
    /// every request resolves as anonymous.
    pub session_jwt_secret: Option<String>,
    /// Cookie the web app stores the access token in.
    pub session_cookie: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            base_host: env::var("BASE_HOST")
                .ok()
                .map(|h| normalize_base_host(&h))
                .filter(|h| !h.is_empty()),

            // Database
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            // Sessions
            session_jwt_secret: match env::var("SESSION_JWT_SECRET") {
                // Ensure the signing key is cryptographically strong
                Ok(secret) if secret.len() < 32 => {
                    return Err(ConfigError::WeakSecret(
                        "SESSION_JWT_SECRET must be at least 32 characters",
                    ))
                }
                Ok(secret) => Some(secret),
                Err(_) => None,
            },
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "qv-access-token".to_string()),
        })
    }
}

/// Lowercase, trim whitespace, and drop any trailing dot or stray scheme so
/// host comparisons are exact.
fn normalize_base_host(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .trim_end_matches('.')
        .to_lowercase()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}
