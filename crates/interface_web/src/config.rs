//! Server configuration

use serde::Deserialize;

use core_kernel::CoreError;

/// Longest access token lifetime the server accepts (one year)
pub const MAX_JWT_EXPIRATION_SECS: u64 = 365 * 24 * 3600;

/// Which store backs the blog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process memory; data is lost on restart
    Memory,
}

/// Server configuration
///
/// Every field can be set through a `BLOG_`-prefixed environment variable,
/// e.g. `BLOG_PORT=8000` or `BLOG_STORAGE=memory`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub database_url: String,
    pub log_level: String,
    pub storage: StorageBackend,
    /// Directory uploaded images are written to and served from
    pub media_root: String,
    /// Lifetime of a cached home page
    pub index_cache_ttl_secs: u64,
    pub posts_per_page: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 24 * 3600,
            database_url: "postgres://localhost/blog".to_string(),
            log_level: "info".to_string(),
            storage: StorageBackend::Postgres,
            media_root: "media".to_string(),
            index_cache_ttl_secs: 20,
            posts_per_page: core_kernel::POSTS_PER_PAGE,
        }
    }
}

impl WebConfig {
    /// Loads configuration from `BLOG_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BLOG"))
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the server cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CoreError::configuration("jwt_secret must not be empty"));
        }
        if self.jwt_expiration_secs == 0 || self.jwt_expiration_secs > MAX_JWT_EXPIRATION_SECS {
            return Err(CoreError::configuration(format!(
                "jwt_expiration_secs must be between 1 and {}",
                MAX_JWT_EXPIRATION_SECS
            )));
        }
        if self.posts_per_page == 0 {
            return Err(CoreError::configuration("posts_per_page must be at least 1"));
        }
        if self.media_root.trim().is_empty() {
            return Err(CoreError::configuration("media_root must not be empty"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.index_cache_ttl_secs, 20);
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_validate() {
        assert!(WebConfig::default().validate().is_ok());

        let config = WebConfig {
            posts_per_page: 0,
            ..WebConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_validate_bounds_token_lifetime() {
        for secs in [0, MAX_JWT_EXPIRATION_SECS + 1, u64::MAX] {
            let config = WebConfig {
                jwt_expiration_secs: secs,
                ..WebConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(CoreError::Configuration(_))),
                "{}",
                secs
            );
        }

        let config = WebConfig {
            jwt_expiration_secs: MAX_JWT_EXPIRATION_SECS,
            ..WebConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: WebConfig = config::Config::builder()
            .set_override("port", 9000)
            .unwrap()
            .set_override("storage", "memory")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.host, "0.0.0.0");
    }
}
