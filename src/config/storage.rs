//! Key-value storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Which key-value backend to use
    #[serde(default)]
    pub backend: StorageBackend,

    /// Redis connection URL, required for the redis backend
    pub redis_url: Option<String>,

    /// Optional key namespace, so several deployments can share one Redis
    pub namespace: Option<String>,
}

/// Key-value backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; state is lost on restart
    #[default]
    Memory,
    Redis,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend != StorageBackend::Redis {
            return Ok(());
        }

        match self.redis_url.as_deref() {
            None | Some("") => Err(ValidationError::MissingRequired("REDIS_URL")),
            Some(url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                Err(ValidationError::InvalidRedisUrl)
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_needs_nothing() {
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("REDIS_URL"))
        );
    }

    #[test]
    fn test_redis_backend_rejects_http_url() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: Some("http://localhost:6379".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRedisUrl));
    }

    #[test]
    fn test_redis_backend_valid() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: Some("redis://localhost:6379".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
