//! Configuration for callrec.
//! TOML-based, resolved as: env > file > compiled defaults.

pub mod builder_config;
pub mod defaults;
pub mod observability_config;
pub mod query_config;
pub mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use builder_config::BuilderConfig;
pub use observability_config::ObservabilityConfig;
pub use query_config::QueryConfig;
pub use store_config::StoreConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallRecConfig {
    pub builder: BuilderConfig,
    pub store: StoreConfig,
    pub query: QueryConfig,
    pub observability: ObservabilityConfig,
}

impl CallRecConfig {
    /// Load configuration.
    ///
    /// Resolution order (highest priority first):
    /// 1. Environment variables (`CALLREC_*`)
    /// 2. The TOML file at `path`, if given and present
    /// 3. Compiled defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.builder.min_context_support == 0 {
            return Err(invalid("builder.min_context_support", "must be greater than 0"));
        }
        if self.store.max_total_models == 0 {
            return Err(invalid("store.max_total_models", "must be greater than 0"));
        }
        if self.store.max_idle_per_type > self.store.max_total_models {
            return Err(invalid(
                "store.max_idle_per_type",
                "must not exceed store.max_total_models",
            ));
        }
        if self.store.template_cache_capacity == 0 {
            return Err(invalid("store.template_cache_capacity", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.query.min_probability) {
            return Err(invalid("query.min_probability", "must be between 0.0 and 1.0"));
        }
        if !(0.0..=1.0).contains(&self.query.min_pattern_probability) {
            return Err(invalid(
                "query.min_pattern_probability",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.query.max_recommendations == 0 {
            return Err(invalid("query.max_recommendations", "must be greater than 0"));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<u32>("CALLREC_MIN_CONTEXT_SUPPORT") {
            self.builder.min_context_support = v;
        }
        if let Some(v) = env_parse::<usize>("CALLREC_MAX_TOTAL_MODELS") {
            self.store.max_total_models = v;
        }
        if let Some(v) = env_parse::<usize>("CALLREC_MAX_IDLE_PER_TYPE") {
            self.store.max_idle_per_type = v;
        }
        if let Some(v) = env_parse::<f64>("CALLREC_MIN_PROBABILITY") {
            self.query.min_probability = v;
        }
        if let Some(v) = env_parse::<usize>("CALLREC_MAX_RECOMMENDATIONS") {
            self.query.max_recommendations = v;
        }
        if let Ok(v) = std::env::var("CALLREC_LOG") {
            self.observability.log_level = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
