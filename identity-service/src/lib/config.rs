use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::access::gate::AccessRequirements;

/// Engine tunables.
///
/// Every knob has a default except the JWT secret, which the host must
/// supply.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub access: AccessRequirements,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
    #[serde(default = "default_reset_token_ttl_minutes")]
    pub reset_token_ttl_minutes: i64,
    /// Most-recent non-revoked records scanned per refresh-token lookup.
    #[serde(default = "default_refresh_scan_window")]
    pub refresh_scan_window: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
            reset_token_ttl_minutes: default_reset_token_ttl_minutes(),
            refresh_scan_window: default_refresh_scan_window(),
        }
    }
}

fn default_access_token_ttl_minutes() -> i64 {
    15
}

fn default_refresh_token_ttl_days() -> i64 {
    30
}

fn default_reset_token_ttl_minutes() -> i64 {
    30
}

fn default_refresh_scan_window() -> usize {
    crate::domain::token::ledger::DEFAULT_SCAN_WINDOW
}

impl EngineConfig {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, TOKENS__REFRESH_SCAN_WINDOW, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: EngineConfig = configuration.try_deserialize()?;

        Ok(config)
    }
}
