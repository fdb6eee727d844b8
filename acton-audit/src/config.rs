//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: ACTON_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/acton-audit/{service_name}/config.toml
//! 4. System directory: /etc/acton-audit/{service_name}/config.toml
//! 5. Default values

use chrono::NaiveTime;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Audit subsystem configuration
    #[serde(default)]
    pub audit: AuditConfig,

    /// Database configuration for the PostgreSQL audit store (optional)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level (trace, debug, info, warn, error) or a full `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Audit subsystem configuration
///
/// Loaded from the `[audit]` section of config.toml or `ACTON_AUDIT__*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit record emission (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service name stamped on audit records (defaults to `service.name`)
    #[serde(default)]
    pub service_name: Option<String>,

    /// Correlation propagation settings
    #[serde(default)]
    pub correlation: CorrelationConfig,

    /// Retention purge settings
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: None,
            correlation: CorrelationConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

/// Correlation token propagation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Header carrying the correlation token in and out (default: x-request-id)
    #[serde(default = "default_correlation_header")]
    pub header: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header: default_correlation_header(),
        }
    }
}

/// Retention purge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Run the scheduled purge (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Records older than this many days are purged (default: 365)
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Server-local time of day for the daily purge, `HH:MM` or `HH:MM:SS` (default: 03:00)
    #[serde(default = "default_purge_time")]
    pub purge_time: String,
}

/// Longest accepted retention window (100 years)
pub const MAX_RETENTION_DAYS: u32 = 36_525;

impl RetentionConfig {
    /// Retention window as a duration, rejecting windows over [`MAX_RETENTION_DAYS`]
    pub fn retention_window(&self) -> Result<chrono::Duration> {
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(Error::InvalidConfig(format!(
                "audit.retention.retention_days {} exceeds the maximum of {}",
                self.retention_days, MAX_RETENTION_DAYS
            )));
        }
        Ok(chrono::Duration::days(i64::from(self.retention_days)))
    }

    /// Parse the configured time of day
    pub fn purge_time(&self) -> Result<NaiveTime> {
        let raw = self.purge_time.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| {
                Error::InvalidConfig(format!(
                    "audit.retention.purge_time '{}' is not a valid time of day: {}",
                    self.purge_time, e
                ))
            })
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: default_retention_days(),
            purge_time: default_purge_time(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_correlation_header() -> String {
    "x-request-id".to_string()
}

fn default_retention_days() -> u32 {
    365
}

fn default_purge_time() -> String {
    "03:00".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connection_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found is used):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/acton-audit/{service_name}/config.toml
    /// 3. System directory: /etc/acton-audit/{service_name}/config.toml
    ///
    /// Environment variables (ACTON_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "acton-audit".to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::named(service_name)));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("ACTON_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses XDG directories and loads directly from the given path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ACTON_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize fine but cannot be used at runtime
    pub fn validate(&self) -> Result<()> {
        self.audit.retention.purge_time()?;
        self.audit.retention.retention_window()?;
        if self.audit.correlation.header.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "audit.correlation.header must not be empty".to_string(),
            ));
        }
        if http::HeaderName::from_bytes(self.audit.correlation.header.as_bytes()).is_err() {
            return Err(Error::InvalidConfig(format!(
                "audit.correlation.header '{}' is not a valid header name",
                self.audit.correlation.header
            )));
        }
        Ok(())
    }

    /// Service name stamped on audit records
    pub fn audit_service_name(&self) -> &str {
        self.audit
            .service_name
            .as_deref()
            .unwrap_or(&self.service.name)
    }

    /// Get database URL
    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().map(|db| db.url.as_str())
    }

    /// Find all possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        paths.push(PathBuf::from("config.toml"));

        let xdg_dirs = xdg::BaseDirectories::with_prefix("acton-audit");
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/acton-audit")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    fn named(service_name: &str) -> Self {
        let mut config = Self::default();
        config.service.name = service_name.to_string();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "acton-audit".to_string(),
                log_level: default_log_level(),
                environment: default_environment(),
            },
            audit: AuditConfig::default(),
            database: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.log_level, "info");
        assert!(config.audit.enabled);
        assert_eq!(config.audit.correlation.header, "x-request-id");
        assert_eq!(config.audit.retention.retention_days, 365);
        assert_eq!(config.audit.retention.purge_time, "03:00");
        assert!(config.database.is_none());
    }

    #[test]
    fn test_purge_time_parsing() {
        let mut retention = RetentionConfig::default();
        assert_eq!(
            retention.purge_time().unwrap(),
            NaiveTime::from_hms_opt(3, 0, 0).unwrap()
        );

        retention.purge_time = "23:15:30".to_string();
        assert_eq!(
            retention.purge_time().unwrap(),
            NaiveTime::from_hms_opt(23, 15, 30).unwrap()
        );

        retention.purge_time = "25:00".to_string();
        assert!(matches!(
            retention.purge_time(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_audit_service_name_falls_back_to_service() {
        let mut config = Config::default();
        assert_eq!(config.audit_service_name(), "acton-audit");

        config.audit.service_name = Some("billing".to_string());
        assert_eq!(config.audit_service_name(), "billing");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "orders"

[audit.retention]
retention_days = 30
purge_time = "01:30"

[audit.correlation]
header = "x-correlation-id"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "orders");
        assert_eq!(config.audit.retention.retention_days, 30);
        assert_eq!(config.audit.retention.purge_time, "01:30");
        assert_eq!(config.audit.correlation.header, "x-correlation-id");
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_load_from_rejects_bad_purge_time() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "orders"

[audit.retention]
purge_time = "noon"
"#
        )
        .unwrap();

        assert!(matches!(
            Config::load_from(file.path()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_header() {
        let mut config = Config::default();
        config.audit.correlation.header = "not a header".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_retention() {
        let mut config = Config::default();
        config.audit.retention.retention_days = MAX_RETENTION_DAYS;
        assert!(config.validate().is_ok());

        config.audit.retention.retention_days = 100_000_000;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
