#![deny(unsafe_code)]

//! Configuration loading and validation for fabricadm.
//!
//! Loads TOML configuration files and validates them against expected
//! schemas. Provides the [`AppConfig`] type as the central configuration
//! structure: the daemon's control socket and pid file, the sysfs roots
//! used for pre-flight checks, and the logging level.
//!
//! The control-interface response timeout is deliberately *not* part of
//! the configuration; it is a fixed protocol constant in
//! `fabricadm-core`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where to find the managing daemon (fabricmond).
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Sysfs roots used for capability checks and queries.
    #[serde(default)]
    pub sysfs: SysfsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the managing daemon's control interface.
///
/// The defaults are the daemon's well-known install paths. They are
/// overridable for test rigs and non-standard deployments, but a normal
/// installation never sets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// The daemon's well-known control socket (Unix datagram).
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// The daemon's pid file; must be open-able read/write before any
    /// lifecycle command is sent.
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            pid_file: default_pid_file(),
        }
    }
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/var/run/fabricmond.sock")
}

fn default_pid_file() -> PathBuf {
    PathBuf::from("/var/run/fabricmond.pid")
}

/// Sysfs directories consulted for pre-flight checks and queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysfsConfig {
    /// Sysfs mount point; its absence means the kernel side is missing.
    #[serde(default = "default_sysfs_mount")]
    pub mount: PathBuf,

    /// Network device class directory (one subdirectory per interface).
    #[serde(default = "default_net_class")]
    pub net_class: PathBuf,

    /// Fabric host transport class directory.
    #[serde(default = "default_fc_host_class")]
    pub fc_host_class: PathBuf,

    /// Fabric remote-port transport class directory.
    #[serde(default = "default_fc_remote_class")]
    pub fc_remote_class: PathBuf,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            mount: default_sysfs_mount(),
            net_class: default_net_class(),
            fc_host_class: default_fc_host_class(),
            fc_remote_class: default_fc_remote_class(),
        }
    }
}

fn default_sysfs_mount() -> PathBuf {
    PathBuf::from("/sys")
}

fn default_net_class() -> PathBuf {
    PathBuf::from("/sys/class/net")
}

fn default_fc_host_class() -> PathBuf {
    PathBuf::from("/sys/class/fc_host")
}

fn default_fc_remote_class() -> PathBuf {
    PathBuf::from("/sys/class/fc_remote_ports")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths: [(&str, &Path); 6] = [
            ("daemon.socket_path", &self.daemon.socket_path),
            ("daemon.pid_file", &self.daemon.pid_file),
            ("sysfs.mount", &self.sysfs.mount),
            ("sysfs.net_class", &self.sysfs.net_class),
            ("sysfs.fc_host_class", &self.sysfs.fc_host_class),
            ("sysfs.fc_remote_class", &self.sysfs.fc_remote_class),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name} must not be empty"
                )));
            }
        }

        if self.logging.level.is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.daemon.socket_path,
            PathBuf::from("/var/run/fabricmond.sock")
        );
        assert_eq!(
            config.daemon.pid_file,
            PathBuf::from("/var/run/fabricmond.pid")
        );
        assert_eq!(config.sysfs.mount, PathBuf::from("/sys"));
        assert_eq!(config.sysfs.net_class, PathBuf::from("/sys/class/net"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.sysfs.mount, PathBuf::from("/sys"));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [daemon]
            socket_path = "/run/test/fabricmond.sock"
            pid_file = "/run/test/fabricmond.pid"

            [sysfs]
            mount = "/mnt/sysfs"
            net_class = "/mnt/sysfs/class/net"

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(
            config.daemon.socket_path,
            PathBuf::from("/run/test/fabricmond.sock")
        );
        assert_eq!(config.sysfs.mount, PathBuf::from("/mnt/sysfs"));
        // Unset sections keep their defaults
        assert_eq!(
            config.sysfs.fc_host_class,
            PathBuf::from("/sys/class/fc_host")
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_empty_socket_path() {
        let toml = r#"
            [daemon]
            socket_path = ""
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_level() {
        let toml = r#"
            [logging]
            level = ""
        "#;
        let result = AppConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fabricadm.toml");
        tokio::fs::write(&path, b"[logging]\nlevel = \"trace\"\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.logging.level, "trace");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(result.is_err());
    }
}
