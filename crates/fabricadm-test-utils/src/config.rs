//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values
//! without repeating boilerplate across crate boundaries.

use std::path::{Path, PathBuf};

use fabricadm_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .socket_path("/tmp/test.sock")
///     .provision_interface("eth0")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Root every system path under `dir` (a test temp directory).
    pub fn rooted_at(mut self, dir: &Path) -> Self {
        self.config.daemon.socket_path = dir.join("fabricmond.sock");
        self.config.daemon.pid_file = dir.join("fabricmond.pid");
        self.config.sysfs.mount = dir.join("sys");
        self.config.sysfs.net_class = dir.join("sys/class/net");
        self.config.sysfs.fc_host_class = dir.join("sys/class/fc_host");
        self.config.sysfs.fc_remote_class = dir.join("sys/class/fc_remote_ports");
        self
    }

    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.daemon.socket_path = path.into();
        self
    }

    pub fn pid_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.daemon.pid_file = path.into();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    /// Create the sysfs directories and pid file so that every
    /// lifecycle pre-flight check passes for `ifname`. Call after
    /// [`rooted_at`](Self::rooted_at).
    pub fn provision_interface(self, ifname: &str) -> Self {
        std::fs::create_dir_all(self.config.sysfs.net_class.join(ifname))
            .expect("failed to create net class dir");
        std::fs::write(&self.config.daemon.pid_file, b"1234\n")
            .expect("failed to write pid file");
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
