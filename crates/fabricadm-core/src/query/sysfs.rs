//! Sysfs-backed query display.
//!
//! Reads the fabric transport class directories and prints attribute
//! summaries. Output formatting is deliberately plain: one
//! `name: value` line per attribute, one blank line between entries.

use std::fs;
use std::path::{Path, PathBuf};

use fabricadm_config::SysfsConfig;
use tracing::debug;

use super::{QueryBackend, QueryError, QueryOptions, DEFAULT_STATS_INTERVAL};

const ADAPTER_ATTRS: &[&str] = &[
    "symbolic_name",
    "node_name",
    "port_name",
    "port_id",
    "port_state",
    "speed",
    "fabric_name",
];

const TARGET_ATTRS: &[&str] = &["node_name", "port_name", "port_id", "roles", "port_state"];

const STATS_ATTRS: &[&str] = &[
    "tx_frames",
    "tx_words",
    "rx_frames",
    "rx_words",
    "error_frames",
    "invalid_crc_count",
    "link_failure_count",
];

/// Query backend reading the fc transport class out of sysfs.
pub struct SysfsQuery {
    sysfs: SysfsConfig,
    loaded: bool,
}

impl SysfsQuery {
    pub fn new(sysfs: SysfsConfig) -> Self {
        Self {
            sysfs,
            loaded: false,
        }
    }

    /// Hosts under the fc_host class, optionally restricted to the one
    /// whose underlying network device matches `ifname`.
    fn hosts(&self, ifname: Option<&str>) -> Vec<PathBuf> {
        let mut hosts: Vec<PathBuf> = fs::read_dir(&self.sysfs.fc_host_class)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| match ifname {
                Some(name) => host_matches_ifname(p, name),
                None => true,
            })
            .collect();
        hosts.sort();
        hosts
    }

    fn print_entry(path: &Path, attrs: &[&str]) {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{label}:");
        for attr in attrs {
            if let Some(value) = read_attr(path, attr) {
                println!("    {attr}: {value}");
            }
        }
        println!();
    }
}

/// A host serves `ifname` when its symbolic name mentions the device.
/// The transport class embeds the netdev name in `symbolic_name`, which
/// is cheaper and more portable than chasing device symlinks.
fn host_matches_ifname(host: &Path, ifname: &str) -> bool {
    read_attr(host, "symbolic_name")
        .map(|s| s.split_whitespace().any(|w| w == ifname))
        .unwrap_or(false)
}

fn read_attr(dir: &Path, attr: &str) -> Option<String> {
    fs::read_to_string(dir.join(attr))
        .ok()
        .map(|s| s.trim().to_string())
}

impl QueryBackend for SysfsQuery {
    fn load(&mut self) -> Result<(), QueryError> {
        if !self.sysfs.fc_host_class.is_dir() {
            return Err(QueryError::Unavailable(format!(
                "{} not present (is the fabric transport class loaded?)",
                self.sysfs.fc_host_class.display()
            )));
        }
        debug!(root = %self.sysfs.fc_host_class.display(), "query backend loaded");
        self.loaded = true;
        Ok(())
    }

    fn unload(&mut self) {
        self.loaded = false;
    }

    fn display_adapter_info(&self, opts: &QueryOptions) {
        for host in self.hosts(opts.ifname.as_deref()) {
            Self::print_entry(&host, ADAPTER_ATTRS);
        }
    }

    fn display_target_info(&self, opts: &QueryOptions) {
        let mut ports: Vec<PathBuf> = fs::read_dir(&self.sysfs.fc_remote_class)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        ports.sort();

        for port in ports {
            if let Some(want) = opts.port_id {
                let found = read_attr(&port, "port_id")
                    .and_then(|s| u32::from_str_radix(s.trim_start_matches("0x"), 16).ok());
                if found != Some(want) {
                    continue;
                }
            }
            Self::print_entry(&port, TARGET_ATTRS);
            if let Some(lun) = opts.lun_id {
                println!("    lun: {lun}");
            }
        }
    }

    fn display_port_stats(&self, opts: &QueryOptions) {
        let interval = opts.stats_interval.unwrap_or(DEFAULT_STATS_INTERVAL);
        let hosts = self.hosts(opts.ifname.as_deref());
        loop {
            for host in &hosts {
                let stats = host.join("statistics");
                Self::print_entry(&stats, STATS_ATTRS);
            }
            std::thread::sleep(std::time::Duration::from_secs(interval));
        }
    }
}
