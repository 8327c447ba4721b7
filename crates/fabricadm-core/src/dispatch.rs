//! Action dispatch: pre-flight validation, command exchange, and reply
//! reduction.
//!
//! Lifecycle actions (create/destroy/reset) validate their environment
//! before any datagram is sent; if any check fails, the daemon is never
//! contacted. The daemon's reply is reduced to an integer status that
//! becomes the process result. Query actions never touch the wire; they
//! delegate to the display layer behind [`QueryBackend`].

use std::fs::OpenOptions;

use fabricadm_config::AppConfig;
use tracing::debug;

use crate::checks;
use crate::clif::session::{ClifError, ClifTransport};
use crate::clif::wire::{Action, Command};
use crate::query::{QueryBackend, QueryOptions, DEFAULT_STATS_INTERVAL};

/// Sentinel status meaning "operation not attempted / invalid usage"
/// (negated `EINVAL`). Distinct from any daemon reply code, which is
/// propagated verbatim.
pub const STATUS_INVALID: i32 = -22;

/// Maps a user-selected action to its validation policy, command
/// exchange, and result reduction.
pub struct Dispatcher<'a> {
    config: &'a AppConfig,
    transport: &'a dyn ClifTransport,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a AppConfig, transport: &'a dyn ClifTransport) -> Self {
        Self { config, transport }
    }

    /// Instantiate the bridge on `ifname`.
    pub async fn create(&self, ifname: &str) -> i32 {
        self.lifecycle(Action::Create, ifname).await
    }

    /// Tear the bridge down on `ifname`.
    pub async fn destroy(&self, ifname: &str) -> i32 {
        self.lifecycle(Action::Destroy, ifname).await
    }

    /// Reset the fabric host bound to `ifname`.
    pub async fn reset(&self, ifname: &str) -> i32 {
        self.lifecycle(Action::Reset, ifname).await
    }

    async fn lifecycle(&self, action: Action, ifname: &str) -> i32 {
        if !self.preflight(ifname) {
            eprintln!("fabricadm: failed to {action} bridge instance on {ifname}");
            return STATUS_INVALID;
        }

        let cmd = Command::new(action, ifname);
        debug!(%action, ifname, "sending lifecycle command");
        match self.transport.request(&cmd).await {
            Ok(reply) => reply.status(),
            Err(ClifError::TimedOut) => {
                eprintln!("Command timed out");
                STATUS_INVALID
            }
            Err(e) => {
                eprintln!("Command failed: {e}");
                STATUS_INVALID
            }
        }
    }

    /// All pre-flight conditions for a lifecycle action. Every failing
    /// condition is reported individually; all must pass.
    fn preflight(&self, ifname: &str) -> bool {
        let mut ok = true;

        if !checks::dir_exists(&self.config.sysfs.mount) {
            eprintln!(
                "fabricadm: sysfs mount point {} not found",
                self.config.sysfs.mount.display()
            );
            ok = false;
        }

        if !checks::ifname_valid(ifname) {
            eprintln!("fabricadm: invalid interface name");
            ok = false;
        }

        if !checks::dir_exists(&self.config.sysfs.net_class.join(ifname)) {
            eprintln!("fabricadm: interface {ifname} not found");
            ok = false;
        }

        if OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.config.daemon.pid_file)
            .is_err()
        {
            eprintln!("fabricadm: fabricmond is not running");
            ok = false;
        }

        ok
    }

    /// Display adapter information through the query backend.
    pub fn query_adapter(&self, backend: &mut dyn QueryBackend, opts: &QueryOptions) -> i32 {
        if let Err(e) = backend.load() {
            eprintln!("fabricadm: {e}");
            return STATUS_INVALID;
        }
        backend.display_adapter_info(opts);
        backend.unload();
        0
    }

    /// Display target information through the query backend. LUN queries
    /// take this path too, carrying a parsed port identifier (and
    /// optionally a LUN id) in `opts`.
    pub fn query_target(&self, backend: &mut dyn QueryBackend, opts: &QueryOptions) -> i32 {
        if let Err(e) = backend.load() {
            eprintln!("fabricadm: {e}");
            return STATUS_INVALID;
        }
        backend.display_target_info(opts);
        backend.unload();
        0
    }

    /// Display port statistics. An interface is required; a missing
    /// refresh interval is replaced by [`DEFAULT_STATS_INTERVAL`].
    pub fn port_stats(&self, backend: &mut dyn QueryBackend, opts: &QueryOptions) -> i32 {
        if opts.ifname.is_none() {
            eprintln!("fabricadm: statistics require an interface");
            return STATUS_INVALID;
        }

        let mut effective = opts.clone();
        if effective.stats_interval.is_none() {
            effective.stats_interval = Some(DEFAULT_STATS_INTERVAL);
        }

        if let Err(e) = backend.load() {
            eprintln!("fabricadm: {e}");
            return STATUS_INVALID;
        }
        backend.display_port_stats(&effective);
        backend.unload();
        0
    }
}
