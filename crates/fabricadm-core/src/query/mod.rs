//! Query backend seam for adapter/target/statistics display.
//!
//! The display layer is a read-only formatting surface over the fabric
//! transport class. The dispatcher talks to it through [`QueryBackend`]
//! so its own contracts stay testable without touching sysfs. Display
//! methods do their own output and error reporting; only loading the
//! backend is fallible.

pub mod sysfs;

pub use sysfs::SysfsQuery;

/// Default statistics refresh interval, in seconds, substituted when the
/// user gave none.
pub const DEFAULT_STATS_INTERVAL: u64 = 1;

/// Errors from loading a query backend.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to load fabric query interface: {0}")]
    Unavailable(String),
}

/// Options aggregate for the query paths, built once from parsed
/// arguments and passed by reference thereafter.
#[derive(Debug, Default, Clone)]
pub struct QueryOptions {
    /// Restrict output to this interface, if given.
    pub ifname: Option<String>,

    /// Parsed 24-bit fabric port identifier for LUN queries.
    pub port_id: Option<u32>,

    /// Decimal LUN identifier for LUN queries.
    pub lun_id: Option<u32>,

    /// Statistics refresh interval in seconds; `None` means the caller
    /// wants [`DEFAULT_STATS_INTERVAL`].
    pub stats_interval: Option<u64>,
}

/// A loadable adapter/target/statistics display backend.
pub trait QueryBackend {
    /// Prepare the backend; must be called before any display method.
    fn load(&mut self) -> Result<(), QueryError>;

    /// Release the backend. Always called after the display methods,
    /// whether or not they produced output.
    fn unload(&mut self);

    /// Print adapter information, optionally filtered by
    /// `opts.ifname`.
    fn display_adapter_info(&self, opts: &QueryOptions);

    /// Print discovered target information; honors `opts.ifname`,
    /// `opts.port_id`, and `opts.lun_id` filters.
    fn display_target_info(&self, opts: &QueryOptions);

    /// Print port statistics for `opts.ifname`, refreshing at
    /// `opts.stats_interval` seconds. Runs until the process is killed.
    fn display_port_stats(&self, opts: &QueryOptions);
}
