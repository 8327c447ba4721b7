#![deny(unsafe_code)]

//! fabricadm — administrative CLI for the fabricmond bridging daemon.
//!
//! Argument parsing lives here and nowhere else; everything after
//! parsing goes through [`Dispatcher`], so the dispatch and validation
//! contracts stay testable without a command line.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fabricadm_config::AppConfig;
use fabricadm_core::query::SysfsQuery;
use fabricadm_core::{
    checks, parse_port_id, DatagramTransport, Dispatcher, QueryOptions, STATUS_INVALID,
};

/// fabricadm — manage network-to-storage bridge instances.
#[derive(Parser)]
#[command(
    name = "fabricadm",
    version = fabricadm_core::build_info::version_string(),
    about,
    long_about = None
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "/etc/fabricadm.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a bridge instance on an interface.
    Create {
        /// Network interface name (e.g. eth0).
        ifname: String,
    },

    /// Destroy the bridge instance on an interface.
    Destroy {
        /// Network interface name (e.g. eth0).
        ifname: String,
    },

    /// Reset the fabric host associated with an interface.
    Reset {
        /// Network interface name (e.g. eth0).
        ifname: String,
    },

    /// Show adapter information.
    Interface {
        /// Restrict output to one interface.
        ifname: Option<String>,
    },

    /// Show discovered target information.
    Target {
        /// Restrict output to one interface.
        ifname: Option<String>,
    },

    /// Show targets matching a fabric port identifier, optionally one LUN.
    Lun {
        /// Hex port identifier (1a2b3c, 1a:2b:3c, or 1a-2b-3c).
        port_id: Option<String>,

        /// Decimal LUN identifier.
        lun_id: Option<u32>,
    },

    /// Show port statistics, refreshing periodically.
    Stats {
        /// Network interface name (e.g. eth0).
        ifname: String,

        /// Refresh interval in seconds.
        #[arg(short = 'n', long = "interval", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = match load_config(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fabricadm: {e}");
            std::process::exit(STATUS_INVALID);
        }
    };

    let rc = run(cli.command, &config).await;
    std::process::exit(rc);
}

async fn run(command: Commands, config: &AppConfig) -> i32 {
    let transport = DatagramTransport::new(&config.daemon.socket_path);
    let dispatcher = Dispatcher::new(config, &transport);

    match command {
        Commands::Create { ifname } => dispatcher.create(&ifname).await,
        Commands::Destroy { ifname } => dispatcher.destroy(&ifname).await,
        Commands::Reset { ifname } => dispatcher.reset(&ifname).await,

        Commands::Interface { ifname } => {
            if let Some(rc) = reject_unknown_interface(config, ifname.as_deref()) {
                return rc;
            }
            let opts = QueryOptions {
                ifname,
                ..QueryOptions::default()
            };
            let mut backend = SysfsQuery::new(config.sysfs.clone());
            dispatcher.query_adapter(&mut backend, &opts)
        }

        Commands::Target { ifname } => {
            if let Some(rc) = reject_unknown_interface(config, ifname.as_deref()) {
                return rc;
            }
            let opts = QueryOptions {
                ifname,
                ..QueryOptions::default()
            };
            let mut backend = SysfsQuery::new(config.sysfs.clone());
            dispatcher.query_target(&mut backend, &opts)
        }

        Commands::Lun { port_id, lun_id } => {
            let mut opts = QueryOptions::default();
            if let Some(token) = port_id {
                match parse_port_id(&token) {
                    Ok(id) => opts.port_id = Some(id),
                    Err(e) => {
                        eprintln!("fabricadm: invalid port identifier {token:?}: {e}");
                        return STATUS_INVALID;
                    }
                }
                opts.lun_id = lun_id;
            }
            let mut backend = SysfsQuery::new(config.sysfs.clone());
            dispatcher.query_target(&mut backend, &opts)
        }

        Commands::Stats { ifname, interval } => {
            if let Some(rc) = reject_unknown_interface(config, Some(&ifname)) {
                return rc;
            }
            let opts = QueryOptions {
                ifname: Some(ifname),
                stats_interval: interval,
                ..QueryOptions::default()
            };
            let mut backend = SysfsQuery::new(config.sysfs.clone());
            dispatcher.port_stats(&mut backend, &opts)
        }
    }
}

/// Query paths refuse interface arguments that are syntactically invalid
/// or have no device directory.
fn reject_unknown_interface(config: &AppConfig, ifname: Option<&str>) -> Option<i32> {
    let name = ifname?;
    if checks::validate_interface(&config.sysfs, name) {
        None
    } else {
        eprintln!("fabricadm: interface {name} not found");
        Some(STATUS_INVALID)
    }
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path).await.map_err(|e| anyhow::anyhow!(e))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from(["fabricadm", "create", "eth0"]).unwrap();
        assert!(matches!(cli.command, Commands::Create { ifname } if ifname == "eth0"));
    }

    #[test]
    fn test_create_requires_interface() {
        assert!(Cli::try_parse_from(["fabricadm", "create"]).is_err());
    }

    #[test]
    fn test_parse_interface_optional_arg() {
        let cli = Cli::try_parse_from(["fabricadm", "interface"]).unwrap();
        assert!(matches!(cli.command, Commands::Interface { ifname: None }));

        let cli = Cli::try_parse_from(["fabricadm", "interface", "eth2"]).unwrap();
        assert!(matches!(cli.command, Commands::Interface { ifname: Some(n) } if n == "eth2"));
    }

    #[test]
    fn test_parse_lun_with_ids() {
        let cli = Cli::try_parse_from(["fabricadm", "lun", "1a:2b:3c", "4"]).unwrap();
        match cli.command {
            Commands::Lun { port_id, lun_id } => {
                assert_eq!(port_id.as_deref(), Some("1a:2b:3c"));
                assert_eq!(lun_id, Some(4));
            }
            _ => panic!("expected lun subcommand"),
        }
    }

    #[test]
    fn test_parse_stats_interval() {
        let cli = Cli::try_parse_from(["fabricadm", "stats", "eth0", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Stats { ifname, interval } => {
                assert_eq!(ifname, "eth0");
                assert_eq!(interval, Some(3));
            }
            _ => panic!("expected stats subcommand"),
        }
    }

    #[test]
    fn test_stats_interval_must_be_positive() {
        assert!(Cli::try_parse_from(["fabricadm", "stats", "eth0", "-n", "0"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["fabricadm", "frobnicate"]).is_err());
    }

    #[tokio::test]
    async fn test_lun_with_bad_port_id_is_invalid() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fabricadm_test_utils::TestConfigBuilder::new()
            .rooted_at(tmp.path())
            .build();

        let rc = run(
            Commands::Lun {
                port_id: Some("zz:zz:zz".to_string()),
                lun_id: None,
            },
            &config,
        )
        .await;
        assert_eq!(rc, STATUS_INVALID);
    }

    #[tokio::test]
    async fn test_query_with_unknown_interface_is_invalid() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fabricadm_test_utils::TestConfigBuilder::new()
            .rooted_at(tmp.path())
            .build();

        let rc = run(
            Commands::Interface {
                ifname: Some("eth0".to_string()),
            },
            &config,
        )
        .await;
        assert_eq!(rc, STATUS_INVALID);
    }
}
