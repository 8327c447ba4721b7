#![deny(unsafe_code)]

//! fabricadm core — control-interface client for the fabricmond daemon.
//!
//! Provides the datagram client protocol used to issue lifecycle commands
//! (create, destroy, reset) to the long-running bridging daemon, the
//! dispatch and validation layer that turns user input into well-formed
//! binary commands, and the flexible hexadecimal identifier parser used
//! for fabric port addresses.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future — the standard return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits (stable since Rust 1.75) produces opaque return
/// types that are **not** object-safe. Traits consumed via `Box<dyn Trait>` or
/// `&dyn Trait` must return a concrete `Pin<Box<dyn Future>>` instead. This
/// alias keeps those signatures readable.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Filesystem capability checks (sysfs presence, interface-name validity).
pub mod checks;
/// Control-interface protocol: wire format and datagram transport.
pub mod clif;
/// Action dispatch: pre-flight validation, command exchange, reply reduction.
pub mod dispatch;
/// Flexible hexadecimal identifier parsing.
pub mod hex;
/// Query backend seam for adapter/target/statistics display.
pub mod query;

pub use clif::session::{ClifError, ClifTransport, DatagramTransport, Session};
pub use clif::wire::{Action, Command, Reply};
pub use dispatch::{Dispatcher, STATUS_INVALID};
pub use hex::{parse_hex, parse_port_id};
pub use query::{QueryBackend, QueryOptions};
