//! Control interface — Unix datagram transport to the fabricmond daemon.
//!
//! The daemon listens on a single well-known datagram socket. Each
//! client invocation binds an ephemeral private socket, sends one
//! fixed-size command record, and waits (bounded by a fixed timeout)
//! for one ASCII status reply.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   one datagram each way    ┌──────────────┐
//! │ fabricadm  │───────────────────────────▶│  fabricmond  │
//! │ (per-proc  │   20-byte command record   │  (well-known │
//! │  socket)   │◀───────────────────────────│   socket)    │
//! └────────────┘   ASCII status reply       └──────────────┘
//! ```
//!
//! There is no connection state and no retransmission; the timeout is
//! the only liveness guard against a daemon that is down or wedged.

pub mod session;
pub mod wire;

pub use session::{ClifError, ClifTransport, DatagramTransport, Session, RESPONSE_TIMEOUT};
pub use wire::{Action, Command, Reply, COMMAND_WIRE_SIZE, IFNAME_SIZE, MAX_REPLY_SIZE};
