//! TCP client module.
//!
//! This module provides the connection manager for a single logical TCP
//! connection: caller-driven sends on the owner's task, a dedicated receive
//! task performing reads for the lifetime of one connection generation, and
//! a broadcast event stream surfacing connectivity transitions and received
//! payloads to the owner.
//!
//! # Concurrency contract
//!
//! Exactly two logical contexts touch the connection while it is up: the
//! owner's task (send/disconnect at arbitrary times) and the receive task.
//! Lifecycle state is an atomic state machine; the Connected→Disconnected
//! transition is a compare-and-swap, so teardown runs exactly once no matter
//! which context triggers it.

pub mod connection;
pub mod event;

pub use connection::{ConnectError, TcpClient};
pub use event::{EventHub, LinkEvent};

use std::error::Error;

/// Result type alias for client operations.
///
/// Uses `Send + Sync` bounds on the error type so results can cross task
/// boundaries in a multi-threaded runtime.
pub type ClientResult<T> = Result<T, Box<dyn Error + Send + Sync>>;
