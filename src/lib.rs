//! Wireline library
//!
//! This crate provides a persistent, bidirectional TCP client: one logical
//! connection to a fixed remote endpoint, caller-driven sends, and a
//! dedicated background receive loop that republishes inbound bytes as
//! decoded text.
//!
//! The owning application drives the connection through three operations
//! ([`TcpClient::connect`], [`TcpClient::send`], [`TcpClient::disconnect`])
//! and observes it through a broadcast event stream ([`LinkEvent`]):
//! connectivity transitions and received payloads.
//!
//! Payloads are opaque UTF-8 text over a raw TCP byte stream - no framing,
//! length-prefixing, or multiplexing. Whatever bytes are written arrive in
//! order; chunk boundaries carry no meaning. Any message semantics must be
//! layered on top by the owner.
//!
//! # Example
//!
//! ```no_run
//! use wireline::{LinkEvent, TcpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = TcpClient::new("127.0.0.1".to_string(), 5000);
//!     let mut events = client.subscribe();
//!
//!     client.connect().await?;
//!     client.send("hello").await;
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             LinkEvent::DataReceived(text) => println!("{}", text),
//!             LinkEvent::StateChanged(false) => break,
//!             LinkEvent::StateChanged(true) => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

/// Client module providing the TCP connection manager and its event stream.
pub mod client;

/// Configuration utilities: TOML schema, loader, and error types.
pub mod config;

/// Logging initialization for the `tracing` subscriber.
pub mod logging;

pub use client::connection::{ConnectError, TcpClient};
pub use client::event::{EventHub, LinkEvent};
pub use config::schema::Config;
