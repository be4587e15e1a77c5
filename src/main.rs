//! Wireline - CLI entry point
//!
//! A thin interactive front-end over the library: connects to the configured
//! endpoint, forwards stdin lines to the link, and prints received payloads
//! to stdout. Ctrl-C (or stdin EOF, or the link dropping) disconnects and
//! exits.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use wireline::config::loader;
use wireline::{LinkEvent, TcpClient};

/// Interactive TCP client
#[derive(Parser)]
#[command(name = "wireline")]
#[command(version, about = "Interactive TCP client with a background receive loop")]
struct Cli {
    /// Remote host to connect to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Remote TCP port to connect to (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    wireline::logging::init();

    let mut config = match loader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let client = TcpClient::from_config(&config);
    let mut events = client.subscribe();

    if client.connect().await.is_err() {
        // Cause already logged and surfaced via StateChanged(false).
        return ExitCode::FAILURE;
    }

    // Print received payloads until the link goes down.
    let mut printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LinkEvent::DataReceived(text)) => {
                    print!("{}", text);
                    use std::io::Write;
                    let _ = std::io::stdout().flush();
                }
                Ok(LinkEvent::StateChanged(true)) => tracing::debug!("Link up"),
                Ok(LinkEvent::StateChanged(false)) => {
                    tracing::debug!("Link down");
                    break;
                }
                Err(RecvError::Lagged(n)) => tracing::warn!("Dropped {} events", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut printer_done = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    // stdin strips the newline; restore it so line-oriented
                    // peers see the boundary. The link itself adds no framing.
                    Ok(Some(line)) => client.send(&format!("{}\n", line)).await,
                    Ok(None) => {
                        tracing::debug!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, disconnecting");
                break;
            }
            _ = &mut printer => {
                // Link dropped (peer close or I/O failure); nothing left to do.
                printer_done = true;
                break;
            }
        }
    }

    client.disconnect().await;
    if !printer_done {
        let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;
    }

    ExitCode::SUCCESS
}
