//! # RofloBank Desktop Library
//!
//! Sets up logging and configuration, starts a session against the local
//! host, and runs the console loop.
//!
//! ## Module Organization
//! ```text
//! roflo_desktop_lib/
//! ├── lib.rs          ◄─── You are here (startup & console loop)
//! ├── commands.rs     ◄─── Command parsing and execution
//! ├── host.rs         ◄─── LocalHost: the in-process host bridge
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod host;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{execute_line, Outcome};
use host::LocalHost;
use roflo_session::{HostBridge, Session, SessionConfig};

/// Runs the storefront shell until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,roflo=debug, can be overridden with RUST_LOG        │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • roflobank.toml + ROFLO_* environment, defaults on error           │
/// │                                                                         │
/// │  3. Start Session ────────────────────────────────────────────────────► │
/// │     • LocalHost as the host bridge                                      │
/// │     • Initial account data, signal subscription                         │
/// │                                                                         │
/// │  4. Console Loop ─────────────────────────────────────────────────────► │
/// │     • stdin line → command → JSON response on stdout                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> std::io::Result<()> {
    init_tracing();

    info!("Starting RofloBank");

    let config = SessionConfig::load_or_default(None);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_console(config))
}

async fn run_console(config: SessionConfig) -> std::io::Result<()> {
    let host = Arc::new(LocalHost::default());
    let bridge: Arc<dyn HostBridge> = host.clone();
    let mut session = Session::start(&config, bridge).await;

    let mut stdout = tokio::io::stdout();
    write_json(&mut stdout, &session.view()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match execute_line(&mut session, &host, &line).await {
            Outcome::Continue(response) => write_json(&mut stdout, &response).await?,
            Outcome::Quit => break,
        }
    }

    session.shutdown();
    info!(listeners = host.listener_count(), "RofloBank stopped");
    Ok(())
}

async fn write_json<T: serde::Serialize>(
    out: &mut tokio::io::Stdout,
    value: &T,
) -> std::io::Result<()> {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("Response serialization failed: {}", e);
            serde_json::json!({ "error": error::ApiError::from(e) }).to_string()
        }
    };
    out.write_all(json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=roflo_session=trace` - Trace a single crate
/// - Default: INFO, DEBUG for the roflo crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,roflo=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
