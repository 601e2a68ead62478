use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scriptgate_gateway::{AppState, GatewayConfig};

/// HTTP gateway for sandboxed script execution and image extraction
#[derive(Debug, Parser)]
#[command(name = "scriptgate", version, about)]
struct Cli {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0:5000", env = "SCRIPTGATE_BIND")]
    bind: SocketAddr,

    /// Override the listen port (legacy deployment knob)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Secret required in the Authorization header
    #[arg(long, env = "SECURE_TOKEN", hide_env_values = true)]
    secure_token: String,

    /// Requests allowed per source within the rate window
    #[arg(long, default_value_t = 100, env = "SCRIPTGATE_RATE_LIMIT")]
    rate_limit: usize,

    /// Rate window length in seconds
    #[arg(long, default_value_t = 900, env = "SCRIPTGATE_RATE_WINDOW_SECS")]
    rate_window_secs: u64,

    /// Default sandbox deadline in milliseconds
    #[arg(long, default_value_t = 1_000, env = "SCRIPTGATE_DEFAULT_TIMEOUT_MS")]
    default_timeout_ms: u64,

    /// Return sandbox diagnostic traces to callers (operator debug flag)
    #[arg(long, env = "SCRIPTGATE_EXPOSE_TRACES")]
    expose_traces: bool,

    /// Offer the fetch capability to sandboxed scripts
    #[arg(long, env = "SCRIPTGATE_ENABLE_FETCH")]
    enable_fetch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = GatewayConfig::new(cli.secure_token).with_rate_limit(
        Duration::from_secs(cli.rate_window_secs),
        cli.rate_limit,
    );
    config.bind = cli.bind;
    if let Some(port) = cli.port {
        config.bind.set_port(port);
    }
    config.default_timeout_ms = cli.default_timeout_ms;
    config.expose_traces = cli.expose_traces;
    config.enable_fetch = cli.enable_fetch;

    scriptgate_gateway::serve(AppState::new(config)).await
}
