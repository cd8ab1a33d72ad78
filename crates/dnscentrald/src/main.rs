// # dnscentrald - DNS Central Dashboard
//
// Thin integration layer: reads configuration, installs logging, builds
// the HTTP transport and serves the dashboard. All DNS logic lives in
// dnscentral-core and dnscentral-netcup.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider account (required)
// - `NETCUP_CUSTOMER_ID`: Customer number
// - `NETCUP_API_KEY`: API key
// - `NETCUP_API_PASSWORD`: API password
//
// ### Dashboard
// - `NETCUP_DOMAINS`: Comma-separated allowlist of domains to show (default: all)
// - `SERVERS`: JSON map of IP to server name or `{"name", "id"}` (default: `{}`)
// - `NETCUP_API_URL`: Endpoint override
// - `DNSCENTRAL_BIND`: Listen address (default: 127.0.0.1:5000)
// - `DNSCENTRAL_HTTP_TIMEOUT_SECS`: Per-call timeout, 1-300 (default: 30)
// - `DNSCENTRAL_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export NETCUP_CUSTOMER_ID=12345
// export NETCUP_API_KEY=your_key
// export NETCUP_API_PASSWORD=your_password
// export SERVERS='{"1.2.3.4": {"name": "web1", "id": "s1"}}'
//
// dnscentrald
// ```

mod api;

use anyhow::Result;
use dnscentral_core::{DashboardConfig, DomainFilter, NetcupCredentials, ServerDirectory};
use dnscentral_netcup::HttpTransport;
use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DashboardExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DashboardExitCode> for ExitCode {
    fn from(code: DashboardExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    dashboard: DashboardConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through `var`, which looks up one variable
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            var(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                anyhow::anyhow!("{} is required. Set it via: export {}=...", key, key)
            })
        };

        let credentials = NetcupCredentials::new(
            required("NETCUP_CUSTOMER_ID")?,
            required("NETCUP_API_KEY")?,
            required("NETCUP_API_PASSWORD")?,
        );

        let mut dashboard = DashboardConfig::new(credentials);
        dashboard.servers = ServerDirectory::from_json(&var("SERVERS").unwrap_or_default())?;
        dashboard.domain_filter = DomainFilter::parse(&var("NETCUP_DOMAINS").unwrap_or_default());

        if let Some(endpoint) = var("NETCUP_API_URL").filter(|v| !v.is_empty()) {
            dashboard.endpoint = endpoint;
        }
        if let Some(bind_addr) = var("DNSCENTRAL_BIND") {
            dashboard.bind_addr = bind_addr;
        }
        if let Some(raw) = var("DNSCENTRAL_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "DNSCENTRAL_HTTP_TIMEOUT_SECS must be a number of seconds. Got: {}",
                    raw
                )
            })?;
            dashboard.request_timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            dashboard,
            log_level: var("DNSCENTRAL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.dashboard.validate()?;

        if self.dashboard.bind_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "DNSCENTRAL_BIND '{}' is not a valid socket address. \
                Example: 127.0.0.1:5000",
                self.dashboard.bind_addr
            );
        }

        let timeout = self.dashboard.request_timeout.as_secs();
        if !(1..=300).contains(&timeout) {
            anyhow::bail!(
                "DNSCENTRAL_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        if self.log_level().is_none() {
            anyhow::bail!(
                "DNSCENTRAL_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn log_level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DashboardExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DashboardExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level().unwrap_or(Level::INFO))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DashboardExitCode::ConfigError.into();
    }

    info!("Starting dnscentrald");
    info!(
        "Configuration loaded: {} server(s), domain filter {}",
        config.dashboard.servers.len(),
        if config.dashboard.domain_filter.is_empty() {
            "off"
        } else {
            "on"
        }
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DashboardExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_dashboard(config.dashboard).await {
            error!("Dashboard error: {}", e);
            DashboardExitCode::RuntimeError
        } else {
            DashboardExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Serve the dashboard until a shutdown signal arrives
async fn run_dashboard(config: DashboardConfig) -> Result<()> {
    let transport = HttpTransport::new(config.endpoint.as_str(), config.request_timeout)?;
    info!("Using CCP endpoint {}", transport.endpoint());

    let factory = api::ClientFactory::new(config.credentials, Arc::new(transport));
    let state = api::AppState::new(factory, config.servers, config.domain_filter);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.bind_addr, e))?;
    info!("Dashboard listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown signal error: {}", e),
            }
        })
        .await?;

    info!("Dashboard stopped");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
