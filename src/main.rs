use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use salary_loan_calc::api::{create_router, AppState};
use salary_loan_calc::CalculatorConfig;

/// salary advance and loan calculation service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// address to bind
    #[arg(long, env = "SLC_HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,

    #[arg(long, env = "SLC_PORT", default_value_t = 8000)]
    port: u16,

    /// JSON file with product terms; standard terms when omitted
    #[arg(long, env = "SLC_CONFIG")]
    config: Option<PathBuf>,

    /// emit logs as JSON lines
    #[arg(long, env = "SLC_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = match &args.config {
        Some(path) => CalculatorConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    info!(
        currencies = config.advance.thresholds.len(),
        fee_rate = %config.advance.fee_rate,
        max_term_months = config.loan.max_term_months,
        "calculator configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let addr = SocketAddr::new(args.host, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
