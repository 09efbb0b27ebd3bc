use anyhow::Context;
use clap::Parser;
use drug_lookup_service::DrugStore;
use mediscan_server::{create_app, AppState};
use narration_service::{NarrationConfig, Narrator};
use scan_service::{create_provider, ScanConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MediScan Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "mediscan-server")]
#[command(about = "Medicine scanner API - drug resolution and narration pipeline")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0", env = "MEDISCAN_HOST")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080", env = "MEDISCAN_PORT")]
    port: u16,

    /// Drug catalog CSV path
    #[arg(
        long,
        default_value = "data/drug_database.csv",
        env = "MEDISCAN_CATALOG"
    )]
    catalog: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting MediScan Engine server");

    let store = Arc::new(
        DrugStore::load_csv(&args.catalog)
            .with_context(|| format!("loading drug catalog from {}", args.catalog))?,
    );

    let narration_config = NarrationConfig::from_env();
    let narrator = Arc::new(
        Narrator::from_config(narration_config).context("building narration engine")?,
    );

    let scan_config = ScanConfig::from_env();
    let recognizer =
        create_provider(&scan_config.provider).context("building OCR provider")?;

    let state = AppState::new(store, narrator, recognizer, scan_config);
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!(%addr, "MediScan Engine server listening");
    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("mediscan_server={default_level},drug_lookup_service={default_level},narration_service={default_level},scan_service={default_level},tower_http=info")
            .into()
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
