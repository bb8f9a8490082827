use clap::Parser;
use photo_cluster::config::Cli;
use photo_cluster::context::CoreContext;
use photo_cluster::membership::liveness::LivenessMonitor;
use photo_cluster::router::build_router;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = tracing::Level::from_str(&cli.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // 1. Configuration:
    let config = cli.into_config()?;
    tracing::info!("Registry snapshot: {}", config.registry_path.display());

    // 2. Registry, store, dispatcher:
    let ctx = CoreContext::open(config).await?;
    tracing::info!(
        "Document store at {}: {} photo(s), {} album(s); {} worker node(s) known",
        ctx.store.root().display(),
        ctx.store.photo_count().await,
        ctx.store.album_count().await,
        ctx.registry.len()
    );

    // 3. Liveness monitor:
    let probe_timeout = ctx.config.request_timeout().min(Duration::from_secs(5));
    let monitor = LivenessMonitor::new(
        Arc::clone(&ctx.registry),
        ctx.config.liveness_interval(),
        probe_timeout,
    );
    monitor.start();

    // 4. HTTP server:
    let bind = ctx.config.bind.clone();
    let app = build_router(ctx);

    tracing::info!("HTTP server listening on {}", bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
