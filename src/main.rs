use anyhow::Context;
use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Duration;

use marina_gateway::clock::SystemClock;
use marina_gateway::config::Args;
use marina_gateway::rate_limit::{MAX_REQUESTS, RateLimiter, WINDOW_SECS, run_pruner};
use marina_gateway::state::AppState;
use marina_gateway::store::{ContactStore, InMemoryContactStore, PostgrestContactStore};
use marina_gateway::{router, telemetry};

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    telemetry::init(args.log_format)?;

    let store = build_store(&args)?;
    let rate_limiter = Arc::new(RateLimiter::new(Arc::new(SystemClock)));

    // spawn the background pruner
    if args.prune_interval > 0 {
        tokio::spawn(run_pruner(
            Arc::clone(&rate_limiter),
            Duration::from_secs(args.prune_interval),
        ));
    }

    let app = router(AppState::new(store, rate_limiter));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "gateway listening");
    tracing::info!(
        max_requests = MAX_REQUESTS,
        window_secs = WINDOW_SECS,
        "contact info rate limit"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("gateway stopped");
    Ok(())
}

fn build_store(args: &Args) -> anyhow::Result<Arc<dyn ContactStore>> {
    if args.in_memory {
        tracing::warn!("serving from an empty in-memory contact table");
        return Ok(Arc::new(InMemoryContactStore::new()));
    }

    let url = args
        .supabase_url
        .as_deref()
        .context("SUPABASE_URL is required without --in-memory")?;
    let key = args
        .service_role_key
        .clone()
        .context("SUPABASE_SERVICE_ROLE_KEY is required without --in-memory")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.store_timeout))
        .build()
        .context("failed to build http client")?;

    let store = PostgrestContactStore::new(client, url, args.contact_table.clone(), key);
    tracing::info!(table = %store.table_url(), "reading contact info from backend");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
