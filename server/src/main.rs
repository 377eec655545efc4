use anyhow::Result;
use catalog::mongo::MongoStore;
use catalog::seed;
use clap::Parser;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// MongoDB connection string
    #[arg(long, default_value = "mongodb://localhost:27017")]
    mongo_uri: String,
    /// Database holding the course collection
    #[arg(long, default_value = "course_database")]
    database: String,
    /// Course dataset seeded into the store before serving
    #[arg(long, default_value = "./data/courses.json")]
    dataset: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    // Dataset and store problems abort here; no endpoint becomes reachable.
    let records = seed::load_dataset(&args.dataset)?;
    let store = Arc::new(MongoStore::connect(&args.mongo_uri, &args.database).await?);
    let seeded = seed::seed(store.as_ref(), &records).await?;
    tracing::info!(seeded, database = %args.database, "database seeded");

    let app = build_app(store);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "catalog server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
