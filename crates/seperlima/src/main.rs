//! Seperlima: library activity dashboard.
//!
//! Reads loans, members and books from the library's SQLite database and
//! serves the dashboard over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seperlima_data::{CachePolicy, DataProvider, SqliteSource};

const DEFAULT_LOG_FILTER: &str = "seperlima=info,seperlima_web=info,seperlima_data=info";

/// Seperlima library dashboard.
#[derive(Debug, Parser)]
#[command(name = "seperlima")]
#[command(about = "Library activity dashboard", long_about = None)]
struct Args {
    /// SQLite database path.
    #[arg(long, env = "SEPERLIMA_DB", default_value = "seperlima.db")]
    db: PathBuf,

    /// HTTP listen address.
    #[arg(long, env = "SEPERLIMA_LISTEN", default_value = "127.0.0.1:8501")]
    listen: String,

    /// Seconds a loaded table is served from cache. 0 keeps tables until
    /// `POST /admin/cache/invalidate`.
    #[arg(long, env = "SEPERLIMA_CACHE_TTL", default_value = "0")]
    cache_ttl: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if !args.db.exists() {
        warn!(db = %args.db.display(), "database file not found; pages will fail until it exists");
    }

    let policy = CachePolicy::from_ttl_secs(args.cache_ttl);
    let provider = Arc::new(DataProvider::new(SqliteSource::new(args.db.clone()), policy));
    let router = seperlima_web::create_router(provider);

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to bind {}", args.listen))?;

    info!(
        listen = %args.listen,
        db = %args.db.display(),
        cache = ?policy,
        "seperlima started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    info!("seperlima stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["seperlima"]).unwrap();
        assert_eq!(args.db, PathBuf::from("seperlima.db"));
        assert_eq!(args.listen, "127.0.0.1:8501");
        assert_eq!(CachePolicy::from_ttl_secs(args.cache_ttl), CachePolicy::Manual);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "seperlima",
            "--db",
            "/srv/library.db",
            "--listen",
            "0.0.0.0:9000",
            "--cache-ttl",
            "300",
        ])
        .unwrap();
        assert_eq!(args.db, PathBuf::from("/srv/library.db"));
        assert_eq!(args.listen, "0.0.0.0:9000");
        assert_eq!(args.cache_ttl, 300);
    }
}
