use std::sync::Arc;

use anyhow::Context;
use book_catalog::server::{self, ServerConfig};
use book_catalog::store::Recovery;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,book_catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = config.store();
    match store.recover().context("recovering catalog")? {
        Recovery::Clean => {}
        Recovery::Promoted => {
            warn!(path = %store.path().display(), "catalog restored from an interrupted rewrite")
        }
        Recovery::DiscardedStale => {
            info!(side = %store.side_path().display(), "discarded leftover side file")
        }
    }
    if let Some(dir) = &config.backup_dir {
        info!(
            dir = %dir.display(),
            retain = config.backup_retain,
            lenient = config.lenient_backups,
            "backups enabled"
        );
    }

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    info!(
        addr = %config.listen,
        data_file = %config.data_file.display(),
        "catalog server listening"
    );

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    server::serve_until(listener, Arc::new(store), shutdown).await?;
    Ok(())
}
