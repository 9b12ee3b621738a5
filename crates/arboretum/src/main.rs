#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::{bail, Context};
use arboretum::config::check_stylesheet_route;
use arboretum::{build_router, AppState, CatalogStore, ConfigStore, ImageStore, ServerArgs, TemplateStore};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Load every store from the site directory. Any failure here stops the
/// process before it binds a socket.
fn load_state(args: &ServerArgs) -> anyhow::Result<AppState> {
    if let Err(reason) = check_stylesheet_route(&args.stylesheet_route) {
        bail!("invalid stylesheet route {:?}: {}", args.stylesheet_route, reason);
    }

    let layout = args.layout();
    let config = ConfigStore::load(&layout.config)
        .with_context(|| format!("loading {}", layout.config.display()))?;
    let stylesheet = std::fs::read(&layout.stylesheet)
        .with_context(|| format!("reading {}", layout.stylesheet.display()))?;
    let templates = TemplateStore::load_dir(&layout.templates)
        .with_context(|| format!("loading templates from {}", layout.templates.display()))?;
    let catalog = CatalogStore::load_dir(&layout.data)
        .with_context(|| format!("loading catalog from {}", layout.data.display()))?;
    let images = ImageStore::new(&layout.images);

    info!(
        templates = templates.len(),
        entries = catalog.len(),
        root = %args.root.display(),
        "site loaded"
    );

    let mut state = AppState::new(templates, catalog, images, config, stylesheet);
    state.stylesheet_route = args.stylesheet_route.clone();
    state.max_upload_bytes = args.max_upload_bytes;
    state.title_from_query = !args.no_title_query;
    Ok(state)
}

async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.log_json);

    let state = Arc::new(load_state(&args)?);
    let app = build_router(state);

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}
