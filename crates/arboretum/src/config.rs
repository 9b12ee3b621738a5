//! Server settings and the persisted site configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{CatalogError, Result};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3433;

/// Default upload body limit (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Command-line and environment settings for the server process.
#[derive(Debug, Clone, Parser)]
#[command(name = "arboretum", version, about = "Serve a catalog of tree images")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "ARBORETUM_BIND", default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))]
    pub bind: SocketAddr,

    /// Site directory holding config.json, templates/ and public/
    #[arg(long, env = "ARBORETUM_ROOT", default_value = "site")]
    pub root: PathBuf,

    /// URL path the stylesheet is served under
    #[arg(long, env = "ARBORETUM_STYLESHEET_ROUTE", default_value = "/public/catalog.css")]
    pub stylesheet_route: String,

    /// Largest accepted upload body, in bytes
    #[arg(long, env = "ARBORETUM_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Emit logs as JSON lines
    #[arg(long, env = "ARBORETUM_LOG_JSON")]
    pub log_json: bool,

    /// Ignore `?title=` on incoming requests
    #[arg(long, env = "ARBORETUM_NO_TITLE_QUERY")]
    pub no_title_query: bool,
}

/// Check that a stylesheet route can sit beside the fixed routes.
///
/// The route must be an absolute literal path that does not collide with
/// `/`, `/catalog` or `/tree/:id`, and must not use `:` or `*` segments.
pub fn check_stylesheet_route(route: &str) -> std::result::Result<(), String> {
    if !route.starts_with('/') {
        return Err("must start with '/'".to_string());
    }
    if route == "/" || route == "/catalog" || route.starts_with("/tree/") {
        return Err("collides with a catalog route".to_string());
    }
    if route.contains([':', '*']) {
        return Err("must not contain ':' or '*'".to_string());
    }
    Ok(())
}

impl ServerArgs {
    /// Resolve the on-disk layout under the site root.
    pub fn layout(&self) -> SiteLayout {
        SiteLayout::new(&self.root)
    }
}

/// Where each piece of site state lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// `config.json`
    pub config: PathBuf,
    /// Template directory
    pub templates: PathBuf,
    /// Catalog entry directory
    pub data: PathBuf,
    /// Image directory
    pub images: PathBuf,
    /// Stylesheet file
    pub stylesheet: PathBuf,
}

impl SiteLayout {
    /// Standard layout rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let public = root.join("public");
        Self {
            config: root.join("config.json"),
            templates: root.join("templates"),
            data: public.join("JSON"),
            images: public.join("images"),
            stylesheet: public.join("catalog.css"),
        }
    }
}

/// The contents of `config.json`.
///
/// Keys other than `title` are kept as-is so a rewrite does not drop them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown on every page
    #[serde(default)]
    pub title: String,

    /// Everything else in the file
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `config.json`, held in memory and written back on change.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<SiteConfig>,
}

impl ConfigStore {
    /// Wrap an already-loaded config.
    pub fn new(path: impl Into<PathBuf>, config: SiteConfig) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
        }
    }

    /// Read and parse the config file. Runs once at startup.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path).map_err(|e| CatalogError::io(&path, e))?;
        let config = serde_json::from_slice(&bytes).map_err(|source| CatalogError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Self::new(path, config))
    }

    /// A copy of the current config.
    pub async fn snapshot(&self) -> SiteConfig {
        self.config.read().await.clone()
    }

    /// The current title.
    pub async fn title(&self) -> String {
        self.config.read().await.title.clone()
    }

    /// Change the title and rewrite the config file.
    ///
    /// The in-memory title changes even if the write fails; the error is
    /// returned so the caller can report it.
    pub async fn set_title(&self, title: impl Into<String>) -> Result<()> {
        // The guard is held across the write so the file always matches the
        // last title set in memory.
        let mut config = self.config.write().await;
        config.title = title.into();
        info!(title = %config.title, "site title changed");

        let json = serde_json::to_vec(&*config).map_err(|source| CatalogError::Json {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| CatalogError::io(&self.path, e))
    }
}
