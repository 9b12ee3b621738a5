//! # Arboretum
//!
//! A small web server for a catalog of tree images.
//!
//! Each tree is a JSON entry on disk plus an image file. The server lists
//! the images, shows a detail page per entry, and accepts new entries as
//! multipart uploads. Pages come from HTML templates whose `<%- expr %>`
//! markers are filled from a server-built context.
//!
//! ## Architecture
//!
//! - **Template Store**: templates loaded at startup, rendered with a
//!   whitelist-only expression evaluator (`eval`)
//! - **Catalog Store**: `<id>.json` entries mirrored in a concurrent map
//! - **Image Store**: the images directory
//! - **Config Store**: `config.json`, rewritten when the title changes
//! - **Pages**: listing and detail pages built from the stores
//! - **Server**: axum routes over all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod environment;
pub mod error;
pub mod eval;
pub mod images;
pub mod pages;
pub mod server;
pub mod template;
pub mod value;

// Re-export main types
pub use catalog::{entry_id, CatalogEntry, CatalogStore};
pub use config::{ConfigStore, ServerArgs, SiteConfig, SiteLayout};
pub use environment::{Binding, Environment};
pub use error::{CatalogError, EvalError, Result, TemplateError};
pub use eval::{check_supported, eval_expr, parse_expr, Evaluate};
pub use images::ImageStore;
pub use pages::CatalogPages;
pub use server::{build_router, AppState};
pub use template::{Template, TemplateNode, TemplateStore};
pub use value::Value;

/// Arboretum version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
