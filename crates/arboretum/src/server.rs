//! HTTP routing for the catalog
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET | `/`, `/catalog` | listing page |
//! | POST | `/`, `/catalog` | multipart upload, then listing page |
//! | GET | stylesheet route | stylesheet bytes |
//! | GET | `/tree/:id` | detail page |
//! | GET | anything else | image file named by the path |

mod handlers;
mod upload;

pub use upload::{store_upload, UploadForm};

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::catalog::CatalogStore;
use crate::config::{ConfigStore, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::CatalogError;
use crate::images::ImageStore;
use crate::pages::CatalogPages;
use crate::template::TemplateStore;

/// Everything a request handler can reach.
#[derive(Debug)]
pub struct AppState {
    /// Loaded templates
    pub templates: TemplateStore,
    /// Catalog entries
    pub catalog: CatalogStore,
    /// Image directory
    pub images: ImageStore,
    /// Site configuration
    pub config: ConfigStore,
    /// Stylesheet bytes, loaded once
    pub stylesheet: Bytes,
    /// URL path the stylesheet is served under
    pub stylesheet_route: String,
    /// Largest accepted upload body
    pub max_upload_bytes: usize,
    /// Whether `?title=` on any request renames the site
    pub title_from_query: bool,
}

impl AppState {
    /// Assemble state with default routing options.
    pub fn new(
        templates: TemplateStore,
        catalog: CatalogStore,
        images: ImageStore,
        config: ConfigStore,
        stylesheet: impl Into<Bytes>,
    ) -> Self {
        Self {
            templates,
            catalog,
            images,
            config,
            stylesheet: stylesheet.into(),
            stylesheet_route: "/public/catalog.css".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            title_from_query: true,
        }
    }

    /// Page builder over this state's stores.
    pub fn pages(&self) -> CatalogPages<'_> {
        CatalogPages::new(&self.templates, &self.images, &self.catalog)
    }
}

/// Build the application router.
///
/// # Panics
///
/// Panics if `state.stylesheet_route` collides with another route; callers
/// check it with [`crate::config::check_stylesheet_route`] first.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(
            "/",
            get(handlers::list_catalog).post(handlers::upload_entry),
        )
        .route(
            "/catalog",
            get(handlers::list_catalog).post(handlers::upload_entry),
        )
        .route(&state.stylesheet_route, get(handlers::serve_stylesheet))
        .route("/tree/:id", get(handlers::tree_detail))
        .fallback(handlers::serve_image)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    if state.title_from_query {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            apply_title_query,
        ));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Rename the site when a request carries `?title=`.
///
/// A failed config write is logged and the request still goes through.
async fn apply_title_query(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(request.uri()) {
        if let Some(title) = params.get("title").filter(|t| !t.is_empty()) {
            if let Err(e) = state.config.set_title(title.as_str()).await {
                warn!(error = %e, "failed to persist site title");
            }
        }
    }
    next.run(request).await
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            debug!(error = %self, "not found");
            return StatusCode::NOT_FOUND.into_response();
        }

        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
    }
}
