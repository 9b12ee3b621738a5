//! Request handlers

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use super::upload::{store_upload, UploadForm};
use super::AppState;
use crate::error::{CatalogError, Result};

/// Content type for every image response
pub const IMAGE_CONTENT_TYPE: &str = "image/*";

pub(super) async fn list_catalog(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let title = state.config.title().await;
    state.pages().build_listing(&title).await.map(Html)
}

pub(super) async fn upload_entry(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Html<String>> {
    let multipart = multipart.map_err(|e| CatalogError::Upload(e.body_text()))?;
    let form = UploadForm::from_multipart(multipart).await?;
    store_upload(&state.catalog, &state.images, form).await?;

    list_catalog(State(state)).await
}

pub(super) async fn tree_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let title = state.config.title().await;
    state.pages().build_detail(&title, &id).map(Html)
}

pub(super) async fn serve_stylesheet(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        state.stylesheet.clone(),
    )
}

/// Anything no other route claims is taken to be an image filename.
pub(super) async fn serve_image(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let filename = uri.path().trim_start_matches('/');
    match state.images.read(filename).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => e.into_response(),
    }
}
