//! Multipart uploads of new catalog entries

use axum::body::Bytes;
use axum::extract::Multipart;
use tracing::{debug, error, info};

use crate::catalog::{entry_id, CatalogEntry, CatalogStore};
use crate::error::{CatalogError, Result};
use crate::images::{is_plain_filename, ImageStore};

/// The fields of an upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    /// Image filename, reduced to its last path component
    pub filename: String,
    /// Image contents
    pub bytes: Bytes,
    /// Entry display name
    pub name: String,
    /// Entry description
    pub description: String,
}

impl UploadForm {
    /// Collect the `image`, `name` and `description` fields.
    ///
    /// Unknown fields are skipped. A missing field, a file part without a
    /// filename, or a body that is not valid multipart is an `Upload` error.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut image = None;
        let mut name = None;
        let mut description = None;

        while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("image") => {
                    let filename = field
                        .file_name()
                        .map(base_filename)
                        .ok_or_else(|| CatalogError::Upload("image part has no filename".into()))?;
                    let bytes = field.bytes().await.map_err(upload_error)?;
                    image = Some((filename, bytes));
                }
                Some("name") => name = Some(field.text().await.map_err(upload_error)?),
                Some("description") => {
                    description = Some(field.text().await.map_err(upload_error)?)
                }
                other => debug!(field = ?other, "ignoring upload field"),
            }
        }

        let (filename, bytes) = image.ok_or_else(|| missing("image"))?;
        Self::new(
            filename,
            bytes,
            name.ok_or_else(|| missing("name"))?,
            description.ok_or_else(|| missing("description"))?,
        )
    }

    /// Build a form, checking that the filename can name both an image file
    /// and a catalog entry.
    pub fn new(
        filename: impl Into<String>,
        bytes: impl Into<Bytes>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let filename = filename.into();
        if !is_plain_filename(&filename) || entry_id(&filename).is_empty() {
            return Err(CatalogError::Upload(format!(
                "unusable image filename `{}`",
                filename
            )));
        }
        Ok(Self {
            filename,
            bytes: bytes.into(),
            name: name.into(),
            description: description.into(),
        })
    }

    /// Id of the catalog entry this upload creates.
    pub fn entry_id(&self) -> &str {
        entry_id(&self.filename)
    }
}

/// Persist an upload: the catalog entry first, then the image.
///
/// Both writes are attempted. If the entry was written but the image was
/// not, the entry is rolled back so the catalog does not point at a missing
/// file. Returns the entry id.
pub async fn store_upload(
    catalog: &CatalogStore,
    images: &ImageStore,
    form: UploadForm,
) -> Result<String> {
    let id = form.entry_id().to_string();
    let entry = CatalogEntry::for_upload(&form.filename, form.name, form.description);

    let put = catalog.put(&id, entry).await;
    let write = images.write(&form.filename, &form.bytes).await;

    match (put, write) {
        (Ok(_), Ok(())) => {
            info!(id = %id, file = %form.filename, bytes = form.bytes.len(), "stored upload");
            Ok(id)
        }
        (Ok(previous), Err(e)) => {
            error!(id = %id, error = %e, "image write failed after entry write; rolling back entry");
            if let Err(rollback) = catalog.restore(&id, previous).await {
                error!(id = %id, error = %rollback, "rollback failed; entry points at a missing image");
            }
            Err(e)
        }
        (Err(e), Ok(())) => {
            error!(id = %id, error = %e, "entry write failed; image stored without an entry");
            Err(e)
        }
        (Err(e), Err(image_err)) => {
            error!(id = %id, error = %e, image_error = %image_err, "upload failed");
            Err(e)
        }
    }
}

/// Strip any client-side directory from an uploaded filename.
fn base_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_string()
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> CatalogError {
    CatalogError::Upload(e.body_text())
}

fn missing(field: &str) -> CatalogError {
    CatalogError::Upload(format!("missing `{}` field", field))
}
