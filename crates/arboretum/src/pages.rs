//! Listing and detail pages

use serde::Serialize;
use tracing::debug;

use crate::catalog::{entry_id, CatalogStore};
use crate::error::Result;
use crate::images::ImageStore;
use crate::template::TemplateStore;

/// Template rendered for the catalog listing
pub const CATALOG_TEMPLATE: &str = "catalog.html";

/// Template rendered for a single entry
pub const DETAIL_TEMPLATE: &str = "treeData.html";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingContext {
    title: String,
    image_tags: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailContext {
    title: String,
    image_tag: String,
    name: String,
    description: String,
}

/// Builds HTML pages from the stores.
#[derive(Debug, Clone, Copy)]
pub struct CatalogPages<'a> {
    templates: &'a TemplateStore,
    images: &'a ImageStore,
    catalog: &'a CatalogStore,
}

impl<'a> CatalogPages<'a> {
    /// Borrow the stores a page needs.
    pub fn new(
        templates: &'a TemplateStore,
        images: &'a ImageStore,
        catalog: &'a CatalogStore,
    ) -> Self {
        Self {
            templates,
            images,
            catalog,
        }
    }

    /// The catalog listing: one linked thumbnail per image file.
    pub async fn build_listing(&self, title: &str) -> Result<String> {
        let filenames = self.images.list().await?;
        debug!(count = filenames.len(), "building listing");

        let context = ListingContext {
            title: escape_html(title),
            image_tags: filenames.iter().map(|f| thumbnail_tag(f)).collect(),
        };
        Ok(self.templates.render(CATALOG_TEMPLATE, &context)?)
    }

    /// The detail page for one catalog entry.
    pub fn build_detail(&self, title: &str, id: &str) -> Result<String> {
        let entry = self.catalog.get(id)?;

        let context = DetailContext {
            title: escape_html(title),
            image_tag: image_tag(&entry.image_path),
            name: escape_html(&entry.name),
            description: escape_html(&entry.description),
        };
        Ok(self.templates.render(DETAIL_TEMPLATE, &context)?)
    }
}

/// `<a href="tree/{id}"><img src="{filename}" alt="{filename}"/></a>`
pub fn thumbnail_tag(filename: &str) -> String {
    format!(
        r#"<a href="tree/{}"><img src="{}" alt="{}"/></a>"#,
        urlencoding::encode(entry_id(filename)),
        urlencoding::encode(filename),
        escape_html(filename)
    )
}

/// The full-size image on a detail page.
///
/// The filename part of `image_path` is percent-encoded the same way
/// thumbnail links are, so names with `#` or `?` still reach the image.
pub fn image_tag(image_path: &str) -> String {
    let (root, filename) = match image_path.strip_prefix('/') {
        Some(rest) => ("/", rest),
        None => ("", image_path),
    };
    format!(
        r#"<img src="{}{}" alt="Example of tree"/>"#,
        root,
        urlencoding::encode(filename)
    )
}

/// Escape text for use inside HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
