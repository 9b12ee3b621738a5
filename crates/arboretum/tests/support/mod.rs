#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arboretum::*;
use tempfile::TempDir;

pub const CATALOG_TEMPLATE: &str =
    "<html><title><%- context.title %></title><body><%- context.imageTags %></body></html>";

pub const DETAIL_TEMPLATE: &str = "<html><title><%- context.name + \" | \" + context.title %></title>\
<body><h1><%- context.name %></h1><%- context.imageTag %><p><%- context.description %></p></body></html>";

pub const STYLESHEET: &[u8] = b"body { color: #2f3a2f; }\n/* \xe2\x9c\x93 */\n";

/// A site directory laid out the way the server expects.
pub struct Site {
    pub dir: TempDir,
    pub layout: SiteLayout,
}

impl Site {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = SiteLayout::new(dir.path());

        fs::create_dir_all(&layout.templates).unwrap();
        fs::create_dir_all(&layout.data).unwrap();
        fs::create_dir_all(&layout.images).unwrap();
        fs::write(&layout.config, r#"{"title":"Tree Catalog"}"#).unwrap();
        fs::write(&layout.stylesheet, STYLESHEET).unwrap();
        fs::write(layout.templates.join("catalog.html"), CATALOG_TEMPLATE).unwrap();
        fs::write(layout.templates.join("treeData.html"), DETAIL_TEMPLATE).unwrap();

        Self { dir, layout }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_image(&self, filename: &str, bytes: &[u8]) {
        fs::write(self.layout.images.join(filename), bytes).unwrap();
    }

    pub fn add_entry(&self, id: &str, image_path: &str, name: &str, description: &str) {
        let entry = CatalogEntry {
            image_path: image_path.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        };
        fs::write(
            self.layout.data.join(format!("{}.json", id)),
            serde_json::to_vec(&entry).unwrap(),
        )
        .unwrap();
    }

    /// Load every store the way the binary does.
    pub fn state(&self) -> AppState {
        AppState::new(
            TemplateStore::load_dir(&self.layout.templates).unwrap(),
            CatalogStore::load_dir(&self.layout.data).unwrap(),
            ImageStore::new(&self.layout.images),
            ConfigStore::load(&self.layout.config).unwrap(),
            fs::read(&self.layout.stylesheet).unwrap(),
        )
    }

    pub fn router(&self) -> axum::Router {
        build_router(Arc::new(self.state()))
    }
}

pub const BOUNDARY: &str = "----arboretum-test-boundary";

/// Hand-built multipart body with an `image` file part and text fields.
pub fn multipart_body(filename: &str, bytes: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
