mod support;

use std::fs;

use arboretum::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use support::Site;

// ═══════════════════════════════════════════════════════════════════════
// Template Store
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_template_load_dir_keys_by_filename() {
    let site = Site::new();
    let store = TemplateStore::load_dir(&site.layout.templates).unwrap();

    let mut names = store.names();
    names.sort();
    assert_eq!(names, vec!["catalog.html", "treeData.html"]);
    assert_eq!(store.get("catalog.html").unwrap().source, support::CATALOG_TEMPLATE);
}

#[test]
fn test_template_load_dir_skips_subdirectories() {
    let site = Site::new();
    fs::create_dir(site.layout.templates.join("partials")).unwrap();

    let store = TemplateStore::load_dir(&site.layout.templates).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_template_load_dir_missing_directory() {
    let site = Site::new();
    let err = TemplateStore::load_dir(site.root().join("nope")).unwrap_err();
    assert!(matches!(err, TemplateError::Io { .. }));
}

#[test]
fn test_template_load_dir_rejects_bad_expression() {
    let site = Site::new();
    fs::write(
        site.layout.templates.join("broken.html"),
        "<p><%- context.name + %></p>",
    )
    .unwrap();

    match TemplateStore::load_dir(&site.layout.templates).unwrap_err() {
        TemplateError::Syntax { template, .. } => assert_eq!(template, "broken.html"),
        other => panic!("Expected Syntax error, got {:?}", other),
    }
}

#[test]
fn test_template_load_dir_rejects_method_call() {
    let site = Site::new();
    fs::write(
        site.layout.templates.join("shout.html"),
        "<h1><%- context.name.to_uppercase() %></h1>",
    )
    .unwrap();

    match TemplateStore::load_dir(&site.layout.templates).unwrap_err() {
        TemplateError::Eval { template, source, .. } => {
            assert_eq!(template, "shout.html");
            assert!(matches!(source, EvalError::UnsupportedExpr { .. }));
        }
        other => panic!("Expected Eval error, got {:?}", other),
    }
}

#[test]
fn test_render_catalog_template() {
    let site = Site::new();
    let store = TemplateStore::load_dir(&site.layout.templates).unwrap();

    let html = store
        .render(
            "catalog.html",
            &json!({"title": "Trees", "imageTags": "<a href=\"tree/oak\"></a>"}),
        )
        .unwrap();
    assert_eq!(
        html,
        "<html><title>Trees</title><body><a href=\"tree/oak\"></a></body></html>"
    );
}

#[test]
fn test_render_with_missing_context_field_fails() {
    let site = Site::new();
    let store = TemplateStore::load_dir(&site.layout.templates).unwrap();

    let err = store
        .render("catalog.html", &json!({"title": "Trees"}))
        .unwrap_err();
    match err {
        TemplateError::Eval { expr, source, .. } => {
            assert_eq!(expr, "context.imageTags");
            assert!(matches!(source, EvalError::UndefinedField { .. }));
        }
        other => panic!("Expected Eval error, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog Store
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_catalog_load_dir() {
    let site = Site::new();
    site.add_entry("oak", "/oak.jpg", "Oak", "A large oak tree");
    site.add_entry("elm", "/elm.png", "Elm", "Tall and vase-shaped");
    fs::write(site.layout.data.join("README.txt"), "not an entry").unwrap();

    let store = CatalogStore::load_dir(&site.layout.data).unwrap();
    assert_eq!(store.ids(), vec!["elm".to_string(), "oak".to_string()]);
    assert_eq!(
        store.get("oak").unwrap(),
        CatalogEntry {
            image_path: "/oak.jpg".to_string(),
            name: "Oak".to_string(),
            description: "A large oak tree".to_string(),
        }
    );
}

#[test]
fn test_catalog_load_dir_malformed_json_is_fatal() {
    let site = Site::new();
    fs::write(site.layout.data.join("bad.json"), "{ not json").unwrap();

    match CatalogStore::load_dir(&site.layout.data).unwrap_err() {
        CatalogError::Json { path, .. } => assert!(path.ends_with("bad.json")),
        other => panic!("Expected Json error, got {:?}", other),
    }
}

#[test]
fn test_catalog_load_dir_missing_field_is_fatal() {
    let site = Site::new();
    fs::write(
        site.layout.data.join("pine.json"),
        r#"{"imagePath": "/pine.jpg", "name": "Pine"}"#,
    )
    .unwrap();

    assert!(matches!(
        CatalogStore::load_dir(&site.layout.data),
        Err(CatalogError::Json { .. })
    ));
}

#[tokio::test]
async fn test_catalog_put_then_get_round_trips() {
    let site = Site::new();
    let store = CatalogStore::load_dir(&site.layout.data).unwrap();
    let entry = CatalogEntry::for_upload("birch.jpg", "Birch", "White bark, \"papery\" & thin");

    let previous = store.put("birch", entry.clone()).await.unwrap();
    assert_eq!(previous, None);
    assert_eq!(store.get("birch").unwrap(), entry);

    // The file on disk holds the same record
    let reloaded = CatalogStore::load_dir(&site.layout.data).unwrap();
    assert_eq!(reloaded.get("birch").unwrap(), entry);
}

#[tokio::test]
async fn test_catalog_put_overwrites_and_returns_previous() {
    let site = Site::new();
    site.add_entry("oak", "/oak.jpg", "Oak", "old");
    let store = CatalogStore::load_dir(&site.layout.data).unwrap();

    let replacement = CatalogEntry::for_upload("oak.jpg", "Oak", "new");
    let previous = store.put("oak", replacement.clone()).await.unwrap();

    assert_eq!(previous.unwrap().description, "old");
    assert_eq!(store.get("oak").unwrap(), replacement);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_catalog_put_failure_leaves_index_untouched() {
    let site = Site::new();
    let store = CatalogStore::new(site.root().join("missing-dir"));

    let result = store
        .put("oak", CatalogEntry::for_upload("oak.jpg", "Oak", "d"))
        .await;

    assert!(matches!(result, Err(CatalogError::Io { .. })));
    assert!(!store.contains("oak"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_catalog_restore_removes_new_entry() {
    let site = Site::new();
    let store = CatalogStore::load_dir(&site.layout.data).unwrap();
    store
        .put("ash", CatalogEntry::for_upload("ash.jpg", "Ash", "d"))
        .await
        .unwrap();

    store.restore("ash", None).await.unwrap();

    assert!(store.get("ash").unwrap_err().is_not_found());
    assert!(!site.layout.data.join("ash.json").exists());
}

#[tokio::test]
async fn test_catalog_restore_rewrites_previous_entry() {
    let site = Site::new();
    site.add_entry("oak", "/oak.jpg", "Oak", "original");
    let store = CatalogStore::load_dir(&site.layout.data).unwrap();

    let previous = store
        .put("oak", CatalogEntry::for_upload("oak.jpg", "Oak", "changed"))
        .await
        .unwrap();
    store.restore("oak", previous).await.unwrap();

    assert_eq!(store.get("oak").unwrap().description, "original");
    let reloaded = CatalogStore::load_dir(&site.layout.data).unwrap();
    assert_eq!(reloaded.get("oak").unwrap().description, "original");
}

// ═══════════════════════════════════════════════════════════════════════
// Image Store
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_image_list_returns_files_only() {
    let site = Site::new();
    site.add_image("oak.jpg", b"o");
    site.add_image("elm.png", b"e");
    fs::create_dir(site.layout.images.join("thumbs")).unwrap();

    let store = ImageStore::new(&site.layout.images);
    let mut names = store.list().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["elm.png".to_string(), "oak.jpg".to_string()]);
}

#[tokio::test]
async fn test_image_read_decodes_filename() {
    let site = Site::new();
    site.add_image("white birch.jpg", b"\x89birch");

    let store = ImageStore::new(&site.layout.images);
    assert_eq!(
        store.read("white%20birch.jpg").await.unwrap(),
        b"\x89birch".to_vec()
    );
}

#[tokio::test]
async fn test_image_read_missing_is_not_found() {
    let site = Site::new();
    let store = ImageStore::new(&site.layout.images);

    let err = store.read("nonexistent.png").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_image_write_then_read() {
    let site = Site::new();
    let store = ImageStore::new(&site.layout.images);

    store.write("cedar.jpg", b"cedar-bytes").await.unwrap();
    assert_eq!(store.read("cedar.jpg").await.unwrap(), b"cedar-bytes".to_vec());
}

#[tokio::test]
async fn test_image_write_rejects_paths() {
    let site = Site::new();
    let store = ImageStore::new(&site.layout.images);

    let err = store.write("../escape.jpg", b"x").await.unwrap_err();
    assert!(matches!(err, CatalogError::Upload(_)));
    assert!(!site.root().join("public/escape.jpg").exists());
}

// ═══════════════════════════════════════════════════════════════════════
// Config Store
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_config_load_malformed_is_fatal() {
    let site = Site::new();
    fs::write(&site.layout.config, "title = 'toml?'").unwrap();

    assert!(matches!(
        ConfigStore::load(&site.layout.config),
        Err(CatalogError::Json { .. })
    ));
}

#[tokio::test]
async fn test_config_snapshot() {
    let site = Site::new();
    let store = ConfigStore::load(&site.layout.config).unwrap();
    assert_eq!(store.snapshot().await.title, "Tree Catalog");
}
