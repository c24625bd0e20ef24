//! JSON API and media integration tests
//!
//! Covers:
//! - A request session through RequestHandler, checked against the snapshot
//! - Error envelopes for malformed and failing requests
//! - Blob upload feeding an image row, rendered by ImageView
//! - Table size chart over a live store

use docstore::api::{RequestHandler, Response};
use docstore::blob::BlobStore;
use docstore::config::StoreConfig;
use docstore::display::{BarChart, DisplayError, ImageFormat, ImageView, IMAGE_PATH_FIELD};
use docstore::store::{Row, TableStore};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn open(temp: &TempDir, name: &str) -> TableStore {
    TableStore::open_with_config(name, &StoreConfig::with_data_dir(temp.path()))
        .expect("open store")
}

fn ok_data(response: Response) -> Value {
    match response {
        Response::Ok { data } => data,
        Response::Error { code, message } => panic!("{}: {}", code, message),
    }
}

fn error_code(response: Response) -> String {
    match response {
        Response::Error { code, .. } => code,
        Response::Ok { data } => panic!("expected error, got {}", data),
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]);
    data
}

// =============================================================================
// API session
// =============================================================================

/// Mutations made through the API are on disk when the handler returns
#[test]
fn test_api_session_persists() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "api");

    {
        let mut handler = RequestHandler::new(&mut store);
        ok_data(handler.handle(r#"{"op": "create_table", "table": "users"}"#));
        ok_data(handler.handle(
            r#"{"op": "insert", "table": "users", "row": {"id": 2, "name": "Bo", "bio": ""}}"#,
        ));
        ok_data(handler.handle(
            r#"{"op": "insert", "table": "users", "row": {"id": 1, "name": "Ann"}}"#,
        ));

        let updated = ok_data(handler.handle(
            r#"{"op": "update", "table": "users", "filter": {"name": "Ann"}, "set": {"admin": true}}"#,
        ));
        assert_eq!(updated, json!({"updated": 1}));

        ok_data(handler.handle(r#"{"op": "clean_row", "table": "users", "id": 2}"#));

        let sorted = ok_data(handler.handle(r#"{"op": "select", "table": "users", "sort": "id"}"#));
        assert_eq!(
            sorted,
            json!([
                {"id": 1, "name": "Ann", "admin": true},
                {"id": 2, "name": "Bo"}
            ])
        );
    }

    let disk = open(&temp, "api");
    let users = disk.table("users").unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Bo");
    assert!(!users[0].contains_key("bio"));
    assert_eq!(users[1]["admin"], true);
}

/// Failures become error envelopes carrying the store's error code
#[test]
fn test_api_error_envelopes() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "errors");
    let mut handler = RequestHandler::new(&mut store);

    assert_eq!(
        error_code(handler.handle("not json")),
        "DOCSTORE_INVALID_REQUEST"
    );
    assert_eq!(
        error_code(handler.handle(r#"{"op": "drop_everything"}"#)),
        "DOCSTORE_INVALID_REQUEST"
    );
    assert_eq!(
        error_code(handler.handle(r#"{"op": "select", "table": "ghost"}"#)),
        "DOCSTORE_TABLE_NOT_FOUND"
    );

    ok_data(handler.handle(r#"{"op": "create_table", "table": "t"}"#));
    assert_eq!(
        error_code(handler.handle(r#"{"op": "clean_row", "table": "t", "id": "nope"}"#)),
        "DOCSTORE_ROW_NOT_FOUND"
    );
}

/// Replacing a table swaps its contents wholesale
#[test]
fn test_api_replace_table() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "replace");
    let mut handler = RequestHandler::new(&mut store);

    ok_data(handler.handle(r#"{"op": "create_table", "table": "t"}"#));
    ok_data(handler.handle(r#"{"op": "insert", "table": "t", "row": {"id": 1}}"#));

    let replaced = ok_data(handler.handle(
        r#"{"op": "replace_table", "table": "t", "rows": [{"id": 7}, {"id": 8}, {"id": 9}]}"#,
    ));
    assert_eq!(replaced, json!({"rows": 3}));

    let rows = ok_data(handler.handle(r#"{"op": "get_row", "table": "t"}"#));
    assert_eq!(rows, json!([{"id": 7}, {"id": 8}, {"id": 9}]));
}

// =============================================================================
// Blobs and images
// =============================================================================

/// A stored upload referenced from a row can be identified as an image
#[test]
fn test_uploaded_image_shown_from_row() {
    let temp = TempDir::new().unwrap();
    let config = StoreConfig::with_data_dir(temp.path());
    let blobs = BlobStore::open(config.blob_path());

    let receipt = blobs.save("cat.png", &png(320, 200)).unwrap();
    let stored_at = blobs.path_of(&receipt.id);
    assert_eq!(blobs.read(&receipt).unwrap(), png(320, 200));

    let mut store = TableStore::open_with_config("gallery", &config).unwrap();
    store.create_table("pics").unwrap();
    let mut row = Row::new();
    row.insert("id".into(), json!("cat"));
    row.insert(
        IMAGE_PATH_FIELD.into(),
        json!(stored_at.to_string_lossy()),
    );
    store.insert_row("pics", row).unwrap();

    let view = ImageView::for_row(&store, "pics", &json!("cat")).unwrap();
    assert_eq!(view.format, ImageFormat::Png);
    assert_eq!(view.dimensions, Some((320, 200)));
    assert_eq!(view.size, receipt.size);
    assert!(view.render().starts_with("pics/cat: "));
}

/// Rows pointing at missing or non-image files are reported, not shown
#[test]
fn test_image_errors() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "broken_gallery");
    store.create_table("pics").unwrap();

    let text_file = temp.path().join("notes.txt");
    std::fs::write(&text_file, "hello").unwrap();

    let mut with_text = Row::new();
    with_text.insert("id".into(), json!(1));
    with_text.insert(IMAGE_PATH_FIELD.into(), json!(text_file.to_string_lossy()));
    store.insert_row("pics", with_text).unwrap();

    let mut with_missing = Row::new();
    with_missing.insert("id".into(), json!(2));
    with_missing.insert(
        IMAGE_PATH_FIELD.into(),
        json!(temp.path().join("absent.png").to_string_lossy()),
    );
    store.insert_row("pics", with_missing).unwrap();

    for id in [1, 2] {
        let err = ImageView::for_row(&store, "pics", &json!(id)).unwrap_err();
        assert!(matches!(err, DisplayError::ImageUnavailable { .. }), "row {}", id);
    }

    let err = ImageView::for_row(&store, "pics", &json!(3)).unwrap_err();
    assert_eq!(err.code(), "DOCSTORE_ROW_NOT_FOUND");
}

// =============================================================================
// Charts
// =============================================================================

/// The chart reflects current table sizes in table-name order
#[test]
fn test_chart_tracks_store() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "charted");
    store.create_table("b").unwrap();
    store.create_table("a").unwrap();
    for i in 0..4 {
        let mut row = Row::new();
        row.insert("id".into(), json!(i));
        store.insert_row("b", row).unwrap();
    }

    let chart = BarChart::from_store(&store, 8);
    assert_eq!(
        chart.bars(),
        &[("a".to_string(), 0), ("b".to_string(), 4)]
    );

    let rendered = chart.render();
    let b_line = rendered.lines().find(|l| l.starts_with("b ")).unwrap();
    assert_eq!(b_line.matches('█').count(), 8);
}
