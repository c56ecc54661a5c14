//! # Sheets Proxy Client Tests

use httpmock::{Method, MockServer};
use serde_json::json;
use sitelog::{ErrorKind, SiteRecord, UpsertOutcome};
use sitelog_sheets::{Reconciler, SheetStore, SheetsProxyClient};

#[tokio::test]
async fn test_read_stringifies_cells() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/api/sheets")
                .query_param("action", "read")
                .query_param("range", "Sites");
            then.status(200).json_body(json!({
                "range": "Sites!A1:C2",
                "majorDimension": "ROWS",
                "values": [["Address", "Builder", "Units"], ["1 A St", "Acme", 12]]
            }));
        })
        .await;
    let client = SheetsProxyClient::new(server.url("/api/sheets")).unwrap();

    let grid = client.read("Sites").await.unwrap();

    mock.assert_async().await;
    assert_eq!(grid[1], vec!["1 A St", "Acme", "12"]);
}

#[tokio::test]
async fn test_empty_sheet_reads_as_no_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/api/sheets");
            then.status(200).json_body(json!({"range": "Sites!A1:Z1000"}));
        })
        .await;
    let client = SheetsProxyClient::new(server.url("/api/sheets")).unwrap();

    assert!(client.read("Sites").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_through_proxy_updates_matched_row() {
    // --- 1. Arrange ---
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/api/sheets")
                .query_param("action", "read");
            then.status(200).json_body(json!({
                "values": [
                    ["Address", "Builder", "Website"],
                    ["123 Main St", "Acme", "acme.com"]
                ]
            }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/api/sheets")
                .query_param("action", "update")
                .query_param("updateRange", "Sites!A2:C2")
                .json_body(json!({"values": [["123 Main St", "Acme", "https://acme.example"]]}));
            then.status(200).json_body(json!({"updatedRows": 1}));
        })
        .await;
    let client = SheetsProxyClient::new(server.url("/api/sheets")).unwrap();
    let reconciler = Reconciler::new(Box::new(client), "Sites");
    let record = SiteRecord {
        address: "123 main st".to_string(),
        company_name: String::new(),
        contact_name: String::new(),
        email: String::new(),
        website: "https://acme.example".to_string(),
        phone: String::new(),
        extracted_text: String::new(),
        picture_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        picture_taken: true,
    };

    // --- 2. Act ---
    let outcome = reconciler.upsert(&record).await.unwrap();

    // --- 3. Assert ---
    update.assert_async().await;
    assert_eq!(outcome, UpsertOutcome::Updated { row: 2 });
}

#[tokio::test]
async fn test_append_uses_dynamic_range() {
    let server = MockServer::start_async().await;
    let append = server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/api/sheets")
                .query_param("action", "append")
                .query_param("range", "Sites!A:B");
            then.status(200).json_body(json!({"updates": {"updatedRows": 1}}));
        })
        .await;
    let client = SheetsProxyClient::new(server.url("/api/sheets")).unwrap();

    client
        .append("Sites!A:B", vec!["1 A St".to_string(), "Acme".to_string()])
        .await
        .unwrap();

    append.assert_async().await;
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/forbidden");
            then.status(403)
                .json_body(json!({"error": {"message": "The caller does not have permission"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/missing");
            then.status(404).json_body(json!({"error": {"message": "Requested entity was not found."}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/bad");
            then.status(400).json_body(json!({"error": {"message": "Unable to parse range"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/down");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let read = |path: &str| {
        let client = SheetsProxyClient::new(server.url(path)).unwrap();
        async move { client.read("Sites").await.unwrap_err() }
    };

    assert_eq!(read("/forbidden").await.kind(), ErrorKind::Auth);
    assert_eq!(read("/missing").await.kind(), ErrorKind::NotFound);
    assert_eq!(read("/bad").await.kind(), ErrorKind::Configuration);
    let down = read("/down").await;
    assert_eq!(down.kind(), ErrorKind::Network);
    assert_eq!(down.to_string(), "Google Sheets API: HTTP 503: HTTP 503 Service Unavailable");
}
