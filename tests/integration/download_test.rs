//! Integration tests for downloads, history, and health endpoints.

mod helpers;

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::json;

use doctrack_entity::document::DocumentRef;

use helpers::TestApp;

async fn save(app: &TestApp, name: &str, content: &str, key: &str) {
    let url = app.docs.publish(name, content);
    let response = app
        .track(
            "u1",
            "report.docx",
            json!({
                "status": 2,
                "url": url,
                "filetype": "docx",
                "key": key,
                "changeshistory": "{\"changes\":[{\"user\":{\"id\":\"uid-1\"}}]}"
            }),
            None,
        )
        .await;
    assert_eq!(response.body, json!({ "error": 0 }));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_download_canonical_file() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "hello").await;

    let raw = app
        .send(
            "GET",
            "/download?fileName=report.docx&useraddress=u1",
            Body::empty(),
            None,
        )
        .await;

    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(raw.text(), "hello");
    assert_eq!(
        raw.content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    );
}

#[tokio::test]
async fn test_download_missing_file_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/download?fileName=nothing.docx&useraddress=u1",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_download_prefers_forcesave_artifact() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "canonical").await;
    let path = "/download?fileName=report.docx&useraddress=u1&forcesave=true";

    let before = app.send("GET", path, Body::empty(), None).await;
    assert_eq!(before.text(), "canonical");

    let url = app.docs.publish("fs", "forcesaved");
    let response = app
        .track(
            "u1",
            "report.docx",
            json!({ "status": 6, "url": url, "filetype": "docx", "forcesavetype": 1, "key": "k" }),
            None,
        )
        .await;
    assert_eq!(response.body, json!({ "error": 0 }));

    let after = app.send("GET", path, Body::empty(), None).await;
    assert_eq!(after.text(), "forcesaved");

    let plain = app
        .send(
            "GET",
            "/download?fileName=report.docx&useraddress=u1",
            Body::empty(),
            None,
        )
        .await;
    assert_eq!(plain.text(), "canonical");
}

#[tokio::test]
async fn test_save_discards_forcesave_artifact() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "v0").await;

    let url = app.docs.publish("fs", "forcesaved");
    app.track(
        "u1",
        "report.docx",
        json!({ "status": 6, "url": url, "filetype": "docx", "forcesavetype": 2, "key": "k" }),
        None,
    )
    .await;
    save(&app, "v1", "v1", "k").await;

    let doc = DocumentRef::new("report.docx", "u1");
    assert!(
        !tokio::fs::try_exists(app.layout().forcesave_path(&doc))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_list_versions() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "v0").await;
    save(&app, "v1", "v1", "k1").await;
    save(&app, "v2", "v2", "k2").await;

    let response = app
        .request(
            "GET",
            "/history/versions?fileName=report.docx&useraddress=u1",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["fileName"], "report.docx");
    assert_eq!(response.body["currentVersion"], 3);
    assert!(!response.body["key"].as_str().unwrap().is_empty());

    let versions = response.body["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], 1);
    assert_eq!(versions[0]["key"], "k1");
    assert_eq!(versions[1]["key"], "k2");
    assert_eq!(versions[1]["prevFile"], "prev.docx");
    assert_eq!(
        versions[0]["changes"]["changes"][0]["user"]["id"],
        "uid-1"
    );
}

#[tokio::test]
async fn test_list_versions_of_missing_document() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/history/versions?fileName=nothing.docx&useraddress=u1",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_artifact() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "v0").await;
    save(&app, "v1", "v1", "k1").await;
    save(&app, "v2", "v2", "k2").await;

    let prev = app
        .send(
            "GET",
            "/history?fileName=report.docx&useraddress=u1&ver=2&file=prev.docx",
            Body::empty(),
            None,
        )
        .await;
    assert_eq!(prev.status, StatusCode::OK);
    assert_eq!(prev.text(), "v1");

    let key = app
        .send(
            "GET",
            "/history?fileName=report.docx&useraddress=u1&ver=1&file=key.txt",
            Body::empty(),
            None,
        )
        .await;
    assert_eq!(key.text(), "k1");
}

#[tokio::test]
async fn test_history_rejects_foreign_names() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "v0").await;
    save(&app, "v1", "v1", "k1").await;

    let response = app
        .request(
            "GET",
            "/history?fileName=report.docx&useraddress=u1&ver=1&file=..%2F..%2Freport.docx",
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let zero = app
        .request(
            "GET",
            "/history?fileName=report.docx&useraddress=u1&ver=0&file=prev.docx",
            None,
            None,
        )
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_requires_token_when_signing_enabled() {
    let app = TestApp::with_signing().await;
    app.seed("u1", "report.docx", "secret content").await;
    let path = "/download?fileName=report.docx&useraddress=u1";

    let anonymous = app.request("GET", path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let token = app.sign_payload(&json!({ "fileName": "report.docx" }));
    let signed = app.send("GET", path, Body::empty(), Some(&token)).await;
    assert_eq!(signed.status, StatusCode::OK);
    assert_eq!(signed.text(), "secret content");
}
