//! Integration tests for the callback endpoint.

mod helpers;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::json;

use doctrack_entity::document::{DocumentRef, VersionId};

use helpers::TestApp;

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[tokio::test]
async fn test_save_creates_first_version() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "old content").await;
    let url = app.docs.publish("doc123", "new content");

    let response = app
        .track(
            "u1",
            "report.docx",
            json!({ "status": 2, "url": url, "filetype": "docx", "key": "abc" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "error": 0 }));
    assert!(app.docs.conversions().is_empty());

    let layout = app.layout();
    let doc = DocumentRef::new("report.docx", "u1");
    assert_eq!(
        app.read(layout.prev_path(&doc, VersionId(1), "docx")).await.as_deref(),
        Some("old content")
    );
    assert_eq!(
        app.read(layout.storage_path(&doc)).await.as_deref(),
        Some("new content")
    );
    assert_eq!(
        app.read(layout.key_path(&doc, VersionId(1))).await.as_deref(),
        Some("abc")
    );
}

#[tokio::test]
async fn test_consecutive_saves_have_no_gaps() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "v0").await;

    for (i, key) in ["k1", "k2", "k3"].iter().enumerate() {
        let url = app.docs.publish(key, &format!("v{}", i + 1));
        let response = app
            .track(
                "u1",
                "report.docx",
                json!({ "status": 2, "url": url, "filetype": "docx", "key": key }),
                None,
            )
            .await;
        assert_eq!(response.body, json!({ "error": 0 }));
    }

    let layout = app.layout();
    let doc = DocumentRef::new("report.docx", "u1");
    for version in 1..=3u32 {
        assert_eq!(
            app.read(layout.prev_path(&doc, VersionId(version), "docx"))
                .await
                .as_deref(),
            Some(format!("v{}", version - 1).as_str())
        );
    }
    assert!(
        !tokio::fs::try_exists(layout.version_dir(&doc, VersionId(4)))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_replayed_save_fails_safely() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "old").await;
    let url = app.docs.publish("doc123", "new");
    let callback = json!({ "status": 2, "url": url, "filetype": "docx", "key": "abc" });

    let first = app.track("u1", "report.docx", callback.clone(), None).await;
    let replay = app.track("u1", "report.docx", callback, None).await;

    assert_eq!(first.body, json!({ "error": 0 }));
    assert_eq!(replay.body, json!({ "error": 1 }));

    let layout = app.layout();
    let doc = DocumentRef::new("report.docx", "u1");
    assert!(
        !tokio::fs::try_exists(layout.version_dir(&doc, VersionId(2)))
            .await
            .unwrap()
    );
    assert_eq!(app.read(layout.storage_path(&doc)).await.as_deref(), Some("new"));
}

#[tokio::test]
async fn test_forcesave_converts_and_leaves_history_untouched() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "original").await;
    let url = app.docs.publish("doc123", "pdf bytes");

    let response = app
        .track(
            "u1",
            "report.docx",
            json!({ "status": 6, "url": url, "filetype": "pdf", "forcesavetype": 0, "key": "abc" }),
            None,
        )
        .await;

    assert_eq!(response.body, json!({ "error": 0 }));

    let conversions = app.docs.conversions();
    assert_eq!(conversions.len(), 1);
    assert_eq!(conversions[0]["filetype"], "pdf");
    assert_eq!(conversions[0]["outputtype"], "docx");
    assert_eq!(conversions[0]["url"], url);

    let layout = app.layout();
    let doc = DocumentRef::new("report.docx", "u1");
    assert_eq!(
        app.read(layout.forcesave_path(&doc)).await.as_deref(),
        Some("converted to docx")
    );
    assert_eq!(
        app.read(layout.storage_path(&doc)).await.as_deref(),
        Some("original")
    );
    assert!(!tokio::fs::try_exists(layout.history_dir(&doc)).await.unwrap());
}

#[tokio::test]
async fn test_failed_conversion_saves_under_new_extension() {
    let app = TestApp::new().await;
    app.docs.fail_conversions();
    app.seed("u1", "report.docx", "original").await;
    let url = app.docs.publish("doc123", "pdf bytes");

    let response = app
        .track(
            "u1",
            "report.docx",
            json!({ "status": 2, "url": url, "filetype": "pdf", "key": "abc" }),
            None,
        )
        .await;

    assert_eq!(response.body, json!({ "error": 0 }));
    assert_eq!(app.docs.conversions().len(), 1);

    let layout = app.layout();
    let saved = DocumentRef::new("report.pdf", "u1");
    assert_eq!(
        app.read(layout.storage_path(&saved)).await.as_deref(),
        Some("pdf bytes")
    );
    assert_eq!(
        app.read(layout.prev_path(&saved, VersionId(1), "docx"))
            .await
            .as_deref(),
        Some("original")
    );
}

#[tokio::test]
async fn test_unreachable_content_answers_retry() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "original").await;

    let response = app
        .track(
            "u1",
            "report.docx",
            json!({
                "status": 2,
                "url": app.docs.file_url("missing"),
                "filetype": "docx",
                "key": "abc"
            }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "error": 1 }));

    let layout = app.layout();
    let doc = DocumentRef::new("report.docx", "u1");
    assert_eq!(
        app.read(layout.storage_path(&doc)).await.as_deref(),
        Some("original")
    );
    assert!(!tokio::fs::try_exists(layout.history_dir(&doc)).await.unwrap());
}

#[tokio::test]
async fn test_save_without_url_answers_retry() {
    let app = TestApp::new().await;
    app.seed("u1", "report.docx", "original").await;

    let response = app
        .track("u1", "report.docx", json!({ "status": 2, "key": "abc" }), None)
        .await;

    assert_eq!(response.body, json!({ "error": 1 }));
    assert_eq!(app.docs.downloads(), 0);
}

#[tokio::test]
async fn test_departed_user_triggers_forcesave_command() {
    let app = TestApp::new().await;

    let response = app
        .track(
            "u1",
            "report.docx",
            json!({
                "status": 1,
                "key": "abc",
                "users": ["uid-2"],
                "actions": [{ "type": 0, "userid": "uid-1" }]
            }),
            None,
        )
        .await;

    assert_eq!(response.body, json!({ "error": 0 }));
    let commands = app.docs.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["c"], "forcesave");
    assert_eq!(commands[0]["key"], "abc");
}

#[tokio::test]
async fn test_closed_and_unknown_statuses_are_noops() {
    let app = TestApp::new().await;

    for status in [4, 5, 42] {
        let response = app
            .track("u1", "report.docx", json!({ "status": status, "key": "abc" }), None)
            .await;
        assert_eq!(response.body, json!({ "error": 0 }));
    }

    assert_eq!(app.docs.downloads(), 0);
    assert!(app.docs.commands().is_empty());
}

#[tokio::test]
async fn test_submitted_form_becomes_new_document() {
    let app = TestApp::new().await;
    app.seed("u1", "contract.docx", "template").await;
    let url = app.docs.publish("form1", "filled");

    let response = app
        .track(
            "u1",
            "contract.docx",
            json!({
                "status": 6,
                "url": url,
                "filetype": "docx",
                "forcesavetype": 3,
                "key": "abc",
                "actions": [{ "type": 2, "userid": "uid-9" }]
            }),
            None,
        )
        .await;

    assert_eq!(response.body, json!({ "error": 0 }));
    assert_eq!(
        app.read(app.document_path("u1", "contract-form.docx"))
            .await
            .as_deref(),
        Some("filled")
    );
    assert_eq!(
        app.read(app.document_path("u1", "contract.docx")).await.as_deref(),
        Some("template")
    );
}

#[tokio::test]
async fn test_expired_token_rejected_before_any_io() {
    let app = TestApp::with_signing().await;
    app.seed("u1", "report.docx", "original").await;
    let url = app.docs.publish("doc123", "new");

    let token = app.sign(&json!({
        "status": 2,
        "url": url,
        "filetype": "docx",
        "key": "abc",
        "iat": unix_now() - 7200,
        "exp": unix_now() - 3600,
    }));

    let response = app
        .track("u1", "report.docx", json!({ "token": token }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.get("error").is_none());
    assert_eq!(response.body["code"], "UNAUTHORIZED");
    assert_eq!(app.docs.downloads(), 0);

    let doc = DocumentRef::new("report.docx", "u1");
    assert!(
        !tokio::fs::try_exists(app.layout().history_dir(&doc))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_missing_token_rejected_when_signing_enabled() {
    let app = TestApp::with_signing().await;

    let response = app
        .track("u1", "report.docx", json!({ "status": 4, "key": "abc" }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.get("error").is_none());
}

#[tokio::test]
async fn test_token_with_wrong_secret_rejected() {
    let app = TestApp::with_signing().await;

    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "status": 4, "key": "abc", "exp": unix_now() + 600 }),
        &jsonwebtoken::EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    let response = app
        .track("u1", "report.docx", json!({ "token": forged }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_body_token_claims_drive_the_save() {
    let app = TestApp::with_signing().await;
    app.seed("u1", "report.docx", "old").await;
    let url = app.docs.publish("doc123", "new");

    let token = app.sign(&json!({ "status": 2, "url": url, "filetype": "docx", "key": "abc" }));
    let response = app
        .track(
            "u1",
            "report.docx",
            json!({ "status": 4, "token": token }),
            None,
        )
        .await;

    assert_eq!(response.body, json!({ "error": 0 }));
    assert_eq!(
        app.read(app.document_path("u1", "report.docx")).await.as_deref(),
        Some("new")
    );
}

#[tokio::test]
async fn test_header_token_payload_drives_the_save() {
    let app = TestApp::with_signing().await;
    app.seed("u1", "report.docx", "old").await;
    let url = app.docs.publish("doc123", "new");
    let callback = json!({ "status": 2, "url": url, "filetype": "docx", "key": "abc" });

    let token = app.sign_payload(&callback);
    let response = app.track("u1", "report.docx", callback, Some(&token)).await;

    assert_eq!(response.body, json!({ "error": 0 }));
    assert_eq!(
        app.read(app.document_path("u1", "report.docx")).await.as_deref(),
        Some("new")
    );
}

#[tokio::test]
async fn test_signed_query_overrides_unsigned_address() {
    let app = TestApp::with_signing().await;
    app.seed("u1", "report.docx", "old").await;
    app.seed("u2", "other.docx", "untouched").await;
    let url = app.docs.publish("doc123", "new");
    let callback = json!({ "status": 2, "url": url, "filetype": "docx", "key": "abc" });

    let token = app.sign(&json!({
        "payload": callback,
        "query": { "useraddress": "u1", "filename": "report.docx" },
    }));
    let response = app.track("u2", "other.docx", callback, Some(&token)).await;

    assert_eq!(response.body, json!({ "error": 0 }));
    assert_eq!(
        app.read(app.document_path("u1", "report.docx")).await.as_deref(),
        Some("new")
    );
    assert_eq!(
        app.read(app.document_path("u2", "other.docx")).await.as_deref(),
        Some("untouched")
    );
    assert!(!app.layout().history_dir(&DocumentRef::new("other.docx", "u2")).exists());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new().await;

    let raw = app
        .send(
            "POST",
            "/track?filename=report.docx&useraddress=u1",
            Body::from("{not json"),
            None,
        )
        .await;
    assert_eq!(raw.status, StatusCode::BAD_REQUEST);

    let wrong_shape = app
        .track("u1", "report.docx", json!({ "status": "saved" }), None)
        .await;
    assert_eq!(wrong_shape.status, StatusCode::BAD_REQUEST);
    assert!(wrong_shape.body.get("error").is_none());
}

#[tokio::test]
async fn test_missing_query_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/track", Some(json!({ "status": 4 })), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");
}
