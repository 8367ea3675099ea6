use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clipyard::application::{library::LibraryService, transform::TransformService};
use clipyard::http::{self, AppState};
use clipyard::ports::executor::{MediaExecutor, ToolOutcome};
use clipyard::LocalStore;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "clipyard-test-boundary";

/// Copies bytes instead of running ffmpeg, so outputs can be checked by content.
struct CopyingExecutor;

#[async_trait]
impl MediaExecutor for CopyingExecutor {
    async fn trim(&self, input: &Path, _start: f64, _duration: f64, output: &Path) -> ToolOutcome {
        match tokio::fs::copy(input, output).await {
            Ok(_) => ToolOutcome::Completed(output.to_path_buf()),
            Err(e) => ToolOutcome::Failed(e.to_string()),
        }
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> ToolOutcome {
        let mut joined = Vec::new();
        for input in inputs {
            match tokio::fs::read(input).await {
                Ok(bytes) => joined.extend(bytes),
                Err(e) => return ToolOutcome::Failed(e.to_string()),
            }
        }
        match tokio::fs::write(output, joined).await {
            Ok(()) => ToolOutcome::Completed(output.to_path_buf()),
            Err(e) => ToolOutcome::Failed(e.to_string()),
        }
    }
}

struct FailingExecutor;

#[async_trait]
impl MediaExecutor for FailingExecutor {
    async fn trim(&self, _: &Path, _: f64, _: f64, _: &Path) -> ToolOutcome {
        ToolOutcome::Failed("moov atom not found".to_string())
    }

    async fn concat(&self, _: &[PathBuf], _: &Path) -> ToolOutcome {
        ToolOutcome::Failed("codec mismatch".to_string())
    }
}

fn app_with<E: MediaExecutor + 'static>(executor: E) -> (TempDir, Router) {
    let temp_dir = tempdir().unwrap();
    let store = LocalStore::new(temp_dir.path());
    let state = AppState::new(
        LibraryService::new(store.clone(), 10),
        TransformService::new(store, executor, Duration::from_secs(5)),
    );
    let router = http::router(state, temp_dir.path());
    (temp_dir, router)
}

fn app() -> (TempDir, Router) {
    app_with(CopyingExecutor)
}

fn multipart_request(files: &[(&str, &str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, file_name, content) in files {
        body.extend(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend(content.as_bytes());
        body.extend(b"\r\n");
    }
    body.extend(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/video/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn upload(app: &Router, files: &[(&str, &str)]) -> Vec<String> {
    let fields: Vec<(&str, &str, &str)> = files.iter().map(|(n, c)| ("file", *n, *c)).collect();
    let (status, body) = send_json(app, multipart_request(&fields)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|file| file["fileId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn upload_stores_files_with_their_extension() {
    let (temp_dir, app) = app();

    let (status, body) = send_json(
        &app,
        multipart_request(&[
            ("file", "first.mp4", "one"),
            ("file", "second.mov", "two"),
            ("file", "notes.txt", "three"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "files uploaded successfully");
    assert_eq!(body["rejected"], json!(["notes.txt"]));

    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    let first_id = files[0]["fileId"].as_str().unwrap();
    let second_id = files[1]["fileId"].as_str().unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(files[0]["filePath"], format!("/upload/{first_id}.mp4"));
    assert_eq!(files[1]["filePath"], format!("/upload/{second_id}.mov"));

    assert_eq!(
        std::fs::read(temp_dir.path().join(format!("{first_id}.mp4"))).unwrap(),
        b"one"
    );
}

#[tokio::test]
async fn upload_without_valid_files_is_rejected() {
    let (_temp_dir, app) = app();

    let (status, body) = send_json(&app, multipart_request(&[("file", "virus.exe", "x")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);

    let (status, body) = send_json(&app, multipart_request(&[("other", "a.mp4", "x")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no files uploaded");
}

#[tokio::test]
async fn upload_of_more_than_ten_files_stores_nothing() {
    let (temp_dir, app) = app();
    let names: Vec<String> = (0..11).map(|i| format!("clip{i}.mp4")).collect();
    let fields: Vec<(&str, &str, &str)> = names
        .iter()
        .map(|name| ("file", name.as_str(), "x"))
        .collect();

    let (status, _) = send_json(&app, multipart_request(&fields)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn truncated_upload_is_rejected_and_leaves_nothing() {
    let (temp_dir, app) = app();
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"a.mp4\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         partial bytes without end"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/video/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, listed) = send_json(&app, get_request("/video/list")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn list_returns_only_video_entries() {
    let (temp_dir, app) = app();
    let ids = upload(&app, &[("a.mp4", "a"), ("b.avi", "b")]).await;
    std::fs::write(temp_dir.path().join("readme.txt"), b"").unwrap();

    let (status, body) = send_json(&app, get_request("/video/list")).await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    for entry in listed {
        let id = entry["fileId"].as_str().unwrap();
        assert!(ids.contains(&id.to_string()));
        let name = entry["fileName"].as_str().unwrap();
        assert!(name.starts_with(id));
        assert_eq!(entry["filePath"], format!("/upload/{name}"));
    }
}

#[tokio::test]
async fn output_lists_fail_until_their_directory_exists() {
    let (_temp_dir, app) = app();

    let (status, _) = send_json(&app, get_request("/video/trim-list")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send_json(&app, get_request("/video/concat-list")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trim_twice_yields_two_listed_files() {
    let (_temp_dir, app) = app();
    let ids = upload(&app, &[("source.mp4", "frames")]).await;
    let request = json!({ "fileId": ids[0], "trim_start": 2, "trim_end": 5 });

    let (status, first) = send_json(&app, json_request("/video/trim", request.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    assert_eq!(first["message"], "video trimmed successfully");
    let (_, second) = send_json(&app, json_request("/video/trim", request)).await;
    assert_ne!(first["downloadUrl"], second["downloadUrl"]);

    let (status, listed) = send_json(&app, get_request("/video/trim-list")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let download_url = first["downloadUrl"].as_str().unwrap();
    assert!(download_url.starts_with(&format!("/upload/trim/{}_trimmed_", ids[0])));
    let (status, bytes) = send(&app, get_request(download_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"frames");
}

#[tokio::test]
async fn trim_validates_its_input() {
    let (_temp_dir, app) = app();

    let (status, body) = send_json(
        &app,
        json_request("/video/trim", json!({ "fileId": "abc", "trim_start": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "fileId, trim_start and trim_end are all required");

    let (status, _) = send_json(
        &app,
        json_request(
            "/video/trim",
            json!({ "fileId": "abc", "trim_start": 5, "trim_end": 2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/video/trim")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        json_request(
            "/video/trim",
            json!({ "fileId": "a\u{0}b", "trim_start": 0, "trim_end": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trim_of_unknown_file_is_not_found() {
    let (_temp_dir, app) = app();

    let (status, body) = send_json(
        &app,
        json_request(
            "/video/trim",
            json!({ "fileId": "missing", "trim_start": 0, "trim_end": 1 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn concat_joins_sources_in_order() {
    let (_temp_dir, app) = app();
    let ids = upload(&app, &[("1.mp4", "A"), ("2.mp4", "B"), ("3.mp4", "C")]).await;
    let ordered = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];

    let (status, body) = send_json(
        &app,
        json_request("/video/concat", json!({ "fileIds": ordered })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "videos concatenated successfully");

    let (_, listed) = send_json(&app, get_request("/video/concat-list")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, bytes) = send(&app, get_request(body["downloadUrl"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"CAB");
}

#[tokio::test]
async fn concat_needs_two_existing_ids() {
    let (temp_dir, app) = app();
    let ids = upload(&app, &[("1.mp4", "A")]).await;

    let (status, _) = send_json(
        &app,
        json_request("/video/concat", json!({ "fileIds": [ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        json_request("/video/concat", json!({ "fileIds": [ids[0], "ghost"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "file not found: ghost");
    assert!(!temp_dir.path().join("concat").exists());
}

#[tokio::test]
async fn tool_failure_is_a_server_error() {
    let (_temp_dir, app) = app_with(FailingExecutor);
    let ids = upload(&app, &[("1.mp4", "A"), ("2.mp4", "B")]).await;

    let (status, body) = send_json(
        &app,
        json_request(
            "/video/trim",
            json!({ "fileId": ids[0], "trim_start": 0, "trim_end": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to trim video");

    let (status, body) = send_json(
        &app,
        json_request("/video/concat", json!({ "fileIds": ids })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to concatenate videos");
}
