//! Upload, job status, download and the model API through the full router

mod common;

use std::sync::Arc;
use std::time::Duration;

use assette::assets::ModelGenerator;
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use common::{FixedGenerator, MODEL};
use http::{HeaderName, HeaderValue, StatusCode};
use serde_json::Value;
use tempfile::TempDir;

const LIMIT: usize = 1024;

async fn server(enabled: bool) -> (TestServer, TempDir) {
    let generator = enabled.then(|| Arc::new(FixedGenerator) as Arc<dyn ModelGenerator>);
    let (app, dir) = common::app_with_generator(generator, LIMIT).await;
    (TestServer::new(app).unwrap(), dir)
}

fn image(file_name: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "image",
        Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_type("image/png"),
    )
}

fn htmx() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("hx-request"),
        HeaderValue::from_static("true"),
    )
}

async fn finished(server: &TestServer, job_id: &str) -> Value {
    for _ in 0..200 {
        let job: Value = server.get(&format!("/status/{job_id}")).await.json();
        if job["status"] != "processing" {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} never finished");
}

async fn generated(server: &TestServer) -> String {
    let response = server.post("/upload").multipart(image("cat.png", b"png")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "processing");
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(job_id.starts_with("job_"));

    let job = finished(server, &job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["model_url"], format!("/download/{job_id}"));
    job_id
}

#[tokio::test]
async fn test_upload_to_download() {
    let (server, dir) = server(true).await;
    let job_id = generated(&server).await;

    let response = server.get(&format!("/download/{job_id}")).await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "model/gltf-binary");
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=\"{job_id}.glb\"").as_str()
    );
    assert_eq!(&response.as_bytes()[..], MODEL);
    assert!(dir.path().join(format!("{job_id}.glb")).exists());

    let models: Value = server.get("/api/models").await.json();
    assert_eq!(models.as_array().unwrap().len(), 1);
    assert_eq!(models[0]["id"], job_id.as_str());
    assert_eq!(models[0]["original_image"], "cat.png");

    let html = server.get("/models").await.text();
    assert!(html.contains(&format!(r#"href="/download/{job_id}""#)));
    assert!(html.contains("from cat.png"));
    assert!(!html.contains("No models generated yet."));
}

#[tokio::test]
async fn test_htmx_upload_swaps_in_progress_panel() {
    let (server, _dir) = server(true).await;
    let (name, value) = htmx();

    let response = server
        .post("/upload")
        .add_header(name.clone(), value.clone())
        .multipart(image("cat.png", b"png"))
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"hx-get="/status/job_"#));
    assert!(html.contains(r#"hx-trigger="every 2s""#));
    assert!(html.contains("toast-positive"));
    assert!(html.contains("Generation started"));

    let start = html.find("/status/").unwrap() + "/status/".len();
    let job_id: String = html[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    finished(&server, &job_id).await;

    let panel = server
        .get(&format!("/status/{job_id}"))
        .add_header(name, value)
        .await
        .text();
    assert!(panel.contains(&format!(r#"href="/download/{job_id}""#)));
    assert!(!panel.contains("hx-trigger"));
    assert!(panel.contains(r#"hx-post="/upload""#));
}

#[tokio::test]
async fn test_upload_without_key_is_refused() {
    let (server, _dir) = server(false).await;

    let response = server.post("/upload").multipart(image("cat.png", b"png")).await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Model generation is not configured");

    let (name, value) = htmx();
    let response = server
        .post("/upload")
        .add_header(name, value)
        .multipart(image("cat.png", b"png"))
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("toast-negative"));
    assert!(html.contains("Generation is not configured."));
    assert!(!html.contains("hx-get"));
}

#[tokio::test]
async fn test_bad_uploads_are_rejected() {
    let (server, _dir) = server(true).await;

    let response = server
        .post("/upload")
        .multipart(image("notes.txt", b"text"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Only JPG and PNG files are allowed");

    server
        .post("/upload")
        .multipart(MultipartForm::new().add_text("caption", "a cat"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/upload")
        .multipart(image("big.png", &[0_u8; LIMIT + 1]))
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let models: Value = server.get("/api/models").await.json();
    assert!(models.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_ids() {
    let (server, _dir) = server(true).await;

    let response = server.get("/status/job_missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Model job_missing not found");

    server
        .get("/download/job_missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/models/job_missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_model() {
    let (server, dir) = server(true).await;
    let job_id = generated(&server).await;

    server
        .delete(&format!("/api/models/{job_id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let models: Value = server.get("/api/models").await.json();
    assert!(models.as_array().unwrap().is_empty());
    assert!(!dir.path().join(format!("{job_id}.glb")).exists());
    server
        .get(&format!("/download/{job_id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_page_offers_upload_when_enabled() {
    let (server, _dir) = server(true).await;

    let html = server.get("/").await.text();
    assert!(html.contains(r#"hx-post="/upload""#));
    assert!(html.contains(r#"hx-encoding="multipart/form-data""#));
    assert!(!html.contains("Generation is not configured."));
}
