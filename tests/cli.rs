use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut c = Command::cargo_bin("snap-translate").unwrap();
    c.current_dir(dir.path())
        .env("SETTINGS_PATH", dir.path().join("settings.json"))
        .env("LOG_LEVEL", "error")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("ANTHROPIC_BASE_URL")
        .env_remove("OCR_TRANSLATION_MODEL");
    c
}

fn write_photo(dir: &Path) -> PathBuf {
    let path = dir.join("menu.png");
    let img = RgbImage::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 90]));
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[test]
fn languages_lists_all_targets() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("languages")
        .assert()
        .success()
        .stdout(contains("English"))
        .stdout(contains("Türkçe"))
        .stdout(contains("فارسی"));
}

#[test]
fn languages_json_output() {
    let dir = TempDir::new().unwrap();
    let out = cmd(&dir)
        .args(["--json", "languages"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(value["data"][1]["code"], "tr");
}

#[test]
fn onboard_then_status_shows_language() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .args(["status"])
        .assert()
        .success()
        .stdout(contains("onboarding complete: false"))
        .stdout(contains("(not set)"));

    cmd(&dir)
        .args(["onboard", "--language", "tr"])
        .assert()
        .success()
        .stdout(contains("Target language set to Türkçe"));

    cmd(&dir)
        .args(["status"])
        .assert()
        .success()
        .stdout(contains("onboarding complete: true"))
        .stdout(contains("Türkçe"));

    let stored = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
    let stored: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["ocr_target_language"], "Türkçe");
    assert_eq!(stored["onboarding_complete"], "true");
}

#[test]
fn onboard_rejects_unknown_language() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["onboard", "--language", "klingon"])
        .assert()
        .failure()
        .stderr(contains("Unsupported language 'klingon'"));

    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn scan_before_onboarding_is_refused() {
    let dir = TempDir::new().unwrap();
    let photo = write_photo(dir.path());

    cmd(&dir)
        .arg("scan")
        .arg(&photo)
        .assert()
        .failure()
        .stderr(contains("snap-translate onboard --language"));
}

#[test]
fn scan_missing_file_reports_generic_failure() {
    let dir = TempDir::new().unwrap();
    cmd(&dir).args(["onboard", "--language", "en"]).assert().success();

    cmd(&dir)
        .env("ANTHROPIC_API_KEY", "test-key")
        .env("ANTHROPIC_BASE_URL", "http://127.0.0.1:9")
        .args(["scan", "nope.jpg"])
        .assert()
        .failure()
        .stderr(contains("Error: Failed to process image. Please try again."));
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_renders_translation_from_api() {
    let router = Router::new().route(
        "/messages",
        post(|Json(body): Json<Value>| async move {
            let instruction = body["messages"][0]["content"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let reply = if instruction.contains("translate it to English") {
                r#"{"originalText":"Merhaba dünya","translation":"Hello world","sourceLanguage":"tr","targetLanguage":"English"}"#
            } else {
                r#"{"originalText":"?","translation":"wrong language"}"#
            };
            Json(json!({
                "content": [{"type": "text", "text": reply}],
                "usage": {"input_tokens": 900, "output_tokens": 20}
            }))
        }),
    );
    let base_url = spawn_server(router).await;

    let dir = TempDir::new().unwrap();
    let photo = write_photo(dir.path());

    tokio::task::spawn_blocking(move || {
        cmd(&dir).args(["onboard", "--language", "en"]).assert().success();

        cmd(&dir)
            .env("ANTHROPIC_API_KEY", "test-key")
            .env("ANTHROPIC_BASE_URL", &base_url)
            .arg("scan")
            .arg(&photo)
            .assert()
            .success()
            .stdout(contains("Translation Result"))
            .stdout(contains("Merhaba dünya"))
            .stdout(contains("Hello world"));

        cmd(&dir)
            .env("ANTHROPIC_API_KEY", "test-key")
            .env("ANTHROPIC_BASE_URL", &base_url)
            .arg("scan")
            .arg(&photo)
            .arg("--raw")
            .assert()
            .success()
            .stdout(contains(r#""translation":"Hello world""#));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_surfaces_api_error_message() {
    let router = Router::new().route(
        "/messages",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "type": "error",
                    "error": {"type": "invalid_request_error", "message": "Image too large"}
                })),
            )
        }),
    );
    let base_url = spawn_server(router).await;

    let dir = TempDir::new().unwrap();
    let photo = write_photo(dir.path());

    tokio::task::spawn_blocking(move || {
        cmd(&dir).args(["onboard", "--language", "fa"]).assert().success();

        cmd(&dir)
            .env("ANTHROPIC_API_KEY", "test-key")
            .env("ANTHROPIC_BASE_URL", &base_url)
            .arg("scan")
            .arg(&photo)
            .assert()
            .failure()
            .stderr(contains("Error: Image too large"))
            .stdout(predicate::str::is_empty());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_with_unparseable_reply_shows_placeholders() {
    let router = Router::new().route(
        "/messages",
        post(|| async {
            Json(json!({
                "content": [{"type": "text", "text": "Sorry, I cannot read this image."}]
            }))
        }),
    );
    let base_url = spawn_server(router).await;

    let dir = TempDir::new().unwrap();
    let photo = write_photo(dir.path());

    tokio::task::spawn_blocking(move || {
        cmd(&dir).args(["onboard", "--language", "tr"]).assert().success();

        let out = cmd(&dir)
            .env("ANTHROPIC_API_KEY", "test-key")
            .env("ANTHROPIC_BASE_URL", &base_url)
            .args(["--json", "scan"])
            .arg(&photo)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"]["result"]["originalText"], "Error parsing original text");
        assert_eq!(value["data"]["result"]["translatedText"], "Error parsing translation");
        assert!(value["data"]["response"].is_null());
    })
    .await
    .unwrap();
}
