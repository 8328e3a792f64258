//! HTTP tests for `GET /download/{type}`.
//!
//! Requires PostgreSQL (`DATABASE_URL`); each test gets a fresh database.

mod helpers;

use axum::http::StatusCode;
use helpers::{body_json, body_string, insert_program, sample_file, TestApp};
use sqlx::PgPool;

const NOT_FOUND: &str = r#"{"error_message":"Not Found"}"#;

async fn seed_catalog(pool: &PgPool) {
    let example = [sample_file("installer.pkg", "256")];
    insert_program(pool, ("installer", "macOS", "x86-64", "stable"), &[sample_file("installer.pkg", "499")]).await;
    insert_program(pool, ("installer", "macOS", "x86-64", "beta"), &example).await;
    insert_program(pool, ("installer", "macOS", "arm64", "stable"), &example).await;
    insert_program(pool, ("installer", "Windows", "x86-64", "stable"), &example).await;
    insert_program(pool, ("installer", "Windows", "arm8", "alpha"), &example).await;
    insert_program(pool, ("clicker", "macOS", "x86-64", "stable"), &[sample_file("installer.pkg", "1")]).await;
}

#[sqlx::test]
async fn test_download_program(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = TestApp::new(pool);

    let cases = [
        (
            "/download/installer?os=macOS&arch=x86-64&branch=stable",
            StatusCode::OK,
            r#"[{"path":"installer.pkg","download_url":"https://buzkaaclicker.pl/sample","hash":"499"}]"#,
        ),
        (
            "/download/clicker?os=macOS&arch=x86-64&branch=stable",
            StatusCode::OK,
            r#"[{"path":"installer.pkg","download_url":"https://buzkaaclicker.pl/sample","hash":"1"}]"#,
        ),
        ("/download/clicker?os=macOS&arch=arm64&branch=stable", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/download/clicker?os=macOS&arch=x86-64&branch=unstable", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/download/clicker?os=macOSes&arch=x86-64&branch=stable", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/download/clicker?os=Windows&arch=x86-64&branch=stable", StatusCode::NOT_FOUND, NOT_FOUND),
        (
            "/download/installer?os=Windows&arch=x86-64&branch=stable",
            StatusCode::OK,
            r#"[{"path":"installer.pkg","download_url":"https://buzkaaclicker.pl/sample","hash":"256"}]"#,
        ),
    ];

    for (url, status, body) in cases {
        let resp = app.get(url).await;
        assert_eq!(resp.status(), status, "{url}");
        assert_eq!(
            resp.headers()["content-type"],
            "application/json",
            "Invalid content type for {url}"
        );
        assert_eq!(body_string(resp).await, body, "Response body not equal for {url}");
    }
}

#[sqlx::test]
async fn test_download_is_case_sensitive(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = TestApp::new(pool);

    for url in [
        "/download/Installer?os=macOS&arch=x86-64&branch=stable",
        "/download/installer?os=macos&arch=x86-64&branch=stable",
        "/download/installer?os=macOS&arch=X86-64&branch=stable",
        "/download/installer?os=macOS&arch=x86-64&branch=STABLE",
        "/download/installer?os=mac&arch=x86-64&branch=stable",
    ] {
        let resp = app.get(url).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{url}");
    }
}

#[sqlx::test]
async fn test_download_missing_params_is_not_found(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = TestApp::new(pool);

    let resp = app.get("/download/installer?os=macOS&arch=x86-64").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(resp).await, NOT_FOUND);
}

#[sqlx::test]
async fn test_download_unparseable_query_is_json_not_found(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = TestApp::new(pool);

    for url in [
        "/download/installer?os=macOS&os=Windows&arch=x86-64&branch=stable",
        "/download/installer?os=macOS&arch=x86-64&branch=stable&branch=beta",
    ] {
        let resp = app.get(url).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{url}");
        assert_eq!(resp.headers()["content-type"], "application/json", "{url}");
        assert_eq!(body_string(resp).await, NOT_FOUND, "{url}");
    }
}

#[sqlx::test]
async fn test_download_preserves_file_order(pool: PgPool) {
    let files = [
        sample_file("zeta.bin", "3"),
        sample_file("alpha.bin", "1"),
        sample_file("mid.bin", "2"),
    ];
    insert_program(&pool, ("clicker", "Windows", "x86-64", "stable"), &files).await;
    let app = TestApp::new(pool);

    let resp = app
        .get("/download/clicker?os=Windows&arch=x86-64&branch=stable")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let paths: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["zeta.bin", "alpha.bin", "mid.bin"]);
}

#[sqlx::test]
async fn test_every_published_key_resolves_to_its_own_files(pool: PgPool) {
    let keys = [
        ("installer", "macOS", "x86-64", "stable"),
        ("installer", "macOS", "arm64", "stable"),
        ("clicker", "Windows", "x86-64", "beta"),
    ];
    for (i, key) in keys.iter().enumerate() {
        insert_program(&pool, *key, &[sample_file("f", &i.to_string())]).await;
    }
    let app = TestApp::new(pool);

    for (i, (t, os, arch, branch)) in keys.iter().enumerate() {
        let resp = app
            .get(&format!("/download/{t}?os={os}&arch={arch}&branch={branch}"))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body[0]["hash"], i.to_string());
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    let resp = app
        .get("/download/clicker?os=macOS&arch=arm64&branch=beta")
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
