pub mod health;
pub mod home;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::errors::AppError;
use crate::scan::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/scan/resume", post(handlers::handle_scan_resume))
        .nest_service("/uploads", uploads)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::models::scan::ScanResult;
    use crate::scoring::ResumeScanner;

    const BOUNDARY: &str = "cvscan-test-boundary";

    /// Returns a canned result and records nothing.
    struct StubScanner;

    #[async_trait]
    impl ResumeScanner for StubScanner {
        async fn scan(&self, bytes: Bytes) -> ScanResult {
            if bytes.starts_with(b"%PDF") {
                ScanResult {
                    score: 85,
                    passed: false,
                    is_official_template: false,
                    has_photo: false,
                    has_colored_background: false,
                    has_template_font: true,
                    message: "Score: 85/100 – Use Official Template".to_string(),
                    issues: vec!["Not using official template → Max score: 85".to_string()],
                }
            } else {
                ScanResult::failed()
            }
        }
    }

    fn test_app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            port: 7005,
            app_url: "http://localhost:7005".to_string(),
            upload_dir: dir.path().to_path_buf(),
            max_upload_mb: 1,
            rust_log: "debug".to_string(),
        };
        let state = AppState {
            config,
            scanner: Arc::new(StubScanner),
        };
        (build_router(state), dir)
    }

    fn multipart_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/scan/resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "cvscan");
    }

    #[tokio::test]
    async fn test_home_page_describes_upload() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("/scan/resume"));
    }

    #[tokio::test]
    async fn test_scan_returns_result_with_pdf_url() {
        let (app, dir) = test_app();
        let response = app
            .oneshot(multipart_request("cv", "Jane Doe CV.pdf", b"%PDF-1.7 body"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["score"], 85);
        assert_eq!(json["passed"], false);
        assert_eq!(json["hasTemplateFont"], true);
        assert_eq!(json["issues"][0], "Not using official template → Max score: 85");

        let url = json["pdfUrl"].as_str().unwrap();
        assert!(url.starts_with("http://localhost:7005/uploads/"), "{url}");
        assert!(url.ends_with("_Jane_Doe_CV.pdf"), "{url}");

        let stored: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_upload_still_returns_failed_scan() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(multipart_request("cv", "broken.pdf", b"garbage"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["score"], 0);
        assert_eq!(json["message"], "PDF Error");
        assert_eq!(json["issues"], serde_json::json!(["Processing failed"]));
    }

    #[tokio::test]
    async fn test_missing_cv_field_is_rejected() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(multipart_request("resume", "cv.pdf", b"%PDF-1.7"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Upload file with key: cv");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let (app, dir) = test_app();
        let mut content = b"%PDF-1.7 ".to_vec();
        content.resize(2 * 1024 * 1024, b'0');

        let response = app
            .oneshot(multipart_request("cv", "huge.pdf", &content))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_stored_uploads_are_served() {
        let (app, dir) = test_app();
        std::fs::write(dir.path().join("1_cv.pdf"), b"%PDF-1.7").unwrap();

        let response = app
            .oneshot(Request::get("/uploads/1_cv.pdf").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(Request::get("/scan/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }
}
