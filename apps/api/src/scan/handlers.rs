use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::scan::ScanResult;
use crate::scan::uploads::store_upload;
use crate::state::AppState;

/// Multipart field carrying the résumé file.
pub const CV_FIELD: &str = "cv";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    #[serde(flatten)]
    pub result: ScanResult,
    pub pdf_url: String,
}

struct CvUpload {
    file_name: String,
    bytes: Bytes,
}

/// POST /scan/resume
pub async fn handle_scan_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, AppError> {
    let upload = read_cv_field(&mut multipart).await?;
    let stored = store_upload(&state.config.upload_dir, &upload.file_name, &upload.bytes).await?;
    debug!(path = %stored.path.display(), "Scanning upload");

    let result = state.scanner.scan(upload.bytes).await;
    Ok(Json(ScanResponse {
        result,
        pdf_url: stored.public_url(&state.config.app_url),
    }))
}

async fn read_cv_field(multipart: &mut Multipart) -> Result<CvUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed multipart body"))?
    {
        if field.name() != Some(CV_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Invalid uploaded file"))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Invalid uploaded file".to_string()));
        }
        return Ok(CvUpload { file_name, bytes });
    }
    Err(AppError::Validation(format!("Upload file with key: {CV_FIELD}")))
}

/// Bodies over the configured upload limit surface as 413, everything else as 400.
fn multipart_error(e: MultipartError, context: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {}", e.body_text()))
    }
}
