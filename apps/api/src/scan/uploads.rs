use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const FALLBACK_NAME: &str = "resume.pdf";

/// An uploaded file persisted under the upload directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
}

impl StoredUpload {
    /// Public link under `/uploads`, relative to `base_url`.
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/uploads/{}", base_url.trim_end_matches('/'), self.file_name)
    }
}

/// `{millis}_{tag}_{name}` where `name` is the client's file name reduced to
/// its last path component, with whitespace runs replaced by `_`. `tag` keeps
/// same-named uploads within one millisecond apart.
pub fn stored_file_name(original: &str, millis: i64, tag: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_NAME);
    let name = base.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{millis}_{tag}_{name}")
}

pub async fn store_upload(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<StoredUpload, AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Storage(format!("create {}: {e}", dir.display())))?;

    let tag = Uuid::new_v4().simple().to_string();
    let file_name = stored_file_name(original_name, Utc::now().timestamp_millis(), &tag[..8]);
    let path = dir.join(&file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("write {}: {e}", path.display())))?;

    info!(file = %file_name, size = bytes.len(), "Stored upload");
    Ok(StoredUpload { file_name, path })
}
