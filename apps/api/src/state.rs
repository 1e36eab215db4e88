use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ResumeScanner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scanner. Default: `PdfResumeScanner` over pdf-extract + lopdf.
    pub scanner: Arc<dyn ResumeScanner>,
}
