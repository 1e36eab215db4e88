//! Scan orchestration: one PDF in, one `ScanResult` out.
//!
//! # Flow
//! 1. Text extraction and page-signal extraction run side by side, each on a
//!    `spawn_blocking` task (both are CPU-bound parsing).
//! 2. Text failure ends the scan with `ScanResult::failed()`. Signal failure
//!    only logs; detectors then see no pages and report negatives.
//! 3. Detectors, text rules and aggregation run together on one blocking task.
//!
//! `AppState` holds an `Arc<dyn ResumeScanner>`, so handlers never depend on
//! the PDF backends directly.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::document::DocumentText;
use crate::models::page::PageScan;
use crate::models::scan::ScanResult;
use crate::pdf::{
    ExtractError, LopdfSignalSource, PageSignalSource, PdfTextExtractor, SignalError,
    TextExtractor, MAX_SIGNAL_PAGES,
};
use crate::scoring::aggregator::aggregate;
use crate::scoring::detectors::VisualFeatures;
use crate::scoring::template::analyze;

#[async_trait]
pub trait ResumeScanner: Send + Sync {
    async fn scan(&self, bytes: Bytes) -> ScanResult;
}

/// Scanner over real PDF bytes using pluggable extraction backends.
pub struct PdfResumeScanner {
    text: Arc<dyn TextExtractor>,
    signals: Arc<dyn PageSignalSource>,
}

impl PdfResumeScanner {
    pub fn new(text: Arc<dyn TextExtractor>, signals: Arc<dyn PageSignalSource>) -> Self {
        Self { text, signals }
    }
}

impl Default for PdfResumeScanner {
    fn default() -> Self {
        Self::new(Arc::new(PdfTextExtractor), Arc::new(LopdfSignalSource))
    }
}

#[async_trait]
impl ResumeScanner for PdfResumeScanner {
    async fn scan(&self, bytes: Bytes) -> ScanResult {
        let scan_id = Uuid::new_v4();
        let span = info_span!("scan", %scan_id, size = bytes.len());

        async move {
            let (text, pages) = tokio::join!(
                extract_text(self.text.clone(), bytes.clone()),
                extract_signals(self.signals.clone(), bytes),
            );

            let doc = match text {
                Ok(doc) => doc,
                Err(e) => {
                    error!(error = %e, "Text extraction failed; aborting scan");
                    return ScanResult::failed();
                }
            };
            let pages = pages.unwrap_or_else(|e| {
                warn!(error = %e, "Page signals unavailable; visual checks default to negative");
                Vec::new()
            });

            let scored = tokio::task::spawn_blocking(move || score_document(&doc, &pages)).await;
            let result = match scored {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "Scoring task failed");
                    return ScanResult::failed();
                }
            };

            info!(
                score = result.score,
                passed = result.passed,
                official_template = result.is_official_template,
                issues = result.issues.len(),
                "Scan complete"
            );
            result
        }
        .instrument(span)
        .await
    }
}

/// Scores already-extracted inputs. Pure apart from logging.
pub fn score_document(doc: &DocumentText, pages: &[PageScan]) -> ScanResult {
    let features = VisualFeatures::detect(pages);
    let analysis = analyze(doc);
    aggregate(analysis, features)
}

async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> Result<DocumentText, ExtractError> {
    tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| ExtractError::Aborted(e.to_string()))?
}

async fn extract_signals(
    source: Arc<dyn PageSignalSource>,
    bytes: Bytes,
) -> Result<Vec<PageScan>, SignalError> {
    tokio::task::spawn_blocking(move || source.page_signals(&bytes, MAX_SIGNAL_PAGES))
        .await
        .map_err(|e| SignalError::Aborted(e.to_string()))?
}
