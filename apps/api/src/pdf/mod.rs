// Input adapters: turn an uploaded PDF into extracted text and per-page
// rendering signals. Everything downstream is pure computation over their output.

pub mod fonts;
pub mod operators;
pub mod signals;
pub mod text;

use thiserror::Error;

pub use signals::{LopdfSignalSource, PageSignalSource, MAX_SIGNAL_PAGES};
pub use text::{PdfTextExtractor, TextExtractor};

/// Text extraction failure. Fatal for a scan.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Text extraction failed: {0}")]
    Pdf(String),

    #[error("Text extraction task aborted: {0}")]
    Aborted(String),
}

/// Rendering-signal failure. Never fatal; detectors fall back to negatives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("Could not load document: {0}")]
    Load(String),

    #[error("Could not read page {page}: {reason}")]
    Page { page: u32, reason: String },

    #[error("Signal extraction task aborted: {0}")]
    Aborted(String),
}
