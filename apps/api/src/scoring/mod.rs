// Scoring engine: visual detectors and text rules feed one aggregation fold.
// Rule constants are fixed; nothing here reads configuration.

pub mod aggregator;
pub mod detectors;
pub mod scanner;
pub mod template;

pub use scanner::{PdfResumeScanner, ResumeScanner};
