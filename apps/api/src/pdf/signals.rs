use lopdf::{Dictionary, Document, ObjectId};
use tracing::debug;

use crate::models::page::PageScan;
use crate::pdf::fonts::get_dict;
use crate::pdf::operators::OperatorWalker;
use crate::pdf::SignalError;

/// Pages inspected by the page-level detectors.
pub const MAX_SIGNAL_PAGES: usize = 3;

const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Turns raw PDF bytes into per-page operator sequences and font usage.
///
/// A document-level error means no page could be read at all; individual
/// pages report their own failures inside the returned vector.
pub trait PageSignalSource: Send + Sync {
    fn page_signals(&self, bytes: &[u8], max_pages: usize) -> Result<Vec<PageScan>, SignalError>;
}

/// Default signal source backed by `lopdf` content-stream decoding.
pub struct LopdfSignalSource;

impl PageSignalSource for LopdfSignalSource {
    fn page_signals(&self, bytes: &[u8], max_pages: usize) -> Result<Vec<PageScan>, SignalError> {
        let doc = Document::load_mem(bytes).map_err(|e| SignalError::Load(e.to_string()))?;
        let pages = doc.get_pages();
        debug!(page_count = pages.len(), max_pages, "Reading page signals");

        Ok(pages
            .into_iter()
            .take(max_pages)
            .map(|(number, page_id)| read_page(&doc, number, page_id))
            .collect())
    }
}

fn read_page(doc: &Document, number: u32, page_id: ObjectId) -> PageScan {
    let page_error = |reason: String| SignalError::Page {
        page: number,
        reason,
    };

    let content = doc
        .get_page_content(page_id)
        .map_err(|e| page_error(e.to_string()))?;
    let resources = page_resources(doc, page_id);

    let mut walker = OperatorWalker::new(doc);
    walker
        .walk(&content, resources, 0)
        .map_err(|e| page_error(e.to_string()))?;
    Ok(walker.finish())
}

/// Finds the page's resource dictionary, inheriting from ancestors in the page tree.
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Some(resources) = get_dict(doc, node, b"Resources") {
            return Some(resources);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}
