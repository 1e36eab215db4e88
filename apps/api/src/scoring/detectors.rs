//! Visual feature detectors over page rendering signals.
//!
//! Each detector reads the per-page results independently and never fails:
//! a page whose signals could not be extracted is logged and counts as a
//! negative for that page.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::page::{FontUsage, OperatorKind, PageOperator, PageScan, PageSignals};
use crate::pdf::MAX_SIGNAL_PAGES;

/// A fill counts as white when every channel is at least this bright.
pub const WHITE_THRESHOLD: f64 = 0.95;
/// Case-insensitive substring identifying the template font family.
pub const TEMPLATE_FONT_FAMILY: &str = "inter";

/// Combined output of the three detectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualFeatures {
    pub has_photo: bool,
    pub has_colored_background: bool,
    pub has_template_font: bool,
}

impl VisualFeatures {
    pub fn detect(pages: &[PageScan]) -> Self {
        Self {
            has_photo: detect_photo(pages),
            has_colored_background: detect_colored_background(pages),
            has_template_font: detect_template_font(pages),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Photo
// ────────────────────────────────────────────────────────────────────────────

/// Only the first page is inspected.
pub fn detect_photo(pages: &[PageScan]) -> bool {
    match pages.first() {
        Some(Ok(page)) => page_has_photo(&page.operators),
        Some(Err(e)) => {
            warn!(detector = "photo", page = 1, error = %e, "Page signals unavailable");
            false
        }
        None => false,
    }
}

pub fn page_has_photo(operators: &[PageOperator]) -> bool {
    operators.iter().any(|op| op.kind.is_image())
}

// ────────────────────────────────────────────────────────────────────────────
// Colored background
// ────────────────────────────────────────────────────────────────────────────

/// True on the first non-white fill or shading within the first pages.
pub fn detect_colored_background(pages: &[PageScan]) -> bool {
    readable_pages(pages, "colored_background").any(|page| page_has_colored_fill(&page.operators))
}

/// Tracks the running fill color, starting from black, and reports whether
/// any fill paints with a non-white color. Shading always counts as colored.
pub fn page_has_colored_fill(operators: &[PageOperator]) -> bool {
    let mut color = FillColor::BLACK;
    for op in operators {
        match op.kind {
            OperatorKind::ShadingFill => return true,
            kind if kind.is_fill_color() => {
                if let Some(next) = FillColor::from_args(&op.args) {
                    color = next;
                }
            }
            kind if kind.is_fill_path() => {
                if !color.is_white() {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Fill color in RGB with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FillColor {
    r: f64,
    g: f64,
    b: f64,
}

impl FillColor {
    const BLACK: FillColor = FillColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Interprets color operands by count: gray, RGB or CMYK.
    /// Any other shape, or a non-finite value, is unresolvable.
    fn from_args(args: &[f64]) -> Option<Self> {
        if args.iter().any(|v| !v.is_finite()) {
            return None;
        }
        match *args {
            [gray] => Some(Self {
                r: gray,
                g: gray,
                b: gray,
            }),
            [r, g, b] => Some(Self { r, g, b }),
            [c, m, y, k] => Some(Self {
                r: (1.0 - c) * (1.0 - k),
                g: (1.0 - m) * (1.0 - k),
                b: (1.0 - y) * (1.0 - k),
            }),
            _ => None,
        }
    }

    fn is_white(&self) -> bool {
        self.r >= WHITE_THRESHOLD && self.g >= WHITE_THRESHOLD && self.b >= WHITE_THRESHOLD
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template font
// ────────────────────────────────────────────────────────────────────────────

pub fn detect_template_font(pages: &[PageScan]) -> bool {
    readable_pages(pages, "template_font").any(|page| fonts_include_template(&page.fonts))
}

pub fn fonts_include_template(fonts: &FontUsage) -> bool {
    fonts
        .iter()
        .any(|name| name.to_lowercase().contains(TEMPLATE_FONT_FAMILY))
}

/// Yields readable pages among the first `MAX_SIGNAL_PAGES`, logging the rest.
fn readable_pages<'a>(
    pages: &'a [PageScan],
    detector: &'static str,
) -> impl Iterator<Item = &'a PageSignals> {
    pages
        .iter()
        .take(MAX_SIGNAL_PAGES)
        .enumerate()
        .filter_map(move |(idx, scan)| match scan {
            Ok(page) => Some(page),
            Err(e) => {
                warn!(detector, page = idx + 1, error = %e, "Page signals unavailable");
                None
            }
        })
}
