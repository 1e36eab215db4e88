use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::pdf::SignalError;

/// Drawing instruction kinds the detectors care about. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    SetFillGray,
    SetFillRgb,
    SetFillCmyk,
    FillPath,
    EvenOddFillPath,
    ShadingFill,
    PaintImage,
    PaintJpeg,
    Other,
}

impl OperatorKind {
    pub fn is_fill_color(self) -> bool {
        matches!(
            self,
            OperatorKind::SetFillGray | OperatorKind::SetFillRgb | OperatorKind::SetFillCmyk
        )
    }

    pub fn is_fill_path(self) -> bool {
        matches!(self, OperatorKind::FillPath | OperatorKind::EvenOddFillPath)
    }

    pub fn is_image(self) -> bool {
        matches!(self, OperatorKind::PaintImage | OperatorKind::PaintJpeg)
    }
}

/// One entry of a page's rendering sequence.
///
/// `args` holds the numeric operands in order: 1 for gray, 3 for RGB and
/// 4 for CMYK color operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOperator {
    pub kind: OperatorKind,
    pub args: Vec<f64>,
}

impl PageOperator {
    pub fn new(kind: OperatorKind, args: Vec<f64>) -> Self {
        Self { kind, args }
    }

    pub fn bare(kind: OperatorKind) -> Self {
        Self::new(kind, Vec::new())
    }
}

/// Resolved font family names rendered on a page. Deduplicated, case preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontUsage(BTreeSet<String>);

impl FontUsage {
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FontUsage {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Everything the visual detectors need from a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    pub operators: Vec<PageOperator>,
    pub fonts: FontUsage,
}

/// Outcome of reading one page. A failed page degrades to a negative signal.
pub type PageScan = Result<PageSignals, SignalError>;
