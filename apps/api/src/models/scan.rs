#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score every scan starts from.
pub const BASE_SCORE: i32 = 100;
/// Lowest final score that counts as a pass.
pub const PASS_THRESHOLD: u32 = 90;

pub const NO_ISSUES_PLACEHOLDER: &str = "Perfect CV!";
pub const FAILURE_MESSAGE: &str = "PDF Error";
pub const FAILURE_ISSUE: &str = "Processing failed";

// ────────────────────────────────────────────────────────────────────────────
// Findings
// ────────────────────────────────────────────────────────────────────────────

/// How a finding moves the running score.
///
/// A cap is `min(score, ceiling)`: it lowers the score or leaves it alone,
/// never raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adjustment {
    Delta { points: i32 },
    Cap { ceiling: i32 },
    DeltaThenCap { points: i32, ceiling: i32 },
    Bonus { points: i32 },
}

impl Adjustment {
    pub fn apply(self, score: i32) -> i32 {
        match self {
            Adjustment::Delta { points } | Adjustment::Bonus { points } => score + points,
            Adjustment::Cap { ceiling } => score.min(ceiling),
            Adjustment::DeltaThenCap { points, ceiling } => (score + points).min(ceiling),
        }
    }

    /// Signed arithmetic change. Caps contribute nothing here.
    pub fn delta(self) -> i32 {
        match self {
            Adjustment::Delta { points }
            | Adjustment::Bonus { points }
            | Adjustment::DeltaThenCap { points, .. } => points,
            Adjustment::Cap { .. } => 0,
        }
    }
}

/// One scoring event, in the order the rules were evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    pub adjustment: Adjustment,
}

impl Finding {
    pub fn deduction(message: impl Into<String>, points: i32) -> Self {
        Self {
            message: message.into(),
            adjustment: Adjustment::Delta { points: -points },
        }
    }

    pub fn cap(message: impl Into<String>, ceiling: i32) -> Self {
        Self {
            message: message.into(),
            adjustment: Adjustment::Cap { ceiling },
        }
    }

    pub fn penalty_with_cap(message: impl Into<String>, points: i32, ceiling: i32) -> Self {
        Self {
            message: message.into(),
            adjustment: Adjustment::DeltaThenCap {
                points: -points,
                ceiling,
            },
        }
    }

    pub fn bonus(message: impl Into<String>, points: i32) -> Self {
        Self {
            message: message.into(),
            adjustment: Adjustment::Bonus { points },
        }
    }

    pub fn delta(&self) -> i32 {
        self.adjustment.delta()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adjustment {
            Adjustment::Delta { points } => write!(f, "{} → {points:+}", self.message),
            Adjustment::Cap { ceiling } => write!(f, "{} → Max score: {ceiling}", self.message),
            Adjustment::DeltaThenCap { points, ceiling } => {
                write!(f, "{} → {points:+} & Max score: {ceiling}", self.message)
            }
            Adjustment::Bonus { points } => write!(f, "{} → {points:+} bonus", self.message),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result record
// ────────────────────────────────────────────────────────────────────────────

/// Final output of one scan. Built once per request and not kept afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub score: u32,
    pub passed: bool,
    pub is_official_template: bool,
    pub has_photo: bool,
    pub has_colored_background: bool,
    pub has_template_font: bool,
    pub message: String,
    pub issues: Vec<String>,
}

impl ScanResult {
    /// Terminal result for a document whose text could not be extracted.
    pub fn failed() -> Self {
        Self {
            score: 0,
            passed: false,
            is_official_template: false,
            has_photo: false,
            has_colored_background: false,
            has_template_font: false,
            message: FAILURE_MESSAGE.to_string(),
            issues: vec![FAILURE_ISSUE.to_string()],
        }
    }
}

pub fn status_message(score: u32) -> String {
    if score >= PASS_THRESHOLD {
        "PASSED! 90+ only with the official template".to_string()
    } else {
        format!("Score: {score}/100 – Use Official Template")
    }
}
