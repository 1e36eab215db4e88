//! Template & structure rules over extracted text.
//!
//! Every rule is a named predicate over `DocumentText` plus a function that
//! turns its outcome into findings. `analyze` runs them in scoring order:
//! template → mandatory sections → summary length → section order →
//! bullets → font.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::document::DocumentText;
use crate::models::scan::Finding;

/// Literal strings the official template always contains.
pub const TEMPLATE_MARKERS: [&str; 4] = ["Inter", "Size 12", "size 8.6", "50–80 words"];
/// The name line must appear within this many leading lines.
pub const NAME_LINE_WINDOW: usize = 20;
pub const TEMPLATE_CAP: i32 = 85;

pub const MANDATORY_SECTIONS: [&str; 5] = [
    "PROFESSIONAL SUMMARY",
    "WORK EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "LANGUAGES",
];
pub const MISSING_SECTION_PENALTY: i32 = 10;

pub const CANONICAL_ORDER: [&str; 7] = [
    "PROFESSIONAL SUMMARY",
    "WORK EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "CORE COMPETENCIES",
    "CERTIFICATIONS",
    "LANGUAGES",
];
pub const SECTION_ORDER_PENALTY: i32 = 5;

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const SUMMARY_MIN_WORDS: usize = 50;
pub const SUMMARY_MAX_WORDS: usize = 80;
pub const SUMMARY_LENGTH_PENALTY: i32 = 10;

pub const BULLET_GLYPHS: [char; 5] = ['•', '●', '◦', '-', '–'];
pub const NO_BULLETS_PENALTY: i32 = 5;

/// Literal the text must contain for the font rule to pass.
pub const TEMPLATE_FONT_TEXT: &str = "Inter";
pub const FONT_PENALTY: i32 = 5;

/// "Name", then "Inter", then "Size 12" on one line, any case.
static NAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Name.*Inter.*Size 12").expect("valid name-line pattern"));

/// A line of only uppercase letters and whitespace, at least 8 characters.
static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z\s]{8,}$").expect("valid heading pattern"));

/// Outcome of all text rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub is_official_template: bool,
    pub findings: Vec<Finding>,
}

pub fn analyze(doc: &DocumentText) -> TextAnalysis {
    let is_official_template = is_official_template(doc);

    let findings = template_findings(is_official_template)
        .into_iter()
        .chain(missing_section_findings(doc.lines()))
        .chain(summary_findings(doc.lines()))
        .chain(section_order_findings(doc.lines()))
        .chain(bullet_findings(doc.lines()))
        .chain(font_findings(doc.raw()))
        .collect();

    TextAnalysis {
        is_official_template,
        findings,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Predicates
// ────────────────────────────────────────────────────────────────────────────

/// All markers present verbatim and a name line among the first lines.
pub fn is_official_template(doc: &DocumentText) -> bool {
    let has_markers = TEMPLATE_MARKERS.iter().all(|m| doc.raw().contains(m));
    has_markers && has_name_line(doc.lines())
}

pub fn has_name_line(lines: &[String]) -> bool {
    lines
        .iter()
        .take(NAME_LINE_WINDOW)
        .any(|l| NAME_LINE.is_match(l))
}

/// Index of the first line containing `section`, compared upper-cased.
pub fn section_line(lines: &[String], section: &str) -> Option<usize> {
    lines
        .iter()
        .position(|l| l.to_uppercase().contains(section))
}

pub fn is_section_heading(line: &str) -> bool {
    SECTION_HEADING.is_match(line)
}

/// Words between the summary heading and the next all-caps heading.
/// `None` when the document has no summary section.
pub fn summary_word_count(lines: &[String]) -> Option<usize> {
    let start = section_line(lines, SUMMARY_HEADING)?;
    let words = lines[start + 1..]
        .iter()
        .take_while(|l| !is_section_heading(l))
        .map(|l| l.split_whitespace().count())
        .sum();
    Some(words)
}

/// Sections whose position contradicts the canonical order.
///
/// Sections that are absent take no part. A found section is out of order
/// when a canonically earlier section sits strictly below it, or a
/// canonically later one strictly above it.
pub fn out_of_order_sections(lines: &[String]) -> Vec<&'static str> {
    let positions: Vec<Option<usize>> = CANONICAL_ORDER
        .iter()
        .map(|section| section_line(lines, section))
        .collect();

    CANONICAL_ORDER
        .iter()
        .enumerate()
        .filter_map(|(rank, section)| {
            let pos = positions[rank]?;
            let predecessor_below = positions[..rank].iter().flatten().any(|&p| p > pos);
            let successor_above = positions[rank + 1..].iter().flatten().any(|&p| p < pos);
            (predecessor_below || successor_above).then_some(*section)
        })
        .collect()
}

pub fn has_bullets(lines: &[String]) -> bool {
    lines.iter().any(|l| l.starts_with(BULLET_GLYPHS))
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

pub fn template_findings(is_official_template: bool) -> Option<Finding> {
    (!is_official_template).then(|| Finding::cap("Not using official template", TEMPLATE_CAP))
}

pub fn missing_section_findings(lines: &[String]) -> Vec<Finding> {
    MANDATORY_SECTIONS
        .iter()
        .filter(|section| section_line(lines, section).is_none())
        .map(|section| Finding::deduction(format!("Missing: {section}"), MISSING_SECTION_PENALTY))
        .collect()
}

pub fn summary_findings(lines: &[String]) -> Option<Finding> {
    let words = summary_word_count(lines)?;
    let within = (SUMMARY_MIN_WORDS..=SUMMARY_MAX_WORDS).contains(&words);
    (!within).then(|| {
        Finding::deduction(
            format!("Summary: {words} words (must {SUMMARY_MIN_WORDS}–{SUMMARY_MAX_WORDS})"),
            SUMMARY_LENGTH_PENALTY,
        )
    })
}

pub fn section_order_findings(lines: &[String]) -> Vec<Finding> {
    out_of_order_sections(lines)
        .into_iter()
        .map(|section| Finding::deduction(format!("Wrong order: {section}"), SECTION_ORDER_PENALTY))
        .collect()
}

pub fn bullet_findings(lines: &[String]) -> Option<Finding> {
    (!has_bullets(lines)).then(|| Finding::deduction("No bullet points", NO_BULLETS_PENALTY))
}

pub fn font_findings(raw: &str) -> Option<Finding> {
    (!raw.contains(TEMPLATE_FONT_TEXT)).then(|| Finding::deduction("Font not Inter", FONT_PENALTY))
}
