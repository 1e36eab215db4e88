//! Score aggregation.
//!
//! Findings are folded over the base score in evaluation order. After the
//! text findings come the visual ones (photo cap, colored-background penalty
//! and cap), then the template cap is applied once more and the bonus is
//! considered on the resulting value. Clamping to `[0, 100]` is always last.

use crate::models::scan::{
    status_message, Finding, ScanResult, BASE_SCORE, NO_ISSUES_PLACEHOLDER, PASS_THRESHOLD,
};
use crate::scoring::detectors::VisualFeatures;
use crate::scoring::template::{TextAnalysis, TEMPLATE_CAP};

pub const PHOTO_CAP: i32 = 90;
pub const COLORED_BACKGROUND_PENALTY: i32 = 30;
pub const COLORED_BACKGROUND_CAP: i32 = 60;
pub const BONUS_THRESHOLD: i32 = 95;
pub const BONUS_POINTS: i32 = 5;

const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;

pub fn visual_findings(features: &VisualFeatures) -> Vec<Finding> {
    let mut findings = Vec::new();
    if features.has_photo {
        findings.push(Finding::cap("Photo detected", PHOTO_CAP));
    }
    if features.has_colored_background {
        findings.push(Finding::penalty_with_cap(
            "Colored background",
            COLORED_BACKGROUND_PENALTY,
            COLORED_BACKGROUND_CAP,
        ));
    }
    findings
}

/// Applies each finding's adjustment to the base score, in order.
pub fn fold_score(findings: &[Finding]) -> i32 {
    findings
        .iter()
        .fold(BASE_SCORE, |score, f| f.adjustment.apply(score))
}

pub fn bonus_eligible(score: i32, is_official_template: bool, features: &VisualFeatures) -> bool {
    score >= BONUS_THRESHOLD
        && is_official_template
        && !features.has_photo
        && !features.has_colored_background
}

pub fn aggregate(analysis: TextAnalysis, features: VisualFeatures) -> ScanResult {
    let TextAnalysis {
        is_official_template,
        mut findings,
    } = analysis;
    findings.extend(visual_findings(&features));

    let mut score = fold_score(&findings);
    if !is_official_template {
        score = score.min(TEMPLATE_CAP);
    }
    if bonus_eligible(score, is_official_template, &features) {
        let bonus = Finding::bonus("Perfect format", BONUS_POINTS);
        score = bonus.adjustment.apply(score);
        findings.push(bonus);
    }

    let score = score.clamp(MIN_SCORE, MAX_SCORE) as u32;
    let issues = render_issues(&findings);

    ScanResult {
        score,
        passed: score >= PASS_THRESHOLD,
        is_official_template,
        has_photo: features.has_photo,
        has_colored_background: features.has_colored_background,
        has_template_font: features.has_template_font,
        message: status_message(score),
        issues,
    }
}

/// Issue strings in evaluation order, or the placeholder when nothing fired.
pub fn render_issues(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        vec![NO_ISSUES_PLACEHOLDER.to_string()]
    } else {
        findings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(is_official_template: bool, findings: Vec<Finding>) -> TextAnalysis {
        TextAnalysis {
            is_official_template,
            findings,
        }
    }

    fn features(has_photo: bool, has_colored_background: bool) -> VisualFeatures {
        VisualFeatures {
            has_photo,
            has_colored_background,
            has_template_font: true,
        }
    }

    #[test]
    fn test_clean_official_document_gets_bonus_then_clamps() {
        let result = aggregate(analysis(true, vec![]), features(false, false));
        assert_eq!(result.score, 100);
        assert!(result.passed);
        assert_eq!(result.issues, vec!["Perfect format → +5 bonus".to_string()]);
    }

    #[test]
    fn test_bonus_lifts_95_to_100() {
        let findings = vec![Finding::deduction("No bullet points", 5)];
        let result = aggregate(analysis(true, findings), features(false, false));
        assert_eq!(result.score, 100);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_bonus_requires_every_condition() {
        let below = vec![Finding::deduction("Missing: SKILLS", 10)];
        assert_eq!(aggregate(analysis(true, below), features(false, false)).score, 90);

        let not_official = aggregate(analysis(false, vec![]), features(false, false));
        assert_eq!(not_official.score, 85);
        assert!(!not_official.issues.iter().any(|i| i.contains("bonus")));

        let photo = aggregate(analysis(true, vec![]), features(true, false));
        assert_eq!(photo.score, 90);
        assert_eq!(photo.issues, vec!["Photo detected → Max score: 90".to_string()]);

        let colored = aggregate(analysis(true, vec![]), features(false, true));
        assert_eq!(colored.score, 60);
        assert!(!colored.passed);
    }

    #[test]
    fn test_colored_background_penalty_then_cap() {
        let findings = vec![
            Finding::deduction("Missing: SKILLS", 10),
            Finding::deduction("Missing: LANGUAGES", 10),
        ];
        // 100 - 20 = 80, then -30 = 50, cap 60 leaves 50.
        let result = aggregate(analysis(true, findings), features(false, true));
        assert_eq!(result.score, 50);
        assert_eq!(
            result.issues.last().map(String::as_str),
            Some("Colored background → -30 & Max score: 60")
        );
    }

    #[test]
    fn test_photo_and_background_stack() {
        let result = aggregate(analysis(false, vec![]), features(true, true));
        // 100 → photo cap 90 → 60 → cap 60 → template cap leaves 60.
        assert_eq!(result.score, 60);
        assert!(result.has_photo);
        assert!(result.has_colored_background);
    }

    #[test]
    fn test_score_is_clamped_at_zero() {
        let findings = (0..15)
            .map(|i| Finding::deduction(format!("Wrong order: {i}"), 10))
            .collect();
        let result = aggregate(analysis(true, findings), features(false, true));
        assert_eq!(result.score, 0);
        assert!(!result.passed);
        assert_eq!(result.message, "Score: 0/100 – Use Official Template");
    }

    #[test]
    fn test_placeholder_when_no_findings() {
        assert_eq!(render_issues(&[]), vec!["Perfect CV!".to_string()]);
        assert!(visual_findings(&VisualFeatures::default()).is_empty());
    }

    #[test]
    fn test_fold_is_monotone_without_bonus() {
        let mut findings = Vec::new();
        let mut previous = fold_score(&findings);
        for finding in [
            Finding::cap("Not using official template", 85),
            Finding::deduction("Missing: EDUCATION", 10),
            Finding::deduction("Wrong order: SKILLS", 5),
            Finding::cap("Photo detected", 90),
            Finding::penalty_with_cap("Colored background", 30, 60),
        ] {
            findings.push(finding);
            let next = fold_score(&findings);
            assert!(next <= previous);
            previous = next;
        }
    }
}
