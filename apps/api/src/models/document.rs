use serde::{Deserialize, Serialize};

/// Extracted text of one document plus its reading-order lines.
///
/// `lines` holds every line of `raw` trimmed, with blank lines dropped.
/// Both fields are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentText {
    raw: String,
    lines: Vec<String>,
}

impl DocumentText {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lines = raw
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Self { raw, lines }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_trimmed_and_non_empty() {
        let doc = DocumentText::new("  JANE DOE \n\n\t\nPROFESSIONAL SUMMARY\r\n  • Built things  \n");
        assert_eq!(
            doc.lines(),
            &["JANE DOE", "PROFESSIONAL SUMMARY", "• Built things"]
        );
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let raw = "Name  Inter\n\nSize 12";
        assert_eq!(DocumentText::new(raw).raw(), raw);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(DocumentText::new("").lines().is_empty());
        assert!(DocumentText::new("\n \n").lines().is_empty());
    }
}
