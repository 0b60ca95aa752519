//! Paragraph-boundary splitting.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use textsplit_core::{Result, Segmenter, SplitError, SplitterConfig};

use crate::boundary::{trimmed_span, BoundarySplitter, SpanSegmenter};

/// Blank lines (possibly holding spaces or tabs) between paragraphs.
pub const DEFAULT_PARAGRAPH_DELIMITER: &str = r"(?:\r?\n[ \t]*){2,}";

/// Paragraph splitter: paragraphs packed up to `chunk_size`.
pub type ParagraphSplitter = BoundarySplitter<ParagraphSegmenter>;

impl BoundarySplitter<ParagraphSegmenter> {
    /// Create a paragraph splitter that splits on blank lines.
    pub fn new(config: SplitterConfig) -> Self {
        Self::with_segmenter(config, ParagraphSegmenter::new())
    }

    /// Create a paragraph splitter with a custom delimiter pattern.
    pub fn with_delimiter(config: SplitterConfig, pattern: &str) -> Result<Self> {
        Ok(Self::with_segmenter(config, ParagraphSegmenter::with_pattern(pattern)?))
    }
}

/// Splits text into paragraphs on a delimiter pattern.
#[derive(Debug, Clone)]
pub struct ParagraphSegmenter {
    delimiter: Regex,
}

impl ParagraphSegmenter {
    pub fn new() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }

    /// Use `pattern` as the paragraph delimiter.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let delimiter = Regex::new(pattern).map_err(|e| SplitError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { delimiter })
    }

    pub fn pattern(&self) -> &str {
        self.delimiter.as_str()
    }
}

impl Default for ParagraphSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for ParagraphSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|span| text[span].to_string())
            .collect()
    }

    fn join_separator(&self) -> &str {
        "\n\n"
    }
}

impl SpanSegmenter for ParagraphSegmenter {
    fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start = 0;
        for delimiter in self.delimiter.find_iter(text) {
            spans.extend(trimmed_span(text, start..delimiter.start()));
            start = delimiter.end();
        }
        spans.extend(trimmed_span(text, start..text.len()));
        spans
    }
}

fn default_delimiter() -> Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER
        .get_or_init(|| {
            Regex::new(DEFAULT_PARAGRAPH_DELIMITER)
                .expect("paragraph delimiter pattern is hardcoded and must be valid")
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsplit_core::TextSplitter;

    #[test]
    fn test_segment_on_blank_lines() {
        let segmenter = ParagraphSegmenter::new();
        assert_eq!(
            segmenter.segment("one\n\ntwo\r\n\r\nthree\n  \n\n four\nstill four"),
            vec!["one", "two", "three", "four\nstill four"]
        );
    }

    #[test]
    fn test_single_newline_is_not_a_paragraph_break() {
        let segmenter = ParagraphSegmenter::new();
        assert_eq!(segmenter.segment("line one\nline two"), vec!["line one\nline two"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let segmenter = ParagraphSegmenter::with_pattern(r"\n-{3,}\n").unwrap();
        assert_eq!(segmenter.segment("a\n---\nb\n\nc"), vec!["a", "b\n\nc"]);
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = ParagraphSegmenter::with_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, SplitError::InvalidPattern { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_two_paragraphs_split() {
        let splitter = ParagraphSplitter::new(SplitterConfig::new(30, 0).unwrap());
        let chunks = splitter
            .split_text("First paragraph.\n\nSecond paragraph.")
            .unwrap();
        assert_eq!(chunks, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn test_small_paragraphs_are_packed() {
        let splitter = ParagraphSplitter::new(SplitterConfig::new(20, 0).unwrap());
        let chunks = splitter.split_text("one\n\ntwo\n\n\nthree four five six").unwrap();
        assert_eq!(chunks, vec!["one\n\ntwo", "three four five six"]);
    }

    #[test]
    fn test_packed_paragraphs_keep_source_delimiters() {
        let splitter = ParagraphSplitter::new(SplitterConfig::new(100, 0).unwrap());
        let text = "p1\n\n\n\np2 line\nmore\n\n\np3";
        assert_eq!(splitter.split_text(text).unwrap(), vec![text]);

        let splitter = ParagraphSplitter::with_delimiter(
            SplitterConfig::new(100, 0).unwrap(),
            r"\n-{3,}\n",
        )
        .unwrap();
        assert_eq!(splitter.split_text("a\n---\nb").unwrap(), vec!["a\n---\nb"]);
    }

    #[test]
    fn test_long_paragraph_is_hard_split() {
        let splitter = ParagraphSplitter::new(SplitterConfig::new(10, 0).unwrap());
        let output = splitter
            .split_text_with_diagnostics("tiny\n\naaaa bbbb cccc")
            .unwrap();
        assert_eq!(output.chunks, vec!["tiny", "aaaa bbbb", "cccc"]);
        assert!(!output.has_oversize());
    }
}
