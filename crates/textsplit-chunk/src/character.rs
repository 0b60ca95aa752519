//! Fixed-separator splitting.

use tracing::debug;

use textsplit_core::{Result, Segmenter, SplitOutput, SplitterConfig, TextSplitter};

use crate::merge::split_and_merge;

/// Separator used by [`CharacterSplitter::new`].
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Split `text` on a literal separator, dropping empty pieces.
///
/// With `keep_separator` every occurrence stays attached to the front of
/// the piece it introduces. The empty separator splits into characters.
pub(crate) fn split_on_separator<'a>(
    text: &'a str,
    separator: &str,
    keep_separator: bool,
) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    if !keep_separator {
        return text.split(separator).filter(|s| !s.is_empty()).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Segmenter that cuts on one literal separator.
#[derive(Debug, Clone)]
pub struct SeparatorSegmenter {
    separator: String,
    keep_separator: bool,
}

impl SeparatorSegmenter {
    /// Create a segmenter for `separator`.
    pub fn new(separator: impl Into<String>, keep_separator: bool) -> Self {
        Self {
            separator: separator.into(),
            keep_separator,
        }
    }

    /// The literal separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Segmenter for SeparatorSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        split_on_separator(text, &self.separator, self.keep_separator)
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn join_separator(&self) -> &str {
        // Kept separators are already embedded in the fragments.
        if self.keep_separator {
            ""
        } else {
            &self.separator
        }
    }
}

/// Splitter on a single literal separator, without recursion.
pub struct CharacterSplitter {
    config: SplitterConfig,
    segmenter: SeparatorSegmenter,
}

impl CharacterSplitter {
    /// Create a splitter on paragraph breaks (`"\n\n"`).
    pub fn new(config: SplitterConfig) -> Self {
        Self::with_separator(config, DEFAULT_SEPARATOR)
    }

    /// Create a splitter on a custom separator.
    pub fn with_separator(config: SplitterConfig, separator: impl Into<String>) -> Self {
        let segmenter = SeparatorSegmenter::new(separator, config.keep_separator());
        Self { config, segmenter }
    }

    /// The separator this splitter cuts on.
    pub fn separator(&self) -> &str {
        self.segmenter.separator()
    }
}

impl TextSplitter for CharacterSplitter {
    fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn split_text_with_diagnostics(&self, text: &str) -> Result<SplitOutput> {
        if text.trim().is_empty() {
            return Ok(SplitOutput::new());
        }

        let output = split_and_merge(&self.segmenter, text, &self.config);
        debug!(
            "Split {} chars on {:?} into {} chunks",
            text.len(),
            self.separator(),
            output.chunks.len()
        );
        Ok(output)
    }
}
