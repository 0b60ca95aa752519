//! Token-window splitting.

use std::sync::Arc;

use tracing::debug;

use textsplit_core::{Result, SpecialTokens, SplitOutput, SplitterConfig, TextSplitter, Tokenizer};

/// Splits text into windows of `chunk_size` tokens.
///
/// After the first window each window starts `chunk_overlap` tokens before
/// the previous one ended. Every window is decoded on its own, so a window
/// boundary that falls inside a multi-token character or word may decode to
/// text that differs from the source slice (for example a replacement
/// character for a split UTF-8 sequence). That is a property of sub-word
/// tokenization and is not corrected here.
pub struct TokenSplitter {
    config: SplitterConfig,
    tokenizer: Arc<dyn Tokenizer>,
    allowed_special: SpecialTokens,
    disallowed_special: SpecialTokens,
}

impl TokenSplitter {
    /// Create a token splitter. No special tokens are allowed by default and
    /// all of them are disallowed.
    pub fn new(config: SplitterConfig, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            config,
            tokenizer,
            allowed_special: SpecialTokens::none(),
            disallowed_special: SpecialTokens::All,
        }
    }

    /// Special tokens that may appear in the input.
    pub fn with_allowed_special(mut self, allowed: SpecialTokens) -> Self {
        self.allowed_special = allowed;
        self
    }

    /// Special tokens that make encoding fail.
    pub fn with_disallowed_special(mut self, disallowed: SpecialTokens) -> Self {
        self.disallowed_special = disallowed;
        self
    }
}

impl TextSplitter for TokenSplitter {
    fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn split_text_with_diagnostics(&self, text: &str) -> Result<SplitOutput> {
        if text.trim().is_empty() {
            return Ok(SplitOutput::new());
        }

        let ids = self
            .tokenizer
            .encode(text, &self.allowed_special, &self.disallowed_special)?;

        let window = self.config.chunk_size();
        // chunk_overlap < chunk_size, so the window always advances.
        let step = window - self.config.chunk_overlap();

        let mut output = SplitOutput::new();
        let mut start = 0;
        while start < ids.len() {
            let end = (start + window).min(ids.len());
            let chunk = self.tokenizer.decode(&ids[start..end])?;
            if !chunk.trim().is_empty() {
                output.chunks.push(chunk);
            }
            if end == ids.len() {
                break;
            }
            start += step;
        }

        debug!(
            "Split {} tokens into {} windows",
            ids.len(),
            output.chunks.len()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsplit_core::SplitError;
    use textsplit_tokenize::ByteTokenizer;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TokenSplitter {
        let config = SplitterConfig::new(chunk_size, chunk_overlap).unwrap();
        TokenSplitter::new(config, Arc::new(ByteTokenizer::new()))
    }

    #[test]
    fn test_windows_with_overlap() {
        let chunks = splitter(4, 1).split_text("abcdefghij").unwrap();
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_windows_without_overlap() {
        let chunks = splitter(4, 0).split_text("abcdefghij").unwrap();
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_no_trailing_window_inside_previous() {
        // Ten tokens, windows of six advancing by four: the second window
        // reaches the end, so no third window is produced.
        let chunks = splitter(6, 2).split_text("0123456789").unwrap();
        assert_eq!(chunks, vec!["012345", "456789"]);
    }

    #[test]
    fn test_window_boundary_inside_multibyte_char() {
        // "é" is two byte tokens; a two-token window cuts it in half.
        let chunks = splitter(2, 0).split_text("héllo").unwrap();
        assert_ne!(chunks[0], "hé");
        assert!(chunks[0].contains('\u{FFFD}'));
        assert_eq!(chunks.last().unwrap(), "lo");
    }

    #[test]
    fn test_empty_input() {
        assert!(splitter(4, 0).split_text("").unwrap().is_empty());
        assert!(splitter(4, 0).split_text("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_disallowed_special_token() {
        let tokenizer = Arc::new(ByteTokenizer::with_special_tokens(["<|endoftext|>"]));
        let config = SplitterConfig::new(4, 0).unwrap();
        let splitter = TokenSplitter::new(config.clone(), tokenizer.clone());

        let err = splitter.split_text("hi<|endoftext|>").unwrap_err();
        assert!(matches!(err, SplitError::DisallowedSpecialToken { .. }));

        let splitter = TokenSplitter::new(config, tokenizer)
            .with_allowed_special(SpecialTokens::All);
        let chunks = splitter.split_text("hi<|endoftext|>").unwrap();
        // The special token is a single id, so it shares a window with "hi".
        assert_eq!(chunks, vec!["hi<|endoftext|>"]);
    }
}
