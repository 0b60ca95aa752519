//! Core traits defining the interfaces between components.

use crate::config::SplitterConfig;
use crate::error::Result;
use crate::types::SplitOutput;

/// Segmentation strategy.
///
/// Produces the ordered raw fragments that the merger packs into chunks.
/// Implementations never look at chunk sizes.
pub trait Segmenter: Send + Sync {
    /// Split `text` into ordered, non-empty fragments.
    fn segment(&self, text: &str) -> Vec<String>;

    /// Separator that reconnects two consecutive fragments when merging.
    fn join_separator(&self) -> &str;
}

/// A configured text splitter.
///
/// Splitters are immutable once built, so one instance can serve concurrent
/// callers from several threads.
pub trait TextSplitter: Send + Sync {
    /// Configuration captured at construction.
    fn config(&self) -> &SplitterConfig;

    /// Split text into chunks, returning oversize diagnostics alongside.
    fn split_text_with_diagnostics(&self, text: &str) -> Result<SplitOutput>;

    /// Split text into chunks.
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.split_text_with_diagnostics(text)?.chunks)
    }
}

/// Which special tokens a tokenizer call may see in its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialTokens {
    /// Every special token known to the tokenizer.
    All,
    /// Only the listed tokens.
    Only(Vec<String>),
}

impl SpecialTokens {
    /// The empty set.
    pub fn none() -> Self {
        Self::Only(Vec::new())
    }

    /// Check whether `token` belongs to the set.
    pub fn contains(&self, token: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(tokens) => tokens.iter().any(|t| t == token),
        }
    }
}

/// Tokenizer capability used by token-window splitting and token length
/// measures.
///
/// Encoding must be deterministic and round-trip stable for text without
/// special tokens. A special token that appears in the text, is not in
/// `allowed_special` and is in `disallowed_special` makes `encode` fail.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(
        &self,
        text: &str,
        allowed_special: &SpecialTokens,
        disallowed_special: &SpecialTokens,
    ) -> Result<Vec<u32>>;

    /// Decode token ids back into text.
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Count tokens using the default special token policy.
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self
            .encode(text, &SpecialTokens::none(), &SpecialTokens::All)?
            .len())
    }
}
