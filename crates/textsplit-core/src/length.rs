//! Pluggable length measures.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::traits::Tokenizer;

type MeasureFn = dyn Fn(&str) -> usize + Send + Sync;

/// Maps a text fragment to the size that `chunk_size` and `chunk_overlap`
/// are interpreted in.
///
/// Cheap to clone; the underlying function is shared.
#[derive(Clone)]
pub struct LengthMeasure {
    name: &'static str,
    measure: Arc<MeasureFn>,
}

impl LengthMeasure {
    /// Count Unicode scalar values (the default).
    pub fn chars() -> Self {
        Self::custom("chars", |s| s.chars().count())
    }

    /// Count UTF-8 bytes.
    pub fn bytes() -> Self {
        Self::custom("bytes", str::len)
    }

    /// Count whitespace-separated words.
    pub fn words() -> Self {
        Self::custom("words", |s| s.split_whitespace().count())
    }

    /// Count tokens produced by `tokenizer`.
    ///
    /// Falls back to character count when the tokenizer rejects a fragment,
    /// so measuring never fails mid-split.
    pub fn tokens(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self::custom("tokens", move |s| match tokenizer.count_tokens(s) {
            Ok(count) => count,
            Err(e) => {
                warn!("Token count failed, using char count: {}", e);
                s.chars().count()
            }
        })
    }

    /// Wrap an arbitrary function.
    pub fn custom<F>(name: &'static str, measure: F) -> Self
    where
        F: Fn(&str) -> usize + Send + Sync + 'static,
    {
        Self {
            name,
            measure: Arc::new(measure),
        }
    }

    /// Measure `text`.
    pub fn measure(&self, text: &str) -> usize {
        (self.measure)(text)
    }

    /// Name used in logs and debug output.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LengthMeasure {
    fn default() -> Self {
        Self::chars()
    }
}

impl fmt::Debug for LengthMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LengthMeasure").field(&self.name).finish()
    }
}
