//! HuggingFace `tokenizers` adapter.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use textsplit_core::{Result, SpecialTokens, SplitError, Tokenizer};

/// Tokenizer backed by a HuggingFace `tokenizer.json`.
///
/// Special tokens are the model's added tokens flagged `special`. The
/// backend always matches added tokens it sees in the input, so a special
/// token that is neither allowed nor disallowed is still encoded as its
/// special id.
pub struct HfTokenizer {
    tokenizer: Arc<tokenizers::Tokenizer>,
    special_tokens: Vec<String>,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading tokenizer from {:?}", path);

        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| SplitError::tokenizer(format!("Failed to load tokenizer: {}", e)))?;
        Ok(Self::new(tokenizer))
    }

    /// Parse a tokenizer from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let tokenizer: tokenizers::Tokenizer = json
            .parse()
            .map_err(|e| SplitError::tokenizer(format!("Failed to parse tokenizer: {}", e)))?;
        Ok(Self::new(tokenizer))
    }

    /// Wrap an already constructed tokenizer.
    pub fn new(tokenizer: tokenizers::Tokenizer) -> Self {
        let mut special: Vec<(u32, String)> = tokenizer
            .get_added_tokens_decoder()
            .into_iter()
            .filter(|(_, token)| token.special)
            .map(|(id, token)| (id, token.content))
            .collect();
        special.sort();

        let special_tokens: Vec<String> = special.into_iter().map(|(_, content)| content).collect();
        debug!(
            "Tokenizer loaded (vocab_size={}, special_tokens={})",
            tokenizer.get_vocab_size(true),
            special_tokens.len()
        );

        Self {
            tokenizer: Arc::new(tokenizer),
            special_tokens,
        }
    }

    /// Special tokens known to the model, by id.
    pub fn special_tokens(&self) -> &[String] {
        &self.special_tokens
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(
        &self,
        text: &str,
        allowed_special: &SpecialTokens,
        disallowed_special: &SpecialTokens,
    ) -> Result<Vec<u32>> {
        if let Some(token) = self.special_tokens.iter().find(|token| {
            text.contains(token.as_str())
                && !allowed_special.contains(token)
                && disallowed_special.contains(token)
        }) {
            return Err(SplitError::DisallowedSpecialToken {
                token: token.clone(),
            });
        }

        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| SplitError::tokenizer(format!("Tokenization failed: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, false)
            .map_err(|e| SplitError::tokenizer(format!("Decoding failed: {}", e)))
    }
}
