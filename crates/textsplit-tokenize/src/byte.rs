//! Byte-level tokenizer with no model files.

use textsplit_core::{Result, SpecialTokens, SplitError, Tokenizer};

/// First id assigned to special tokens; ids below it are raw bytes.
pub const SPECIAL_TOKEN_BASE: u32 = 256;

/// A tokenizer whose tokens are UTF-8 bytes.
///
/// Special tokens get ids starting at [`SPECIAL_TOKEN_BASE`] in registration
/// order. Decoding is lossy: a window that cuts a multi-byte character in
/// half decodes to U+FFFD, the same kind of boundary mismatch sub-word
/// tokenizers produce.
#[derive(Debug, Clone, Default)]
pub struct ByteTokenizer {
    special_tokens: Vec<String>,
}

impl ByteTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer that knows the given special tokens.
    pub fn with_special_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            special_tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    /// Registered special tokens.
    pub fn special_tokens(&self) -> &[String] {
        &self.special_tokens
    }

    /// Earliest special token at or after `pos`, preferring the longest on ties.
    fn next_special(&self, text: &str, pos: usize) -> Option<(usize, usize)> {
        self.special_tokens
            .iter()
            .enumerate()
            .filter_map(|(idx, token)| text[pos..].find(token.as_str()).map(|rel| (pos + rel, idx)))
            .min_by(|a, b| {
                a.0.cmp(&b.0).then_with(|| {
                    self.special_tokens[b.1]
                        .len()
                        .cmp(&self.special_tokens[a.1].len())
                })
            })
    }
}

impl Tokenizer for ByteTokenizer {
    fn encode(
        &self,
        text: &str,
        allowed_special: &SpecialTokens,
        disallowed_special: &SpecialTokens,
    ) -> Result<Vec<u32>> {
        let mut ids = Vec::with_capacity(text.len());
        let mut pos = 0;

        while let Some((start, idx)) = self.next_special(text, pos) {
            let token = &self.special_tokens[idx];
            ids.extend(text[pos..start].bytes().map(u32::from));

            if allowed_special.contains(token) {
                ids.push(SPECIAL_TOKEN_BASE + idx as u32);
            } else if disallowed_special.contains(token) {
                return Err(SplitError::DisallowedSpecialToken {
                    token: token.clone(),
                });
            } else {
                ids.extend(token.bytes().map(u32::from));
            }
            pos = start + token.len();
        }

        ids.extend(text[pos..].bytes().map(u32::from));
        Ok(ids)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut bytes = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Ok(byte) = u8::try_from(id) {
                bytes.push(byte);
                continue;
            }
            let token = usize::try_from(id - SPECIAL_TOKEN_BASE)
                .ok()
                .and_then(|idx| self.special_tokens.get(idx))
                .ok_or_else(|| SplitError::tokenizer(format!("Unknown token id: {}", id)))?;
            bytes.extend_from_slice(token.as_bytes());
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
