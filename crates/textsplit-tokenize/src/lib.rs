//! textsplit-tokenize - Tokenizer backends
//!
//! Implementations of the [`Tokenizer`] capability used by token-window
//! splitting and token length measures.
//!
//! - [`HfTokenizer`]: wraps a HuggingFace `tokenizer.json`.
//! - [`ByteTokenizer`]: one token per UTF-8 byte, no model files needed.

mod byte;
mod hf;

pub use byte::{ByteTokenizer, SPECIAL_TOKEN_BASE};
pub use hf::HfTokenizer;

// Re-export the Tokenizer trait for convenience
pub use textsplit_core::{SpecialTokens, Tokenizer};
