//! textsplit-chunk - Chunking strategies
//!
//! This crate splits text into ordered, size-bounded chunks with optional
//! overlap, and maps chunks back to line ranges in their source.
//!
//! # Splitters
//!
//! - [`CharacterSplitter`]: Splits on one literal separator.
//!
//! - [`RecursiveSplitter`]: Tries progressively finer separators
//!   (paragraphs, lines, words, characters) until pieces fit. Separator
//!   tables for common languages live in [`Language`].
//!
//! - [`TokenSplitter`]: Fixed windows over token ids.
//!
//! - [`SentenceSplitter`] / [`ParagraphSplitter`]: Pack sentences or
//!   paragraphs up to the size limit.
//!
//! The character and recursive splitters pack fragments with
//! [`merge_splits`]. The sentence and paragraph splitters pack byte ranges
//! of the source, so their chunks are verbatim source slices.
//!
//! # Example
//!
//! ```rust
//! use textsplit_chunk::{RecursiveSplitter, SplitterConfig, TextSplitter};
//!
//! let config = SplitterConfig::new(20, 0).unwrap();
//! let splitter = RecursiveSplitter::new(config);
//! let chunks = splitter.split_text("Hello world.\n\nGoodbye world.").unwrap();
//! assert_eq!(chunks, vec!["Hello world.", "Goodbye world."]);
//! ```

mod boundary;
mod character;
mod document;
mod language;
mod merge;
mod paragraph;
mod recursive;
mod sentence;
mod strategy;
mod token;

pub use boundary::{BoundarySplitter, SpanSegmenter};
pub use character::{CharacterSplitter, SeparatorSegmenter, DEFAULT_SEPARATOR};
pub use document::{ChunkHeaderOptions, DocumentMapper, DEFAULT_CHUNK_OVERLAP_HEADER};
pub use language::{Language, DEFAULT_SEPARATORS};
pub use merge::{join_fragments, merge_splits, split_and_merge};
pub use paragraph::{ParagraphSegmenter, ParagraphSplitter, DEFAULT_PARAGRAPH_DELIMITER};
pub use recursive::{resolve, RecursiveSplitter};
pub use sentence::{SentenceSegmenter, SentenceSplitter, DEFAULT_ABBREVIATIONS};
pub use strategy::build_splitter;
pub use token::TokenSplitter;

// Re-export types for convenience
pub use textsplit_core::{
    Document, OversizeDiagnostic, OversizeKind, Segmenter, SplitOutput, SplitterConfig,
    TextSplitter,
};
