//! Core domain types for textsplit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ulid::Ulid;

/// Where an oversized chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizeKind {
    /// The merge window already exceeded the size when it was flushed.
    MergedChunk,
    /// A fragment that no finer separator could shrink.
    AtomicFragment,
}

/// Non-fatal report that a chunk exceeds `chunk_size`.
///
/// The oversized content is still emitted; this only tells the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversizeDiagnostic {
    /// Measured size of the oversized content.
    pub size: usize,

    /// Configured `chunk_size`.
    pub limit: usize,

    /// What produced it.
    pub kind: OversizeKind,
}

impl std::fmt::Display for OversizeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            OversizeKind::MergedChunk => "chunk",
            OversizeKind::AtomicFragment => "unsplittable fragment",
        };
        write!(
            f,
            "Created a {} of size {}, which is longer than the specified {}",
            what, self.size, self.limit
        )
    }
}

/// Result of a single split call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutput {
    /// Chunks in source order.
    pub chunks: Vec<String>,

    /// Oversize reports, in the order they were raised.
    pub diagnostics: Vec<OversizeDiagnostic>,
}

impl SplitOutput {
    /// Create an empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another output, keeping order.
    pub fn extend(&mut self, other: SplitOutput) {
        self.chunks.extend(other.chunks);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Whether any chunk was reported oversized.
    pub fn has_oversize(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A chunk wrapped with metadata, ready for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Optional identifier (ULID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Ulid>,

    /// Text content, including any chunk header.
    pub content: String,

    /// Caller metadata plus derived fields such as `loc`.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Line range (`loc.lines.from`, `loc.lines.to`) if present.
    pub fn line_range(&self) -> Option<(u64, u64)> {
        let lines = self.metadata.get("loc")?.get("lines")?;
        Some((lines.get("from")?.as_u64()?, lines.get("to")?.as_u64()?))
    }
}
