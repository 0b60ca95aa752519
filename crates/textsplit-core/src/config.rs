//! Configuration types for textsplit.
//!
//! [`SplitterConfig`] is the validated, immutable configuration every
//! splitter captures at construction. [`TextsplitConfig`] is the TOML file
//! format the CLI reads, which resolves into a `SplitterConfig`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, SplitError};
use crate::length::LengthMeasure;
use crate::traits::Tokenizer;

/// Default maximum chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Validated splitter configuration.
///
/// Construction fails when `chunk_size` is zero or when
/// `chunk_overlap >= chunk_size`; values are never clamped.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    keep_separator: bool,
    length_measure: LengthMeasure,
}

impl SplitterConfig {
    /// Create a configuration with the default character length measure.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::builder()
            .chunk_size(chunk_size)
            .chunk_overlap(chunk_overlap)
            .build()
    }

    /// Start a builder initialised with the defaults.
    pub fn builder() -> SplitterConfigBuilder {
        SplitterConfigBuilder::default()
    }

    /// Maximum chunk size, in units of the length measure.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Target overlap between consecutive chunks.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Whether separators stay attached to the fragment they introduce.
    pub fn keep_separator(&self) -> bool {
        self.keep_separator
    }

    /// The configured length measure.
    pub fn length_measure(&self) -> &LengthMeasure {
        &self.length_measure
    }

    /// Measure `text` with the configured length measure.
    pub fn measure(&self, text: &str) -> usize {
        self.length_measure.measure(text)
    }

    /// Same configuration with a different size and overlap, re-validated.
    pub fn with_sizes(&self, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        SplitterConfigBuilder {
            chunk_size,
            chunk_overlap,
            keep_separator: self.keep_separator,
            length_measure: self.length_measure.clone(),
        }
        .build()
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: false,
            length_measure: LengthMeasure::chars(),
        }
    }
}

/// Builder for [`SplitterConfig`].
#[derive(Debug, Clone)]
pub struct SplitterConfigBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    keep_separator: bool,
    length_measure: LengthMeasure,
}

impl Default for SplitterConfigBuilder {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: false,
            length_measure: LengthMeasure::chars(),
        }
    }
}

impl SplitterConfigBuilder {
    /// Set the maximum chunk size.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Keep separators attached to the fragment they introduce.
    pub fn keep_separator(mut self, keep_separator: bool) -> Self {
        self.keep_separator = keep_separator;
        self
    }

    /// Set the length measure.
    pub fn length_measure(mut self, length_measure: LengthMeasure) -> Self {
        self.length_measure = length_measure;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<SplitterConfig> {
        if self.chunk_size == 0 {
            return Err(SplitError::invalid_config("chunk_size must be positive"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(SplitterConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            keep_separator: self.keep_separator,
            length_measure: self.length_measure,
        })
    }
}

/// Splitting strategy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One literal separator.
    Character,
    /// Hierarchical separator list.
    #[default]
    Recursive,
    /// Token windows.
    Token,
    /// Sentence boundaries.
    Sentence,
    /// Paragraph boundaries.
    Paragraph,
}

impl Strategy {
    /// All strategies, in display order.
    pub const ALL: [Strategy; 5] = [
        Self::Character,
        Self::Recursive,
        Self::Token,
        Self::Sentence,
        Self::Paragraph,
    ];
}

impl FromStr for Strategy {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "character" | "char" | "fixed" => Ok(Self::Character),
            "recursive" => Ok(Self::Recursive),
            "token" | "tokens" => Ok(Self::Token),
            "sentence" | "sentences" => Ok(Self::Sentence),
            "paragraph" | "paragraphs" => Ok(Self::Paragraph),
            _ => Err(SplitError::UnsupportedStrategy {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Character => "character",
            Self::Recursive => "recursive",
            Self::Token => "token",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        };
        write!(f, "{}", s)
    }
}

/// Length measure selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthKind {
    #[default]
    Chars,
    Bytes,
    Words,
    /// Requires a tokenizer.
    Tokens,
}

impl FromStr for LengthKind {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chars" | "characters" => Ok(Self::Chars),
            "bytes" => Ok(Self::Bytes),
            "words" => Ok(Self::Words),
            "tokens" => Ok(Self::Tokens),
            _ => Err(SplitError::config(format!("Unknown length measure: {}", s))),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextsplitConfig {
    /// Chunking configuration.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Document mapping configuration.
    #[serde(default)]
    pub document: DocumentConfig,
}

/// Chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Splitting strategy.
    #[serde(default)]
    pub strategy: Strategy,

    /// Maximum chunk size.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Keep separators attached to the fragment they introduce.
    #[serde(default)]
    pub keep_separator: bool,

    /// Length measure.
    #[serde(default)]
    pub length: LengthKind,

    /// Language tag selecting a recursive separator table.
    #[serde(default)]
    pub language: Option<String>,

    /// Separator for the character strategy.
    #[serde(default)]
    pub separator: Option<String>,

    /// Custom separator list for the recursive strategy.
    #[serde(default)]
    pub separators: Option<Vec<String>>,

    /// Abbreviations that never end a sentence.
    #[serde(default)]
    pub abbreviations: Option<Vec<String>>,

    /// Regex delimiting paragraphs.
    #[serde(default)]
    pub paragraph_delimiter: Option<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: false,
            length: LengthKind::default(),
            language: None,
            separator: None,
            separators: None,
            abbreviations: None,
            paragraph_delimiter: None,
        }
    }
}

impl ChunkingConfig {
    /// Resolve into a validated [`SplitterConfig`].
    ///
    /// `tokenizer` is required when `length = "tokens"`.
    pub fn splitter_config(&self, tokenizer: Option<Arc<dyn Tokenizer>>) -> Result<SplitterConfig> {
        let length_measure = match self.length {
            LengthKind::Chars => LengthMeasure::chars(),
            LengthKind::Bytes => LengthMeasure::bytes(),
            LengthKind::Words => LengthMeasure::words(),
            LengthKind::Tokens => match tokenizer {
                Some(tokenizer) => LengthMeasure::tokens(tokenizer),
                None => {
                    return Err(SplitError::config(
                        "length = \"tokens\" requires a tokenizer",
                    ))
                }
            },
        };

        SplitterConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .keep_separator(self.keep_separator)
            .length_measure(length_measure)
            .build()
    }
}

/// Document mapping configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Prefix added to every chunk.
    #[serde(default)]
    pub chunk_header: Option<String>,

    /// Extra prefix for continuation chunks.
    #[serde(default)]
    pub chunk_overlap_header: Option<String>,

    /// Add `chunk_overlap_header` to continuation chunks.
    #[serde(default)]
    pub append_chunk_overlap_header: bool,

    /// Assign a ULID to every document.
    #[serde(default)]
    pub assign_ids: bool,

    /// Add a blake3 `content_hash` to the metadata.
    #[serde(default)]
    pub content_hash: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

impl TextsplitConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| SplitError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;
        Ok(config)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("textsplit").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("textsplit.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }
}
