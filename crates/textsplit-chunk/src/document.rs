//! Wrapping chunks into documents with line-range metadata.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use ulid::Ulid;

use textsplit_core::{Document, DocumentConfig, Result, SplitError, TextSplitter};

/// Header prefixed to continuation chunks by default.
pub const DEFAULT_CHUNK_OVERLAP_HEADER: &str = "(cont'd) ";

/// Per-chunk header options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeaderOptions {
    /// Prefix for every chunk.
    pub chunk_header: String,
    /// Extra prefix for every chunk after the first of a text.
    pub chunk_overlap_header: String,
    /// Whether `chunk_overlap_header` is used at all.
    pub append_chunk_overlap_header: bool,
}

impl Default for ChunkHeaderOptions {
    fn default() -> Self {
        Self {
            chunk_header: String::new(),
            chunk_overlap_header: DEFAULT_CHUNK_OVERLAP_HEADER.to_string(),
            append_chunk_overlap_header: false,
        }
    }
}

/// Turns texts into chunk documents using a splitter.
///
/// Every document gets `loc.lines.from` and `loc.lines.to` (1-based,
/// inclusive) in its metadata. Lines are found by locating each chunk in the
/// source with a literal search that starts just past the previous chunk's
/// position, so repeated content maps to successive occurrences.
pub struct DocumentMapper<'a> {
    splitter: &'a dyn TextSplitter,
    headers: ChunkHeaderOptions,
    assign_ids: bool,
    content_hash: bool,
}

impl<'a> DocumentMapper<'a> {
    pub fn new(splitter: &'a dyn TextSplitter) -> Self {
        Self {
            splitter,
            headers: ChunkHeaderOptions::default(),
            assign_ids: false,
            content_hash: false,
        }
    }

    /// Build a mapper from the `[document]` config section.
    pub fn from_config(splitter: &'a dyn TextSplitter, config: &DocumentConfig) -> Self {
        let headers = ChunkHeaderOptions {
            chunk_header: config.chunk_header.clone().unwrap_or_default(),
            chunk_overlap_header: config
                .chunk_overlap_header
                .clone()
                .unwrap_or_else(|| DEFAULT_CHUNK_OVERLAP_HEADER.to_string()),
            append_chunk_overlap_header: config.append_chunk_overlap_header,
        };

        Self::new(splitter)
            .with_headers(headers)
            .with_ids(config.assign_ids)
            .with_content_hash(config.content_hash)
    }

    pub fn with_headers(mut self, headers: ChunkHeaderOptions) -> Self {
        self.headers = headers;
        self
    }

    /// Assign a fresh ULID to every document.
    pub fn with_ids(mut self, assign_ids: bool) -> Self {
        self.assign_ids = assign_ids;
        self
    }

    /// Record a blake3 hash of each chunk under `content_hash`.
    pub fn with_content_hash(mut self, content_hash: bool) -> Self {
        self.content_hash = content_hash;
        self
    }

    /// Split each text and wrap its chunks into documents.
    ///
    /// `metadatas` is either empty or holds one map per text; each map is
    /// copied onto every chunk of its text.
    pub fn create_documents<S: AsRef<str>>(
        &self,
        texts: &[S],
        metadatas: &[HashMap<String, Value>],
    ) -> Result<Vec<Document>> {
        if !metadatas.is_empty() && metadatas.len() != texts.len() {
            return Err(SplitError::invalid_config(format!(
                "got {} metadata entries for {} texts",
                metadatas.len(),
                texts.len()
            )));
        }

        let empty = HashMap::new();
        let mut documents = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            let chunks = self.splitter.split_text(text)?;
            let metadata = metadatas.get(i).unwrap_or(&empty);
            documents.extend(self.map_chunks(text, &chunks, metadata));
        }

        debug!(
            "Created {} documents from {} texts",
            documents.len(),
            texts.len()
        );
        Ok(documents)
    }

    /// Re-split existing documents, keeping their metadata.
    pub fn split_documents(&self, documents: &[Document]) -> Result<Vec<Document>> {
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let metadatas: Vec<HashMap<String, Value>> =
            documents.iter().map(|d| d.metadata.clone()).collect();
        self.create_documents(&texts, &metadatas)
    }

    /// Wrap the chunks of `text` into documents.
    pub fn map_chunks<S: AsRef<str>>(
        &self,
        text: &str,
        chunks: &[S],
        metadata: &HashMap<String, Value>,
    ) -> Vec<Document> {
        let mut documents = Vec::with_capacity(chunks.len());
        let mut line = 1usize;
        let mut prev: Option<(usize, usize)> = None;

        for (n, chunk) in chunks.iter().enumerate() {
            let chunk = chunk.as_ref();
            let search_from = prev.map_or(0, |(index, _)| next_char_boundary(text, index));
            let found = text
                .get(search_from..)
                .and_then(|rest| rest.find(chunk))
                .map(|rel| search_from + rel);

            match (found, prev) {
                (Some(index), None) => line += count_newlines(&text[..index]),
                (Some(index), Some((prev_index, prev_len))) => {
                    let prev_end = prev_index + prev_len;
                    if prev_end < index {
                        line += count_newlines(&text[prev_end..index]);
                    } else if prev_end > index {
                        line = line.saturating_sub(count_newlines(&text[index..prev_end]));
                    }
                }
                (None, _) => warn!("Chunk {} not found in source text; line numbers may drift", n),
            }

            let newlines = count_newlines(chunk);
            let mut content = self.headers.chunk_header.clone();
            if n > 0 && self.headers.append_chunk_overlap_header {
                content.push_str(&self.headers.chunk_overlap_header);
            }
            content.push_str(chunk);

            documents.push(Document {
                id: self.assign_ids.then(Ulid::new),
                content,
                metadata: self.chunk_metadata(metadata, chunk, line, line + newlines),
            });

            line += newlines;
            if let Some(index) = found {
                prev = Some((index, chunk.len()));
            }
        }

        documents
    }

    fn chunk_metadata(
        &self,
        base: &HashMap<String, Value>,
        chunk: &str,
        from: usize,
        to: usize,
    ) -> HashMap<String, Value> {
        let mut metadata = base.clone();

        let mut loc = match base.get("loc") {
            Some(Value::Object(loc)) => loc.clone(),
            _ => Map::new(),
        };
        loc.insert("lines".to_string(), json!({ "from": from, "to": to }));
        metadata.insert("loc".to_string(), Value::Object(loc));

        if self.content_hash {
            let hash = blake3::hash(chunk.as_bytes());
            metadata.insert(
                "content_hash".to_string(),
                Value::String(hex::encode(hash.as_bytes())),
            );
        }

        metadata
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map_or(text.len(), |c| index + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterSplitter;
    use crate::paragraph::ParagraphSplitter;
    use crate::sentence::SentenceSplitter;
    use textsplit_core::SplitterConfig;

    fn line_splitter(chunk_size: usize, chunk_overlap: usize) -> CharacterSplitter {
        CharacterSplitter::with_separator(
            SplitterConfig::new(chunk_size, chunk_overlap).unwrap(),
            "\n",
        )
    }

    #[test]
    fn test_line_ranges() {
        let splitter = line_splitter(11, 0);
        let mapper = DocumentMapper::new(&splitter);

        let docs = mapper
            .create_documents(&["line1\nline2\nline3\nline4"], &[])
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "line1\nline2");
        assert_eq!(docs[0].line_range(), Some((1, 2)));
        assert_eq!(docs[1].content, "line3\nline4");
        assert_eq!(docs[1].line_range(), Some((3, 4)));
    }

    #[test]
    fn test_line_ranges_with_overlap() {
        let splitter = line_splitter(3, 1);
        let mapper = DocumentMapper::new(&splitter);

        let docs = mapper.create_documents(&["a\nb\nc\nd"], &[]).unwrap();
        let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["a\nb", "b\nc", "c\nd"]);

        let ranges: Vec<_> = docs.iter().filter_map(Document::line_range).collect();
        assert_eq!(ranges, vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_leading_blank_lines_shift_first_chunk() {
        let splitter = line_splitter(100, 0);
        let mapper = DocumentMapper::new(&splitter);

        let docs = mapper.create_documents(&["\n\nhello"], &[]).unwrap();
        assert_eq!(docs[0].content, "hello");
        assert_eq!(docs[0].line_range(), Some((3, 3)));
    }

    #[test]
    fn test_sentence_chunks_span_source_lines() {
        let splitter = SentenceSplitter::new(SplitterConfig::new(100, 0).unwrap());
        let mapper = DocumentMapper::new(&splitter);
        let text = "One.\nTwo.\nThree.";

        let docs = mapper.create_documents(&[text], &[]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, text);
        assert_eq!(docs[0].line_range(), Some((1, 3)));

        let splitter = SentenceSplitter::new(SplitterConfig::new(10, 0).unwrap());
        let docs = DocumentMapper::new(&splitter)
            .create_documents(&[text], &[])
            .unwrap();
        let ranges: Vec<_> = docs.iter().filter_map(Document::line_range).collect();
        assert_eq!(ranges, vec![(1, 2), (3, 3)]);
    }

    #[test]
    fn test_paragraph_chunks_span_source_lines() {
        let splitter = ParagraphSplitter::new(SplitterConfig::new(100, 0).unwrap());
        let mapper = DocumentMapper::new(&splitter);
        let text = "p1\n\n\n\np2 line\nmore\n\n\np3";

        let docs = mapper.create_documents(&[text], &[]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, text);
        assert_eq!(docs[0].line_range(), Some((1, 9)));

        let splitter = ParagraphSplitter::new(SplitterConfig::new(12, 4).unwrap());
        let docs = DocumentMapper::new(&splitter)
            .create_documents(&[text], &[])
            .unwrap();
        let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["p1", "p2 line\nmore", "p3"]);
        let ranges: Vec<_> = docs.iter().filter_map(Document::line_range).collect();
        assert_eq!(ranges, vec![(1, 1), (5, 6), (9, 9)]);
    }

    #[test]
    fn test_repeated_content_maps_to_successive_occurrences() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::new(&splitter);
        let docs = mapper.map_chunks("ab\nab\nab", &["ab", "ab", "ab"], &HashMap::new());

        let ranges: Vec<_> = docs.iter().filter_map(Document::line_range).collect();
        assert_eq!(ranges, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_headers() {
        let splitter = line_splitter(3, 1);
        let mapper = DocumentMapper::new(&splitter).with_headers(ChunkHeaderOptions {
            chunk_header: "H: ".to_string(),
            chunk_overlap_header: "(cont'd) ".to_string(),
            append_chunk_overlap_header: true,
        });

        let docs = mapper.create_documents(&["a\nb\nc"], &[]).unwrap();
        assert_eq!(docs[0].content, "H: a\nb");
        assert_eq!(docs[1].content, "H: (cont'd) b\nc");
    }

    #[test]
    fn test_metadata_is_copied_and_loc_merged() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::new(&splitter);

        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), json!("notes.txt"));
        metadata.insert("loc".to_string(), json!({ "page": 7 }));

        let docs = mapper.create_documents(&["a\nb\nc\nd"], &[metadata]).unwrap();
        assert_eq!(docs.len(), 2);
        for doc in &docs {
            assert_eq!(doc.metadata["source"], "notes.txt");
            assert_eq!(doc.metadata["loc"]["page"], 7);
            assert!(doc.metadata["loc"]["lines"].is_object());
            assert!(doc.id.is_none());
        }
    }

    #[test]
    fn test_metadata_count_mismatch() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::new(&splitter);

        let err = mapper
            .create_documents(&["a", "b"], &[HashMap::new()])
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_ids_and_content_hash() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::from_config(
            &splitter,
            &DocumentConfig {
                assign_ids: true,
                content_hash: true,
                ..Default::default()
            },
        );

        let docs = mapper.create_documents(&["a\nb\nc\nd"], &[]).unwrap();
        assert!(docs.iter().all(|d| d.id.is_some()));
        assert_ne!(docs[0].id, docs[1].id);

        let expected = hex::encode(blake3::hash(b"a\nb").as_bytes());
        assert_eq!(docs[0].metadata["content_hash"], expected.as_str());
    }

    #[test]
    fn test_split_documents_keeps_metadata() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::new(&splitter);

        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), json!("a.txt"));
        let input = vec![Document::new("a\nb\nc\nd").with_metadata(metadata)];

        let docs = mapper.split_documents(&input).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].metadata["source"], "a.txt");
        assert_eq!(docs[1].line_range(), Some((3, 4)));
    }

    #[test]
    fn test_empty_text_has_no_documents() {
        let splitter = line_splitter(3, 0);
        let mapper = DocumentMapper::new(&splitter);
        assert!(mapper.create_documents(&[""], &[]).unwrap().is_empty());
    }
}
