//! Boundary-based splitting shared by the sentence and paragraph splitters.
//!
//! Units are byte ranges of the source. Units longer than the limit are cut
//! at the last whitespace before it, then consecutive units are packed into
//! chunks. A chunk is the source slice from its first unit to its last, so
//! the text between units is kept exactly as written.

use std::ops::Range;

use tracing::{debug, warn};

use textsplit_core::{
    OversizeDiagnostic, OversizeKind, Result, Segmenter, SplitOutput, SplitterConfig, TextSplitter,
};

/// A segmenter whose units can be located in the input.
pub trait SpanSegmenter: Segmenter {
    /// Byte ranges of the units of `text`, in order.
    ///
    /// Every range is non-empty, starts and ends on non-whitespace, and
    /// lies after the previous one.
    fn spans(&self, text: &str) -> Vec<Range<usize>>;
}

/// Trim `range` of `text`; `None` when only whitespace remains.
pub(crate) fn trimmed_span(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let trimmed = slice.trim_start();
    let start = range.start + (slice.len() - trimmed.len());
    let end = start + trimmed.trim_end().len();
    (start < end).then_some(start..end)
}

/// Splitter that packs the units produced by a boundary segmenter.
pub struct BoundarySplitter<S> {
    config: SplitterConfig,
    segmenter: S,
}

impl<S: SpanSegmenter> BoundarySplitter<S> {
    /// Create a splitter around `segmenter`.
    pub fn with_segmenter(config: SplitterConfig, segmenter: S) -> Self {
        Self { config, segmenter }
    }

    /// The segmenter in use.
    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }
}

impl<S: SpanSegmenter> TextSplitter for BoundarySplitter<S> {
    fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn split_text_with_diagnostics(&self, text: &str) -> Result<SplitOutput> {
        let mut output = SplitOutput::new();
        let mut units = Vec::new();
        for span in self.segmenter.spans(text) {
            if self.config.measure(&text[span.clone()]) > self.config.chunk_size() {
                units.extend(hard_split(text, span, &self.config, &mut output));
            } else {
                units.push(span);
            }
        }

        output.chunks = pack_spans(text, &units, &self.config);
        debug!(
            "Packed {} boundary units into {} chunks",
            units.len(),
            output.chunks.len()
        );

        Ok(output)
    }
}

/// Pack consecutive units into chunks of at most `chunk_size`.
///
/// After a chunk is emitted, its trailing units worth up to `chunk_overlap`
/// start the next one, as long as the incoming unit still fits beside them.
/// Only a single unit can exceed the limit, and [`hard_split`] has already
/// reported it.
pub(crate) fn pack_spans(
    text: &str,
    units: &[Range<usize>],
    config: &SplitterConfig,
) -> Vec<String> {
    let measure = |window: Range<usize>| config.measure(covering(text, &units[window]));
    let mut chunks = Vec::new();
    let mut start = 0;

    for next in 0..units.len() {
        if start < next && measure(start..next + 1) > config.chunk_size() {
            chunks.push(covering(text, &units[start..next]).to_string());

            while start < next
                && (measure(start..next) > config.chunk_overlap()
                    || measure(start..next + 1) > config.chunk_size())
            {
                start += 1;
            }
        }
    }

    if start < units.len() {
        chunks.push(covering(text, &units[start..]).to_string());
    }
    chunks
}

/// Source slice from the first unit to the last; `units` is non-empty.
fn covering<'a>(text: &'a str, units: &[Range<usize>]) -> &'a str {
    &text[units[0].start..units[units.len() - 1].end]
}

/// Cut the unit at `span` into pieces within `chunk_size`, preferring the
/// last whitespace before the limit.
///
/// Pieces are trimmed ranges of `text`. A single character that alone
/// exceeds the limit becomes its own piece and is reported in `output`.
pub(crate) fn hard_split(
    text: &str,
    span: Range<usize>,
    config: &SplitterConfig,
    output: &mut SplitOutput,
) -> Vec<Range<usize>> {
    let limit = config.chunk_size();
    let mut pieces = Vec::new();
    let Some(unit) = trimmed_span(text, span) else {
        return pieces;
    };
    let (mut start, end) = (unit.start, unit.end);

    while start < end && config.measure(&text[start..end]) > limit {
        let rest = &text[start..end];
        // End offsets of every character prefix; measures grow along them.
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        let fitting = ends.partition_point(|&e| config.measure(&rest[..e]) <= limit);

        let cut = if fitting == 0 {
            let first = ends[0];
            let diagnostic = OversizeDiagnostic {
                size: config.measure(&rest[..first]),
                limit,
                kind: OversizeKind::AtomicFragment,
            };
            warn!("{}", diagnostic);
            output.diagnostics.push(diagnostic);
            first
        } else {
            let fit = ends[fitting - 1];
            if rest[fit..].starts_with(char::is_whitespace) {
                fit
            } else {
                match rest[..fit].rfind(char::is_whitespace) {
                    Some(ws) if ws > 0 => ws,
                    _ => fit,
                }
            }
        };

        let piece = rest[..cut].trim_end();
        if !piece.is_empty() {
            pieces.push(start..start + piece.len());
        }
        let tail = &rest[cut..];
        start += cut + (tail.len() - tail.trim_start().len());
    }

    if start < end {
        pieces.push(start..end);
    }
    pieces
}
