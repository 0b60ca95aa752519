//! Size-bounded merging of fragments into chunks.
//!
//! Every splitter funnels its fragments through [`merge_splits`]. The window
//! of pending fragments is an index range over the caller's buffer, so
//! carrying overlap into the next chunk never shifts or copies fragments.

use tracing::warn;

use textsplit_core::{OversizeDiagnostic, OversizeKind, Segmenter, SplitOutput, SplitterConfig};

/// Pack ordered fragments into chunks of at most `chunk_size`, joined by
/// `separator`.
///
/// Consecutive chunks share trailing/leading fragments worth up to
/// `chunk_overlap`. Overlap is fragment-granular: whole fragments are carried
/// over, so the actual overlap depends on fragment boundaries. A fragment
/// larger than `chunk_size` becomes its own chunk and is reported in
/// [`SplitOutput::diagnostics`]. Chunks are trimmed and never empty.
pub fn merge_splits<S: AsRef<str>>(
    splits: &[S],
    separator: &str,
    config: &SplitterConfig,
) -> SplitOutput {
    let chunk_size = config.chunk_size();
    let chunk_overlap = config.chunk_overlap();
    let separator_len = config.measure(separator);
    let lengths: Vec<usize> = splits.iter().map(|s| config.measure(s.as_ref())).collect();

    // Separator cost of appending to a window holding `count` fragments.
    let join_cost = |count: usize| if count > 0 { separator_len } else { 0 };

    let mut output = SplitOutput::new();
    let mut start = 0;
    let mut total = 0;

    for (end, &len) in lengths.iter().enumerate() {
        if total + len + join_cost(end - start) > chunk_size {
            if start < end {
                flush(&splits[start..end], separator, total, config, &mut output);
            }

            // Keep at most `chunk_overlap` of the tail, and only as much as
            // still leaves room for the incoming fragment.
            while start < end
                && (total > chunk_overlap || total + len + join_cost(end - start) > chunk_size)
            {
                let dropped = lengths[start] + if end - start > 1 { separator_len } else { 0 };
                total = total.saturating_sub(dropped);
                start += 1;
            }
        }

        total += len + join_cost(end - start);
    }

    if start < splits.len() {
        flush(&splits[start..], separator, total, config, &mut output);
    }

    output
}

/// Segment `text` with `segmenter` and merge the fragments.
pub fn split_and_merge(
    segmenter: &dyn Segmenter,
    text: &str,
    config: &SplitterConfig,
) -> SplitOutput {
    let fragments = segmenter.segment(text);
    merge_splits(&fragments, segmenter.join_separator(), config)
}

/// Join fragments and trim; `None` when nothing but whitespace remains.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S], separator: &str) -> Option<String> {
    let joined = fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(separator);
    let trimmed = joined.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn flush<S: AsRef<str>>(
    window: &[S],
    separator: &str,
    total: usize,
    config: &SplitterConfig,
    output: &mut SplitOutput,
) {
    if total > config.chunk_size() {
        let diagnostic = OversizeDiagnostic {
            size: total,
            limit: config.chunk_size(),
            kind: OversizeKind::MergedChunk,
        };
        warn!("{}", diagnostic);
        output.diagnostics.push(diagnostic);
    }

    if let Some(chunk) = join_fragments(window, separator) {
        output.chunks.push(chunk);
    }
}
