//! Recursive text splitter.
//!
//! Splits text on the most structural separator present, merges the pieces
//! that fit, and retries the pieces that don't with the next, finer
//! separator until chunks fit within the size limit.

use tracing::{debug, trace, warn};

use textsplit_core::{
    OversizeDiagnostic, OversizeKind, Result, SplitOutput, SplitterConfig, TextSplitter,
};

use crate::character::split_on_separator;
use crate::language::{Language, DEFAULT_SEPARATORS};
use crate::merge::merge_splits;

/// Recursive splitter over a prioritised separator list.
///
/// The default list tries, in order:
/// 1. Double newline (paragraph breaks)
/// 2. Single newline
/// 3. Space (word boundaries)
/// 4. Character (last resort)
pub struct RecursiveSplitter {
    config: SplitterConfig,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter with the default separators.
    pub fn new(config: SplitterConfig) -> Self {
        Self::with_separators(config, DEFAULT_SEPARATORS.iter().copied())
    }

    /// Create a splitter with a custom separator list.
    ///
    /// End the list with `""` to guarantee character-level fallback;
    /// without it, pieces that no separator can shrink are emitted as-is.
    pub fn with_separators<I, S>(config: SplitterConfig, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config,
            separators: separators.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a splitter using a language's separator table.
    pub fn for_language(config: SplitterConfig, language: Language) -> Self {
        Self::with_separators(config, language.separators().iter().copied())
    }

    /// Create a splitter from a language tag such as `"python"`.
    pub fn from_language_tag(config: SplitterConfig, tag: &str) -> Result<Self> {
        Ok(Self::for_language(config, tag.parse()?))
    }

    /// The separator list in priority order.
    pub fn separators(&self) -> &[String] {
        &self.separators
    }
}

impl TextSplitter for RecursiveSplitter {
    fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn split_text_with_diagnostics(&self, text: &str) -> Result<SplitOutput> {
        if text.trim().is_empty() {
            return Ok(SplitOutput::new());
        }

        let output = resolve(text, &self.separators, &self.config);
        debug!(
            "Recursively split {} chars into {} chunks ({} oversize)",
            text.len(),
            output.chunks.len(),
            output.diagnostics.len()
        );
        Ok(output)
    }
}

/// Recursively split `text` with `separators`, merging pieces that fit.
pub fn resolve<S: AsRef<str>>(
    text: &str,
    separators: &[S],
    config: &SplitterConfig,
) -> SplitOutput {
    let mut output = SplitOutput::new();
    resolve_into(text, separators, config, &mut output);
    output
}

fn resolve_into<S: AsRef<str>>(
    text: &str,
    separators: &[S],
    config: &SplitterConfig,
    output: &mut SplitOutput,
) {
    let (separator, finer) = select_separator(text, separators);
    trace!(
        "Splitting {} chars on {:?} ({} finer separators)",
        text.len(),
        separator,
        finer.map_or(0, <[S]>::len)
    );

    let join = if config.keep_separator() { "" } else { separator };
    let mut good: Vec<&str> = Vec::new();

    for fragment in split_on_separator(text, separator, config.keep_separator()) {
        let size = config.measure(fragment);
        if size < config.chunk_size() {
            good.push(fragment);
            continue;
        }

        if !good.is_empty() {
            output.extend(merge_splits(&good, join, config));
            good.clear();
        }

        match finer {
            Some(finer) => resolve_into(fragment, finer, config, output),
            None => emit_atomic(fragment, size, config, output),
        }
    }

    if !good.is_empty() {
        output.extend(merge_splits(&good, join, config));
    }
}

/// Pick the separator for `text` and the finer ones to fall back on.
///
/// `""` is taken as soon as it is reached and has no fallback. Otherwise
/// the first separator present in `text` wins; if none is, the last one is
/// used without fallback.
fn select_separator<'s, S: AsRef<str>>(
    text: &str,
    separators: &'s [S],
) -> (&'s str, Option<&'s [S]>) {
    for (i, separator) in separators.iter().enumerate() {
        let separator = separator.as_ref();
        if separator.is_empty() {
            return (separator, None);
        }
        if text.contains(separator) {
            let finer = &separators[i + 1..];
            return (separator, if finer.is_empty() { None } else { Some(finer) });
        }
    }

    (separators.last().map_or("", AsRef::as_ref), None)
}

/// Emit a fragment no finer separator can shrink.
fn emit_atomic(fragment: &str, size: usize, config: &SplitterConfig, output: &mut SplitOutput) {
    if fragment.trim().is_empty() {
        return;
    }

    if size > config.chunk_size() {
        let diagnostic = OversizeDiagnostic {
            size,
            limit: config.chunk_size(),
            kind: OversizeKind::AtomicFragment,
        };
        warn!("{}", diagnostic);
        output.diagnostics.push(diagnostic);
    }

    output.chunks.push(fragment.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsplit_core::LengthMeasure;

    fn config(chunk_size: usize, chunk_overlap: usize) -> SplitterConfig {
        SplitterConfig::new(chunk_size, chunk_overlap).unwrap()
    }

    #[test]
    fn test_simple_chunk() {
        let splitter = RecursiveSplitter::new(config(100, 0));
        let text = "Hello world. This is a test.";

        let chunks = splitter.split_text(text).unwrap();
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_paragraph_split() {
        let splitter = RecursiveSplitter::new(config(50, 10));
        let text = "This is a paragraph.\n\nThis is another paragraph.\n\nAnd a third one.";

        let chunks = splitter.split_text(text).unwrap();
        assert_eq!(
            chunks,
            vec![
                "This is a paragraph.\n\nThis is another paragraph.",
                "And a third one."
            ]
        );
    }

    #[test]
    fn test_oversized_paragraph_falls_back_to_words() {
        let splitter = RecursiveSplitter::new(config(20, 0));
        let text = "short para\n\nthis paragraph is definitely too long";

        let chunks = splitter.split_text(text).unwrap();
        assert_eq!(
            chunks,
            vec!["short para", "this paragraph is", "definitely too long"]
        );
    }

    #[test]
    fn test_character_fallback() {
        let splitter = RecursiveSplitter::new(config(4, 0));

        let output = splitter.split_text_with_diagnostics("abcdefghij").unwrap();
        assert_eq!(output.chunks, vec!["abcd", "efgh", "ij"]);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_separator_selected_when_reached() {
        let splitter = RecursiveSplitter::with_separators(config(2, 0), ["zzz", ""]);
        let chunks = splitter.split_text("abc").unwrap();
        assert_eq!(chunks, vec!["ab", "c"]);
    }

    #[test]
    fn test_oversized_fragment_without_fallback() {
        let splitter = RecursiveSplitter::with_separators(config(100, 0), ["\n"]);
        let text = "x".repeat(500);

        let output = splitter.split_text_with_diagnostics(&text).unwrap();
        assert_eq!(output.chunks, vec![text]);
        assert_eq!(
            output.diagnostics,
            vec![OversizeDiagnostic {
                size: 500,
                limit: 100,
                kind: OversizeKind::AtomicFragment,
            }]
        );
    }

    #[test]
    fn test_fragment_exactly_at_size_is_not_oversize() {
        let splitter = RecursiveSplitter::with_separators(config(5, 0), [" "]);

        let output = splitter.split_text_with_diagnostics("abcde fg").unwrap();
        assert_eq!(output.chunks, vec!["abcde", "fg"]);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_keep_separator_attaches_to_following_fragment() {
        let keep = SplitterConfig::builder()
            .chunk_size(8)
            .chunk_overlap(0)
            .keep_separator(true)
            .build()
            .unwrap();
        let splitter = RecursiveSplitter::with_separators(keep, [".", ""]);
        assert_eq!(
            splitter.split_text("one.two.three").unwrap(),
            vec!["one.two", ".three"]
        );

        let splitter = RecursiveSplitter::with_separators(config(8, 0), [".", ""]);
        assert_eq!(
            splitter.split_text("one.two.three").unwrap(),
            vec!["one.two", "three"]
        );
    }

    #[test]
    fn test_python_separators() {
        let keep = SplitterConfig::builder()
            .chunk_size(40)
            .chunk_overlap(0)
            .keep_separator(true)
            .build()
            .unwrap();
        let splitter = RecursiveSplitter::for_language(keep, Language::Python);
        let code = "def hello():\n    print('hi')\n\ndef world():\n    print('world')";

        let chunks = splitter.split_text(code).unwrap();
        assert_eq!(
            chunks,
            vec![
                "def hello():\n    print('hi')",
                "def world():\n    print('world')"
            ]
        );
    }

    #[test]
    fn test_unknown_language_tag() {
        let result = RecursiveSplitter::from_language_tag(config(100, 0), "klingon");
        assert!(result.is_err());
    }

    #[test]
    fn test_word_counter() {
        // Custom measure: one unit per word.
        let config = SplitterConfig::builder()
            .chunk_size(5)
            .chunk_overlap(0)
            .length_measure(LengthMeasure::words())
            .build()
            .unwrap();
        let splitter = RecursiveSplitter::new(config);

        let text = "one two three four five six seven eight nine ten";
        let chunks = splitter.split_text(text).unwrap();
        assert_eq!(
            chunks,
            vec!["one two three four five", "six seven eight nine ten"]
        );
    }

    #[test]
    fn test_empty_content() {
        let splitter = RecursiveSplitter::new(SplitterConfig::default());
        assert!(splitter.split_text("").unwrap().is_empty());
        assert!(splitter.split_text("   \n\n  ").unwrap().is_empty());
    }

    #[test]
    fn test_select_separator() {
        let separators = ["\n\n", "\n", " ", ""];
        let (sep, finer) = select_separator("a b", &separators);
        assert_eq!(sep, " ");
        assert_eq!(finer.unwrap(), &[""]);

        let (sep, finer) = select_separator("ab", &separators);
        assert_eq!(sep, "");
        assert!(finer.is_none());

        let (sep, finer) = select_separator("ab", &["\n", "\t"]);
        assert_eq!(sep, "\t");
        assert!(finer.is_none());
    }
}
